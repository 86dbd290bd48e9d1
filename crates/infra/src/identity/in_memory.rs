use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use videoclub_auth::{AuthError, Identity, IdentityProvider, Role, Session, SignUpOutcome};
use videoclub_core::UserId;

#[derive(Debug, Clone)]
struct StoredUser {
    id: UserId,
    email: String,
    password: String,
    name: String,
    role: Role,
}

impl StoredUser {
    fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            email: self.email.clone(),
            name: Some(self.name.clone()),
            role: self.role,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    users: HashMap<String, StoredUser>,
    tokens: HashMap<String, UserId>,
}

/// In-memory identity provider for tests/dev.
///
/// Issues opaque tokens the same way the real provider does; the only
/// extra surface is [`promote_to_admin`], which models the out-of-band
/// administrative role change the API deliberately does not expose.
///
/// [`promote_to_admin`]: InMemoryIdentityProvider::promote_to_admin
#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    state: Mutex<State>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a user's role to `admin`, as an operator would do directly at
    /// the provider. Returns false when the email is unknown.
    pub fn promote_to_admin(&self, email: &str) -> bool {
        let mut state = self.state.lock().expect("identity state poisoned");
        match state.users.get_mut(email) {
            Some(user) => {
                user.role = Role::Admin;
                true
            }
            None => false,
        }
    }

    fn mint_session(state: &mut State, user_id: UserId) -> Session {
        let session = Session {
            access_token: format!("tok-{}", Uuid::now_v7()),
            refresh_token: format!("ref-{}", Uuid::now_v7()),
        };
        state.tokens.insert(session.access_token.clone(), user_id);
        session
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<SignUpOutcome, AuthError> {
        let mut state = self.state.lock().expect("identity state poisoned");
        if state.users.contains_key(email) {
            return Err(AuthError::Rejected("User already registered".to_string()));
        }

        let user = StoredUser {
            id: UserId::new(),
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
            role: Role::User,
        };
        let identity = user.identity();
        let user_id = user.id;
        state.users.insert(email.to_string(), user);
        let session = Self::mint_session(&mut state, user_id);

        Ok(SignUpOutcome { user: identity, session: Some(session) })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<(Identity, Session), AuthError> {
        let mut state = self.state.lock().expect("identity state poisoned");
        let user = match state.users.get(email) {
            Some(user) if user.password == password => user.clone(),
            _ => return Err(AuthError::InvalidCredentials),
        };
        let session = Self::mint_session(&mut state, user.id);
        Ok((user.identity(), session))
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        let mut state = self.state.lock().expect("identity state poisoned");
        state.tokens.remove(token);
        Ok(())
    }

    async fn resolve(&self, token: &str) -> Result<Identity, AuthError> {
        let state = self.state.lock().expect("identity state poisoned");
        let user_id = state.tokens.get(token).ok_or(AuthError::InvalidToken)?;
        state
            .users
            .values()
            .find(|u| u.id == *user_id)
            .map(StoredUser::identity)
            .ok_or(AuthError::InvalidToken)
    }
}
