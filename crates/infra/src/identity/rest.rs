//! REST adapter for the external identity provider.
//!
//! Speaks the provider's `/auth/v1` surface: `signup`, password token
//! grant, `logout` and `user`. Tokens are opaque to this layer; the
//! provider is the only party that can turn one into an identity.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use videoclub_auth::{AuthError, Identity, IdentityProvider, Role, Session, SignUpOutcome};
use videoclub_core::UserId;

pub struct RestIdentityProvider {
    client: Client,
    base: String,
    service_key: String,
}

/// User payload as the provider returns it.
#[derive(Debug, Deserialize)]
struct UserPayload {
    id: UserId,
    email: String,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(rename = "nombre")]
    name: Option<String>,
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionPayload {
    access_token: String,
    refresh_token: String,
    user: UserPayload,
}

/// Provider error bodies vary by endpoint; take whichever message field
/// is present.
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
}

impl From<UserPayload> for Identity {
    fn from(user: UserPayload) -> Self {
        Identity {
            id: user.id,
            email: user.email,
            name: user.user_metadata.name,
            role: Role::from_metadata(user.user_metadata.role.as_deref()),
        }
    }
}

impl RestIdentityProvider {
    pub fn new(base_url: &str, service_key: &str) -> Self {
        Self {
            client: Client::new(),
            base: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base)
    }

    async fn rejection(resp: reqwest::Response) -> AuthError {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ProviderErrorBody>(&body)
            .ok()
            .and_then(|b| b.msg.or(b.message).or(b.error_description))
            .unwrap_or_else(|| format!("HTTP {status}"));
        AuthError::Rejected(message)
    }
}

#[async_trait]
impl IdentityProvider for RestIdentityProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<SignUpOutcome, AuthError> {
        let resp = self
            .client
            .post(self.url("signup"))
            .header("apikey", &self.service_key)
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "nombre": name, "role": Role::User.as_str() },
            }))
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Self::rejection(resp).await);
        }

        // With auto-confirm the provider answers with a session; with email
        // confirmation pending it answers with the bare user.
        let value: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))?;

        if value.get("access_token").is_some() {
            let session: SessionPayload =
                serde_json::from_value(value).map_err(|e| AuthError::Decode(e.to_string()))?;
            Ok(SignUpOutcome {
                user: session.user.into(),
                session: Some(Session {
                    access_token: session.access_token,
                    refresh_token: session.refresh_token,
                }),
            })
        } else {
            let user: UserPayload =
                serde_json::from_value(value).map_err(|e| AuthError::Decode(e.to_string()))?;
            Ok(SignUpOutcome { user: user.into(), session: None })
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<(Identity, Session), AuthError> {
        let resp = self
            .client
            .post(self.url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.service_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if resp.status() == StatusCode::BAD_REQUEST || resp.status() == StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidCredentials);
        }
        if !resp.status().is_success() {
            return Err(Self::rejection(resp).await);
        }

        let session: SessionPayload = resp
            .json()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))?;
        let identity: Identity = session.user.into();
        Ok((
            identity,
            Session {
                access_token: session.access_token,
                refresh_token: session.refresh_token,
            },
        ))
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        let resp = self
            .client
            .post(self.url("logout"))
            .header("apikey", &self.service_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Self::rejection(resp).await)
        }
    }

    async fn resolve(&self, token: &str) -> Result<Identity, AuthError> {
        let resp = self
            .client
            .get(self.url("user"))
            .header("apikey", &self.service_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(AuthError::InvalidToken);
        }

        let user: UserPayload = resp
            .json()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))?;
        Ok(user.into())
    }
}
