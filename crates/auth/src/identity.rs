use serde::{Deserialize, Serialize};

use videoclub_core::UserId;

use crate::role::Role;

/// A resolved, authenticated identity.
///
/// Built once per request by the auth gate from whatever the identity
/// provider returned; everything downstream reads this and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
