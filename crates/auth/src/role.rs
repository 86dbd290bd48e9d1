use serde::{Deserialize, Serialize};

/// Role attached to an identity.
///
/// Exactly two roles exist; promotion to `Admin` is an out-of-band
/// administrative action at the identity provider, never an API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Read a role from provider metadata. Absent or unrecognized values
    /// fall back to `User`.
    pub fn from_metadata(value: Option<&str>) -> Self {
        match value {
            Some("admin") => Self::Admin,
            _ => Self::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_defaults_to_user() {
        assert_eq!(Role::from_metadata(None), Role::User);
        assert_eq!(Role::from_metadata(Some("superuser")), Role::User);
        assert_eq!(Role::from_metadata(Some("admin")), Role::Admin);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }
}
