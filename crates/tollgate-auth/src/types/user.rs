//! User principal.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A resource owner who authenticates with a password.
///
/// Like [`ClientPrincipal`](super::ClientPrincipal), the password is read
/// from configuration but skipped on serialization.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPrincipal {
    /// Username for authentication.
    pub username: String,

    /// Password as an Argon2 PHC string. Plaintext from configuration is
    /// hashed when the directory is built.
    #[serde(default, skip_serializing)]
    pub password: String,

    /// Numeric user id.
    pub user_id: i64,

    /// Authority/role tags.
    #[serde(default)]
    pub authorities: Vec<String>,
}

impl UserPrincipal {
    /// Creates a user with no authorities.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>, user_id: i64) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            user_id,
            authorities: Vec::new(),
        }
    }

    /// Adds an authority tag.
    #[must_use]
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authorities.push(authority.into());
        self
    }

    /// Returns `true` if the user holds the authority.
    #[must_use]
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    /// Returns a copy with the password cleared.
    #[must_use]
    pub fn without_password(&self) -> Self {
        Self {
            password: String::new(),
            ..self.clone()
        }
    }
}

impl fmt::Debug for UserPrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPrincipal")
            .field("username", &self.username)
            .field("password", &"***")
            .field("user_id", &self.user_id)
            .field("authorities", &self.authorities)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_never_serialized() {
        let user = UserPrincipal::new("admin", "123456", 1).with_authority("admin");
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"username\":\"admin\""));
        assert!(!json.contains("123456"));
        assert!(user.has_authority("admin"));
        assert!(!user.has_authority("test"));
    }

    #[test]
    fn test_without_password() {
        let user = UserPrincipal::new("admin", "123456", 1).without_password();
        assert!(user.password.is_empty());
        assert_eq!(user.user_id, 1);
    }
}
