//! Grant strategies.
//!
//! A grant strategy exchanges presented credentials for an access token.
//! Strategies are registered by grant type tag on a
//! [`CompositeTokenGranter`], which also enforces each client's allow-list.

mod composite;
mod password;
mod refresh;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::{ClientPrincipal, OAuth2Token};

pub use composite::CompositeTokenGranter;
pub use password::PasswordTokenGranter;
pub use refresh::RefreshTokenGranter;

/// Grant type tag of the resource owner password grant.
pub const PASSWORD_GRANT: &str = "password";

/// Grant type tag of the refresh token grant.
pub const REFRESH_TOKEN_GRANT: &str = "refresh_token";

/// Grant types this crate ships strategies for.
pub const SUPPORTED_GRANT_TYPES: &[&str] = &[PASSWORD_GRANT, REFRESH_TOKEN_GRANT];

/// A strategy that issues tokens for one or more grant types.
#[async_trait]
pub trait TokenGranter: Send + Sync {
    /// Issues a token for an already authenticated client.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedGrantType` if the strategy does not handle
    /// `grant_type`, or the directory and lifecycle error that stopped the
    /// grant.
    async fn grant(
        &self,
        grant_type: &str,
        client: &ClientPrincipal,
        params: &GrantParams,
    ) -> AuthResult<OAuth2Token>;
}

/// Request parameters a strategy reads its credentials from.
///
/// Empty values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantParams(HashMap<String, String>);

impl GrantParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Returns a non-empty parameter value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

impl From<HashMap<String, String>> for GrantParams {
    fn from(params: HashMap<String, String>) -> Self {
        Self(params)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for GrantParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_are_absent() {
        let params = GrantParams::new()
            .with("username", "admin")
            .with("password", "");
        assert_eq!(params.get("username"), Some("admin"));
        assert_eq!(params.get("password"), None);
        assert_eq!(params.get("scope"), None);
    }

    #[test]
    fn test_from_iterator() {
        let params: GrantParams = [("username", "admin"), ("password", "123456")]
            .into_iter()
            .collect();
        assert_eq!(params.get("password"), Some("123456"));
    }
}
