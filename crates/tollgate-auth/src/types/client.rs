//! Client principal.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A client application allowed to request tokens.
///
/// Principals are loaded once at startup and never mutated. The secret is
/// accepted on deserialization but never serialized, so a principal embedded
/// in token claims cannot leak it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPrincipal {
    /// Unique client identifier.
    pub client_id: String,

    /// Client secret as an Argon2 PHC string. Plaintext from configuration
    /// is hashed when the directory is built.
    #[serde(default, skip_serializing)]
    pub client_secret: String,

    /// Grant type tags this client may use.
    #[serde(default)]
    pub grant_types: Vec<String>,

    /// How long an access token issued to this client stays valid.
    #[serde(with = "humantime_serde")]
    pub access_token_validity: Duration,

    /// How long a refresh token issued to this client stays valid.
    #[serde(with = "humantime_serde")]
    pub refresh_token_validity: Duration,

    /// Registered redirect URI.
    #[serde(default)]
    pub redirect_uri: String,
}

impl ClientPrincipal {
    /// Creates a client with the given credentials and no grant types.
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            grant_types: Vec::new(),
            access_token_validity: Duration::from_secs(30 * 60),
            refresh_token_validity: Duration::from_secs(2 * 3600),
            redirect_uri: String::new(),
        }
    }

    /// Adds an allowed grant type.
    #[must_use]
    pub fn with_grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.grant_types.push(grant_type.into());
        self
    }

    /// Sets the access and refresh token validity windows.
    #[must_use]
    pub fn with_validity(mut self, access: Duration, refresh: Duration) -> Self {
        self.access_token_validity = access;
        self.refresh_token_validity = refresh;
        self
    }

    /// Sets the registered redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = uri.into();
        self
    }

    /// Returns `true` if the client may use the given grant type.
    #[must_use]
    pub fn allows_grant_type(&self, grant_type: &str) -> bool {
        self.grant_types.iter().any(|g| g == grant_type)
    }

    /// Returns a copy with the secret cleared.
    #[must_use]
    pub fn without_secret(&self) -> Self {
        Self {
            client_secret: String::new(),
            ..self.clone()
        }
    }
}

impl fmt::Debug for ClientPrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientPrincipal")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("grant_types", &self.grant_types)
            .field("access_token_validity", &self.access_token_validity)
            .field("refresh_token_validity", &self.refresh_token_validity)
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}
