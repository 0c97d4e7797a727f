//! Token service configuration.
//!
//! Clients, users and the signing secret are static: they are read once at
//! startup and never change while the process runs.
//!
//! # Example (TOML)
//!
//! ```toml
//! [auth]
//! issuer = "System"
//! token_store = "stateless"
//! access_token_expiry = "access_validity"
//! grant_types = ["password", "refresh_token"]
//!
//! [auth.signing]
//! secret = "change-me"
//! algorithm = "HS256"
//!
//! [[auth.clients]]
//! client_id = "clientId"
//! client_secret = "clientSecret"
//! grant_types = ["password", "refresh_token"]
//! access_token_validity = "30m"
//! refresh_token_validity = "2h"
//! redirect_uri = "http://127.0.0.1"
//!
//! [[auth.users]]
//! username = "admin"
//! password = "123456"
//! user_id = 1
//! authorities = ["admin"]
//! ```
//!
//! `client_secret` and `password` accept an Argon2 PHC string
//! (`$argon2id$...`). A plaintext value is hashed when the directories are
//! built.
//!
//! Changing `signing.secret` invalidates every previously issued token at
//! once. There is no grace period for the old secret.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::grant::{PASSWORD_GRANT, REFRESH_TOKEN_GRANT, SUPPORTED_GRANT_TYPES};
use crate::token::jwt::SigningAlgorithm;
use crate::types::{ClientPrincipal, UserPrincipal};

/// Longest access or refresh validity a client may be configured with.
pub const MAX_TOKEN_VALIDITY: Duration = Duration::from_secs(10 * 365 * 86_400);

/// Root configuration of the token subsystem.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Issuer claim written into every token.
    pub issuer: String,

    /// Which token store backs the lifecycle manager.
    pub token_store: TokenStoreKind,

    /// Which client validity window sets the access token expiry.
    pub access_token_expiry: AccessTokenExpiry,

    /// Token signing configuration.
    pub signing: SigningConfig,

    /// Grant types the server registers strategies for.
    pub grant_types: Vec<String>,

    /// Registered clients.
    pub clients: Vec<ClientPrincipal>,

    /// Registered users.
    pub users: Vec<UserPrincipal>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: "System".to_string(),
            token_store: TokenStoreKind::default(),
            access_token_expiry: AccessTokenExpiry::default(),
            signing: SigningConfig::default(),
            grant_types: vec![PASSWORD_GRANT.to_string(), REFRESH_TOKEN_GRANT.to_string()],
            clients: vec![
                ClientPrincipal::new("clientId", "clientSecret")
                    .with_grant_type(PASSWORD_GRANT)
                    .with_grant_type(REFRESH_TOKEN_GRANT)
                    .with_validity(Duration::from_secs(1800), Duration::from_secs(7200))
                    .with_redirect_uri("http://127.0.0.1"),
            ],
            users: vec![
                UserPrincipal::new("admin", "123456", 1).with_authority("admin"),
                UserPrincipal::new("test", "123456", 2).with_authority("test"),
            ],
        }
    }
}

/// Token store selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenStoreKind {
    /// Nothing is stored; tokens are verified from their signature alone and
    /// every grant mints a new pair.
    #[default]
    Stateless,
    /// Current tokens are indexed in process memory and reused while valid.
    Memory,
}

/// Which validity window of the client determines the access token expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessTokenExpiry {
    /// Use the client's access-token validity.
    #[default]
    AccessValidity,
    /// Use the client's refresh-token validity for access tokens too.
    RefreshValidity,
}

impl AccessTokenExpiry {
    /// Picks the validity window of `client` this setting refers to.
    #[must_use]
    pub fn validity(self, client: &ClientPrincipal) -> Duration {
        match self {
            Self::AccessValidity => client.access_token_validity,
            Self::RefreshValidity => client.refresh_token_validity,
        }
    }
}

/// Token signing configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SigningConfig {
    /// Shared HMAC secret. Never serialized.
    #[serde(skip_serializing)]
    pub secret: String,

    /// Signing algorithm (`HS256`, `HS384` or `HS512`).
    pub algorithm: String,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            secret: "secret".to_string(),
            algorithm: SigningAlgorithm::default().as_str().to_string(),
        }
    }
}

impl std::fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningConfig")
            .field("secret", &"***")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration value is invalid.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// A required configuration value is missing.
    #[error("Missing required configuration: {0}")]
    Missing(String),
}

impl AuthConfig {
    /// Parsed signing algorithm.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for anything but HS256/HS384/HS512.
    pub fn signing_algorithm(&self) -> Result<SigningAlgorithm, ConfigError> {
        SigningAlgorithm::parse(&self.signing.algorithm).ok_or_else(|| {
            ConfigError::InvalidValue(format!(
                "Invalid signing algorithm: '{}'. Must be HS256, HS384, or HS512",
                self.signing.algorithm
            ))
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The issuer or signing secret is empty
    /// - The signing algorithm is not supported
    /// - An unknown server grant type is listed
    /// - Client ids or usernames are empty or duplicated
    /// - A client has no grant types, or a validity window that is zero or
    ///   longer than [`MAX_TOKEN_VALIDITY`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.issuer.is_empty() {
            return Err(ConfigError::InvalidValue(
                "issuer cannot be empty".to_string(),
            ));
        }

        if self.signing.secret.is_empty() {
            return Err(ConfigError::Missing("signing.secret".to_string()));
        }

        self.signing_algorithm()?;

        for grant in &self.grant_types {
            if !SUPPORTED_GRANT_TYPES.contains(&grant.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "Invalid grant type: '{}'. Must be one of {}",
                    grant,
                    SUPPORTED_GRANT_TYPES.join(", ")
                )));
            }
        }

        let mut client_ids = HashSet::new();
        for client in &self.clients {
            if client.client_id.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "client_id cannot be empty".to_string(),
                ));
            }
            if !client_ids.insert(client.client_id.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "duplicate client_id '{}'",
                    client.client_id
                )));
            }
            if client.grant_types.is_empty() {
                return Err(ConfigError::InvalidValue(format!(
                    "client '{}' has no grant types",
                    client.client_id
                )));
            }
            if client.access_token_validity.is_zero() || client.refresh_token_validity.is_zero() {
                return Err(ConfigError::InvalidValue(format!(
                    "client '{}' token validity must be > 0",
                    client.client_id
                )));
            }
            if client.access_token_validity > MAX_TOKEN_VALIDITY
                || client.refresh_token_validity > MAX_TOKEN_VALIDITY
            {
                return Err(ConfigError::InvalidValue(format!(
                    "client '{}' token validity must not exceed {} days",
                    client.client_id,
                    MAX_TOKEN_VALIDITY.as_secs() / 86_400
                )));
            }
        }

        let mut usernames = HashSet::new();
        for user in &self.users {
            if user.username.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "username cannot be empty".to_string(),
                ));
            }
            if !usernames.insert(user.username.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "duplicate username '{}'",
                    user.username
                )));
            }
        }

        Ok(())
    }
}
