//! Token issuance and validation error types.
//!
//! Every fallible operation in this crate returns [`AuthError`]. Errors are
//! handed back to the immediate caller unchanged; nothing here logs or retries.

use std::fmt;

/// Errors that can occur while authenticating principals or issuing and
/// validating tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No client is registered under the presented id.
    #[error("clientId is not exist")]
    ClientNotFound,

    /// The client exists but the presented secret does not match.
    #[error("invalid clientSecret")]
    ClientSecretMismatch,

    /// No user is registered under the presented username.
    #[error("username is not exist")]
    UserNotFound,

    /// The user exists but the presented password does not match.
    #[error("invalid password")]
    PasswordMismatch,

    /// The grant request did not carry the credentials the grant type needs.
    #[error("invalid username, password")]
    InvalidCredentials,

    /// No strategy handles the requested grant type.
    #[error("grant type is not supported: {grant_type}")]
    UnsupportedGrantType {
        /// The grant type tag that was requested.
        grant_type: String,
    },

    /// The requesting client is not allowed to use the requested grant type.
    #[error("no support operation: {grant_type}")]
    UnsupportedOperation {
        /// The grant type tag that was requested.
        grant_type: String,
    },

    /// The presented grant is not usable by this client.
    #[error("invalid grant: {message}")]
    InvalidGrant {
        /// Description of why the grant is invalid.
        message: String,
    },

    /// The token carries an expiry that has passed.
    #[error("token expired")]
    ExpiredToken,

    /// The token signature does not verify against the signing secret.
    #[error("invalid token signature")]
    InvalidSignature,

    /// The token could not be parsed or its claims are inconsistent.
    #[error("malformed token: {message}")]
    Malformed {
        /// Description of what could not be decoded.
        message: String,
    },

    /// A token store does not know the presented value.
    #[error("token not found")]
    TokenNotFound,

    /// The request could not be attributed to an authenticated client.
    #[error("invalid client message")]
    InvalidClientRequest,

    /// The request did not carry a usable bearer token.
    #[error("invalid request token")]
    InvalidTokenRequest,

    /// The configuration is invalid.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// An unexpected internal error occurred (for example signing failed).
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `UnsupportedGrantType` error.
    #[must_use]
    pub fn unsupported_grant_type(grant_type: impl Into<String>) -> Self {
        Self::UnsupportedGrantType {
            grant_type: grant_type.into(),
        }
    }

    /// Creates a new `UnsupportedOperation` error.
    #[must_use]
    pub fn unsupported_operation(grant_type: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            grant_type: grant_type.into(),
        }
    }

    /// Creates a new `InvalidGrant` error.
    #[must_use]
    pub fn invalid_grant(message: impl Into<String>) -> Self {
        Self::InvalidGrant {
            message: message.into(),
        }
    }

    /// Creates a new `Malformed` error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if the caller sent something unusable (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !self.is_server_error()
    }

    /// Returns `true` if this is a server error (5xx category).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Configuration { .. } | Self::Internal { .. })
    }

    /// Returns `true` if the failure is a missing or rejected identity
    /// rather than a policy decision.
    #[must_use]
    pub fn is_authentication_error(&self) -> bool {
        matches!(
            self,
            Self::ClientNotFound
                | Self::ClientSecretMismatch
                | Self::InvalidClientRequest
                | Self::InvalidTokenRequest
                | Self::ExpiredToken
                | Self::InvalidSignature
                | Self::Malformed { .. }
                | Self::TokenNotFound
        )
    }

    /// Returns `true` if this is a token-related error.
    #[must_use]
    pub fn is_token_error(&self) -> bool {
        matches!(self.category(), ErrorCategory::Token | ErrorCategory::Integrity)
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ClientNotFound
            | Self::ClientSecretMismatch
            | Self::UserNotFound
            | Self::PasswordMismatch => ErrorCategory::Directory,
            Self::InvalidCredentials
            | Self::UnsupportedGrantType { .. }
            | Self::UnsupportedOperation { .. }
            | Self::InvalidGrant { .. } => ErrorCategory::Policy,
            Self::ExpiredToken | Self::TokenNotFound => ErrorCategory::Token,
            Self::InvalidSignature | Self::Malformed { .. } => ErrorCategory::Integrity,
            Self::InvalidClientRequest | Self::InvalidTokenRequest => ErrorCategory::Request,
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the OAuth 2.0 error code for this error.
    #[must_use]
    pub fn oauth_error_code(&self) -> &'static str {
        match self {
            Self::ClientNotFound | Self::ClientSecretMismatch | Self::InvalidClientRequest => {
                "invalid_client"
            }
            Self::UserNotFound
            | Self::PasswordMismatch
            | Self::InvalidCredentials
            | Self::InvalidGrant { .. } => "invalid_grant",
            Self::UnsupportedGrantType { .. } => "unsupported_grant_type",
            Self::UnsupportedOperation { .. } => "unauthorized_client",
            Self::ExpiredToken
            | Self::InvalidSignature
            | Self::Malformed { .. }
            | Self::TokenNotFound
            | Self::InvalidTokenRequest => "invalid_token",
            Self::Configuration { .. } | Self::Internal { .. } => "server_error",
        }
    }
}

/// Categories of errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Principal lookup or secret verification failed.
    Directory,
    /// A grant was refused by client policy or server capability.
    Policy,
    /// A token is expired or unknown.
    Token,
    /// A token failed signature or format checks.
    Integrity,
    /// The request boundary could not resolve a principal.
    Request,
    /// Configuration errors.
    Configuration,
    /// Internal server errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory => write!(f, "directory"),
            Self::Policy => write!(f, "policy"),
            Self::Token => write!(f, "token"),
            Self::Integrity => write!(f, "integrity"),
            Self::Request => write!(f, "request"),
            Self::Configuration => write!(f, "configuration"),
            Self::Internal => write!(f, "internal"),
        }
    }
}
