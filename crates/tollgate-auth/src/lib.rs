//! # tollgate-auth
//!
//! Token issuance and validation core for the Tollgate authorization server.
//!
//! This crate provides:
//! - Client and user directories with secret verification
//! - Grant strategies (password, refresh token) behind a runtime registry
//! - Signed JWT tokens that double as the token store
//! - A token lifecycle manager deciding reuse, minting and expiry
//! - Per-request authorization context builders
//!
//! ## Modules
//!
//! - [`config`] - Token service configuration
//! - [`endpoint`] - Transport-independent endpoints and context builders
//! - [`grant`] - Grant strategies and the composite registry
//! - [`secret`] - Argon2 hashing of client secrets and passwords
//! - [`storage`] - Directory and token store contracts
//! - [`token`] - Token codec, JWT signing and lifecycle management
//! - [`types`] - Principals, contexts and issued credentials
//!
//! Nothing in this crate holds mutable global state. Directories are built
//! once at startup and the signing secret is passed in by the caller.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod grant;
pub mod secret;
pub mod storage;
pub mod token;
pub mod types;

pub use config::{AccessTokenExpiry, AuthConfig, ConfigError, SigningConfig, TokenStoreKind};
pub use error::{AuthError, ErrorCategory};
pub use grant::{
    CompositeTokenGranter, GrantParams, PasswordTokenGranter, RefreshTokenGranter, TokenGranter,
};
pub use storage::{
    ClientDirectory, InMemoryClientDirectory, InMemoryTokenStore, InMemoryUserDirectory,
    TokenStore, UserDirectory,
};
pub use token::{
    JwtService, JwtTokenEnhancer, JwtTokenStore, SigningAlgorithm, TokenConfig, TokenEnhancer,
    TokenService,
};
pub use types::{AuthorizationContext, ClientPrincipal, OAuth2Token, RefreshToken, UserPrincipal};

/// Type alias for authentication/authorization results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use tollgate_auth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AuthResult;
    pub use crate::config::{AccessTokenExpiry, AuthConfig, ConfigError, TokenStoreKind};
    pub use crate::endpoint::{
        CheckTokenRequest, CheckTokenResponse, ClientAuthBuilder, HealthResponse, RequestScope,
        ResourceAuthBuilder, SimpleResponse, TokenRequest, TokenResponse, check_token_endpoint,
        health_endpoint, simple_data, token_endpoint,
    };
    pub use crate::error::{AuthError, ErrorCategory};
    pub use crate::grant::{
        CompositeTokenGranter, GrantParams, PASSWORD_GRANT, PasswordTokenGranter,
        REFRESH_TOKEN_GRANT, RefreshTokenGranter, TokenGranter,
    };
    pub use crate::storage::{
        ClientDirectory, InMemoryClientDirectory, InMemoryTokenStore, InMemoryUserDirectory,
        TokenStore, UserDirectory,
    };
    pub use crate::token::{
        JwtService, JwtTokenEnhancer, JwtTokenStore, SigningAlgorithm, TokenConfig,
        TokenEnhancer, TokenService,
    };
    pub use crate::types::{
        AuthorizationContext, ClientPrincipal, OAuth2Token, RefreshToken, UserPrincipal,
    };
}
