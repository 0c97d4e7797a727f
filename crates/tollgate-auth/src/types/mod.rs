//! Domain types shared across the token subsystem.
//!
//! - [`ClientPrincipal`] - a registered client application
//! - [`UserPrincipal`] - a registered resource owner
//! - [`OAuth2Token`] / [`RefreshToken`] - issued credentials
//! - [`AuthorizationContext`] - the client/user pair a token speaks for

pub mod client;
pub mod context;
pub mod token;
pub mod user;

pub use client::ClientPrincipal;
pub use context::AuthorizationContext;
pub use token::{OAuth2Token, RefreshToken, SIGNED_TOKEN_TYPE, BEARER_TOKEN_TYPE};
pub use user::UserPrincipal;
