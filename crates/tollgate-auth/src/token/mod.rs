//! Token generation, validation, and management.
//!
//! This module provides:
//!
//! - HMAC-signed JWT encoding and decoding
//! - The signed token codec ([`TokenEnhancer`])
//! - The codec-backed, storage-free [`JwtTokenStore`]
//! - The access/refresh lifecycle ([`TokenService`])

pub mod enhancer;
pub mod jwt;
pub mod service;
pub mod store;

pub use enhancer::{JwtTokenEnhancer, OAuth2TokenClaims, TokenEnhancer, TokenKind};
pub use jwt::{JwtError, JwtService, SigningAlgorithm};
pub use service::{TokenConfig, TokenService};
pub use store::JwtTokenStore;
