//! Lookup and storage contracts.
//!
//! - [`ClientDirectory`] / [`UserDirectory`] - principal lookup and secret verification
//! - [`TokenStore`] - where the lifecycle manager registers current credentials
//!
//! In-memory implementations are provided for each. The directories are
//! filled once at startup and never written afterwards.

pub mod client;
pub mod token;
pub mod user;

pub use client::{ClientDirectory, InMemoryClientDirectory};
pub use token::{InMemoryTokenStore, TokenStore};
pub use user::{InMemoryUserDirectory, UserDirectory};
