//! Issued credentials.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Token type of a credential that went through the signed token codec.
pub const SIGNED_TOKEN_TYPE: &str = "signed";

/// Token type of a credential minted without a codec.
pub const BEARER_TOKEN_TYPE: &str = "bearer";

/// An access credential, optionally owning one refresh credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2Token {
    /// Type tag (`signed` once encoded).
    pub token_type: String,

    /// Opaque value presented as the bearer token.
    pub token_value: String,

    /// Absolute expiry; `None` means the token never expires.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,

    /// Refresh credential issued alongside this token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<RefreshToken>,
}

/// A refresh credential. It has the same shape as [`OAuth2Token`] but can
/// never nest another refresh credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Type tag (`signed` once encoded).
    pub token_type: String,

    /// Opaque value presented on a `refresh_token` grant.
    pub token_value: String,

    /// Absolute expiry; `None` means the token never expires.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
}

fn expired(expires_at: Option<OffsetDateTime>, now: OffsetDateTime) -> bool {
    expires_at.is_some_and(|at| now > at)
}

impl OAuth2Token {
    /// Returns `true` only if an expiry is set and it has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(OffsetDateTime::now_utc())
    }

    /// Expiry check against an explicit instant.
    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        expired(self.expires_at, now)
    }

    /// Seconds until expiry, clamped at zero. `None` if the token never expires.
    #[must_use]
    pub fn expires_in(&self) -> Option<i64> {
        self.expires_at
            .map(|at| (at - OffsetDateTime::now_utc()).whole_seconds().max(0))
    }
}

impl RefreshToken {
    /// Returns `true` only if an expiry is set and it has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(OffsetDateTime::now_utc())
    }

    /// Expiry check against an explicit instant.
    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        expired(self.expires_at, now)
    }
}
