//! JWT encoding and decoding with a shared signing secret.
//!
//! Tokens are signed with an HMAC algorithm keyed by a single secret supplied
//! as configuration. Anyone holding the secret can verify a token without a
//! lookup. Replacing the secret invalidates every token signed with the old one
//! immediately; there is no grace period.
//!
//! ## Example
//!
//! ```ignore
//! use tollgate_auth::token::jwt::{JwtService, SigningAlgorithm};
//!
//! let jwt_service = JwtService::new(b"secret", SigningAlgorithm::HS256, "System");
//! let token = jwt_service.encode(&claims)?;
//! let claims: MyClaims = jwt_service.decode(&token)?;
//! ```

use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::AuthError;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during JWT operations.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to encode a token.
    #[error("Failed to encode token: {message}")]
    EncodingError {
        /// Description of the encoding error.
        message: String,
    },

    /// Failed to decode a token.
    #[error("Failed to decode token: {message}")]
    DecodingError {
        /// Description of the decoding error.
        message: String,
    },

    /// The token has expired.
    #[error("Token expired")]
    Expired,

    /// The token signature is invalid.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The token claims are invalid.
    #[error("Invalid claims: {message}")]
    InvalidClaims {
        /// Description of why claims are invalid.
        message: String,
    },

    /// Invalid key format or data.
    #[error("Invalid key: {message}")]
    InvalidKey {
        /// Description of why the key is invalid.
        message: String,
    },
}

impl JwtError {
    /// Creates a new `EncodingError`.
    #[must_use]
    pub fn encoding_error(message: impl Into<String>) -> Self {
        Self::EncodingError {
            message: message.into(),
        }
    }

    /// Creates a new `DecodingError`.
    #[must_use]
    pub fn decoding_error(message: impl Into<String>) -> Self {
        Self::DecodingError {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidClaims` error.
    #[must_use]
    pub fn invalid_claims(message: impl Into<String>) -> Self {
        Self::InvalidClaims {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidKey` error.
    #[must_use]
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey {
            message: message.into(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidToken
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm => Self::decoding_error(err.to_string()),
            ErrorKind::InvalidAudience
            | ErrorKind::InvalidIssuer
            | ErrorKind::InvalidSubject
            | ErrorKind::MissingRequiredClaim(_) => Self::invalid_claims(err.to_string()),
            ErrorKind::InvalidKeyFormat => Self::invalid_key(err.to_string()),
            _ => Self::decoding_error(err.to_string()),
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::ExpiredToken,
            JwtError::InvalidSignature => AuthError::InvalidSignature,
            JwtError::EncodingError { message } | JwtError::InvalidKey { message } => {
                AuthError::internal(message)
            }
            JwtError::DecodingError { message } | JwtError::InvalidClaims { message } => {
                AuthError::malformed(message)
            }
        }
    }
}

// ============================================================================
// Signing Algorithm
// ============================================================================

/// Supported signing algorithms. All of them are keyed by a shared secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SigningAlgorithm {
    /// HMAC with SHA-256.
    #[default]
    HS256,
    /// HMAC with SHA-384.
    HS384,
    /// HMAC with SHA-512.
    HS512,
}

impl SigningAlgorithm {
    /// Converts to the `jsonwebtoken` Algorithm type.
    #[must_use]
    pub fn to_jwt_algorithm(self) -> Algorithm {
        match self {
            Self::HS256 => Algorithm::HS256,
            Self::HS384 => Algorithm::HS384,
            Self::HS512 => Algorithm::HS512,
        }
    }

    /// Returns the algorithm name as used in JWT headers.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
        }
    }

    /// Parses an algorithm name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "HS256" => Some(Self::HS256),
            "HS384" => Some(Self::HS384),
            "HS512" => Some(Self::HS512),
            _ => None,
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// JWT Service
// ============================================================================

/// Service for encoding and decoding JWT tokens.
///
/// This service is thread-safe (`Send + Sync`) and immutable after
/// construction.
pub struct JwtService {
    algorithm: SigningAlgorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    /// Creates a new JWT service.
    ///
    /// # Arguments
    /// * `secret` - The shared signing secret
    /// * `algorithm` - The HMAC variant to sign with
    /// * `issuer` - The issuer claim value
    #[must_use]
    pub fn new(secret: &[u8], algorithm: SigningAlgorithm, issuer: impl Into<String>) -> Self {
        Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
        }
    }

    /// Encodes claims into a JWT string.
    ///
    /// # Errors
    /// Returns an error if encoding fails.
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm.to_jwt_algorithm());

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::encoding_error(e.to_string()))
    }

    /// Verifies the signature and issuer of a JWT string and decodes its claims.
    ///
    /// Expiry is not validated here; callers decide what an expired token
    /// means for them.
    ///
    /// # Errors
    /// Returns an error if the signature, issuer or payload is invalid.
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, JwtError> {
        let mut validation = Validation::new(self.algorithm.to_jwt_algorithm());
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["iss"]);
        validation.validate_exp = false;
        validation.validate_aud = false;

        decode::<T>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(JwtError::from)
    }

    /// Returns the signing algorithm.
    #[must_use]
    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    /// Returns the issuer.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestClaims {
        iss: String,
        sub: String,
        exp: i64,
    }

    fn claims(exp: i64) -> TestClaims {
        TestClaims {
            iss: "System".to_string(),
            sub: "admin".to_string(),
            exp,
        }
    }

    #[test]
    fn test_encode_decode() {
        for algorithm in [
            SigningAlgorithm::HS256,
            SigningAlgorithm::HS384,
            SigningAlgorithm::HS512,
        ] {
            let service = JwtService::new(b"secret", algorithm, "System");
            let token = service.encode(&claims(4_000_000_000)).unwrap();
            assert!(!token.is_empty());

            let decoded: TestClaims = service.decode(&token).unwrap();
            assert_eq!(decoded, claims(4_000_000_000));
        }
    }

    #[test]
    fn test_expired_token_still_decodes() {
        let service = JwtService::new(b"secret", SigningAlgorithm::HS256, "System");
        let token = service.encode(&claims(1)).unwrap();

        let decoded: TestClaims = service.decode(&token).unwrap();
        assert_eq!(decoded.exp, 1);
    }

    #[test]
    fn test_invalid_signature_rejected() {
        let service1 = JwtService::new(b"secret", SigningAlgorithm::HS256, "System");
        let service2 = JwtService::new(b"rotated", SigningAlgorithm::HS256, "System");

        let token = service1.encode(&claims(4_000_000_000)).unwrap();
        let result = service2.decode::<TestClaims>(&token);

        assert!(matches!(result.unwrap_err(), JwtError::InvalidSignature));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let service = JwtService::new(b"secret", SigningAlgorithm::HS256, "Other");
        let token = JwtService::new(b"secret", SigningAlgorithm::HS256, "System")
            .encode(&claims(4_000_000_000))
            .unwrap();

        let err = service.decode::<TestClaims>(&token).unwrap_err();
        assert!(matches!(err, JwtError::InvalidClaims { .. }));
        assert!(matches!(AuthError::from(err), AuthError::Malformed { .. }));
    }

    #[test]
    fn test_garbage_rejected() {
        let service = JwtService::new(b"secret", SigningAlgorithm::HS256, "System");
        let err = service.decode::<TestClaims>("not-a-jwt").unwrap_err();
        assert!(matches!(AuthError::from(err), AuthError::Malformed { .. }));
    }

    #[test]
    fn test_jwt_error_conversion() {
        assert_eq!(AuthError::from(JwtError::Expired), AuthError::ExpiredToken);
        assert_eq!(
            AuthError::from(JwtError::InvalidSignature),
            AuthError::InvalidSignature
        );
        assert!(matches!(
            AuthError::from(JwtError::encoding_error("boom")),
            AuthError::Internal { .. }
        ));
    }

    #[test]
    fn test_signing_algorithm_parse() {
        assert_eq!(SigningAlgorithm::parse("HS384"), Some(SigningAlgorithm::HS384));
        assert_eq!(SigningAlgorithm::parse("RS256"), None);
        assert_eq!(SigningAlgorithm::HS512.to_string(), "HS512");
        assert_eq!(SigningAlgorithm::default(), SigningAlgorithm::HS256);
    }
}
