//! Signed token codec.
//!
//! The enhancer turns a freshly minted credential into a self-describing
//! signed token: the authorization context, the nested refresh credential and
//! the expiry travel inside the claims. Extracting a token needs nothing but
//! the signing secret.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::AuthResult;
use crate::error::AuthError;
use crate::token::jwt::JwtService;
use crate::types::{
    AuthorizationContext, ClientPrincipal, OAuth2Token, RefreshToken, SIGNED_TOKEN_TYPE,
    UserPrincipal,
};

/// Encodes credentials together with their authorization context, and
/// reverses the process after verification.
pub trait TokenEnhancer: Send + Sync {
    /// Signs an access credential, embedding the context and its refresh credential.
    ///
    /// # Errors
    /// Returns `Internal` if signing fails.
    fn enhance(&self, token: OAuth2Token, context: &AuthorizationContext)
    -> AuthResult<OAuth2Token>;

    /// Signs a refresh credential, embedding the context.
    ///
    /// # Errors
    /// Returns `Internal` if signing fails.
    fn enhance_refresh(
        &self,
        token: RefreshToken,
        context: &AuthorizationContext,
    ) -> AuthResult<RefreshToken>;

    /// Verifies an access token value and rebuilds the credential and context.
    ///
    /// # Errors
    /// Returns `InvalidSignature` or `Malformed` if verification fails.
    fn extract(&self, token_value: &str) -> AuthResult<(OAuth2Token, AuthorizationContext)>;

    /// Verifies a refresh token value and rebuilds the credential and context.
    ///
    /// # Errors
    /// Returns `InvalidSignature` or `Malformed` if verification fails.
    fn extract_refresh(
        &self,
        token_value: &str,
    ) -> AuthResult<(RefreshToken, AuthorizationContext)>;
}

/// What a signed token was issued as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// An access credential presented as a bearer token.
    Access,
    /// A refresh credential presented on a `refresh_token` grant.
    Refresh,
}

/// Claims carried by every signed token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OAuth2TokenClaims {
    /// Issuer.
    pub iss: String,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp); absent for tokens that never expire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// The random value minted for the credential.
    pub jti: String,

    /// Access or refresh.
    pub kind: TokenKind,

    /// The resource owner, without password.
    pub user: UserPrincipal,

    /// The client, without secret.
    pub client: ClientPrincipal,

    /// Nested refresh credential of an access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<RefreshTokenClaim>,
}

/// Refresh credential as embedded in access token claims.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefreshTokenClaim {
    /// The refresh credential value.
    pub value: String,

    /// Expiration time (Unix timestamp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// [`TokenEnhancer`] backed by HMAC-signed JWTs.
pub struct JwtTokenEnhancer {
    jwt_service: Arc<JwtService>,
}

impl JwtTokenEnhancer {
    /// Creates an enhancer signing with the given service.
    #[must_use]
    pub fn new(jwt_service: Arc<JwtService>) -> Self {
        Self { jwt_service }
    }

    fn claims(
        &self,
        kind: TokenKind,
        jti: &str,
        expires_at: Option<OffsetDateTime>,
        context: &AuthorizationContext,
    ) -> OAuth2TokenClaims {
        let context = context.redacted();
        OAuth2TokenClaims {
            iss: self.jwt_service.issuer().to_string(),
            iat: OffsetDateTime::now_utc().unix_timestamp(),
            exp: expires_at.map(OffsetDateTime::unix_timestamp),
            jti: jti.to_string(),
            kind,
            user: context.user,
            client: context.client,
            refresh_token: None,
        }
    }

    fn decode(
        &self,
        token_value: &str,
        expected: TokenKind,
    ) -> AuthResult<(OAuth2TokenClaims, AuthorizationContext)> {
        let claims: OAuth2TokenClaims = self.jwt_service.decode(token_value)?;
        if claims.kind != expected {
            return Err(AuthError::malformed(format!(
                "expected {expected:?} token, found {:?}",
                claims.kind
            )));
        }
        let context = AuthorizationContext::new(claims.client.clone(), claims.user.clone());
        Ok((claims, context))
    }
}

fn from_timestamp(timestamp: Option<i64>) -> AuthResult<Option<OffsetDateTime>> {
    timestamp
        .map(|ts| {
            OffsetDateTime::from_unix_timestamp(ts)
                .map_err(|e| AuthError::malformed(format!("invalid exp claim: {e}")))
        })
        .transpose()
}

impl TokenEnhancer for JwtTokenEnhancer {
    fn enhance(
        &self,
        mut token: OAuth2Token,
        context: &AuthorizationContext,
    ) -> AuthResult<OAuth2Token> {
        let mut claims = self.claims(
            TokenKind::Access,
            &token.token_value,
            token.expires_at,
            context,
        );
        claims.refresh_token = token.refresh_token.as_ref().map(|refresh| RefreshTokenClaim {
            value: refresh.token_value.clone(),
            exp: refresh.expires_at.map(OffsetDateTime::unix_timestamp),
        });

        token.token_value = self.jwt_service.encode(&claims)?;
        token.token_type = SIGNED_TOKEN_TYPE.to_string();
        Ok(token)
    }

    fn enhance_refresh(
        &self,
        mut token: RefreshToken,
        context: &AuthorizationContext,
    ) -> AuthResult<RefreshToken> {
        let claims = self.claims(
            TokenKind::Refresh,
            &token.token_value,
            token.expires_at,
            context,
        );

        token.token_value = self.jwt_service.encode(&claims)?;
        token.token_type = SIGNED_TOKEN_TYPE.to_string();
        Ok(token)
    }

    fn extract(&self, token_value: &str) -> AuthResult<(OAuth2Token, AuthorizationContext)> {
        let (claims, context) = self.decode(token_value, TokenKind::Access)?;

        let refresh_token = match claims.refresh_token {
            Some(refresh) => Some(RefreshToken {
                token_type: SIGNED_TOKEN_TYPE.to_string(),
                token_value: refresh.value,
                expires_at: from_timestamp(refresh.exp)?,
            }),
            None => None,
        };

        let token = OAuth2Token {
            token_type: SIGNED_TOKEN_TYPE.to_string(),
            token_value: token_value.to_string(),
            expires_at: from_timestamp(claims.exp)?,
            refresh_token,
        };
        Ok((token, context))
    }

    fn extract_refresh(
        &self,
        token_value: &str,
    ) -> AuthResult<(RefreshToken, AuthorizationContext)> {
        let (claims, context) = self.decode(token_value, TokenKind::Refresh)?;

        let token = RefreshToken {
            token_type: SIGNED_TOKEN_TYPE.to_string(),
            token_value: token_value.to_string(),
            expires_at: from_timestamp(claims.exp)?,
        };
        Ok((token, context))
    }
}
