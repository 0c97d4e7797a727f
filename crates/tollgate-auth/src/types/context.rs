//! Authorization context.

use serde::{Deserialize, Serialize};

use super::{ClientPrincipal, UserPrincipal};

/// The authenticated subject of a request: one client acting for one user.
///
/// Built per grant or validation call. It only persists embedded inside a
/// signed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationContext {
    /// The client the token was issued to.
    pub client: ClientPrincipal,
    /// The resource owner the token speaks for.
    pub user: UserPrincipal,
}

impl AuthorizationContext {
    /// Pairs a client with a user.
    #[must_use]
    pub fn new(client: ClientPrincipal, user: UserPrincipal) -> Self {
        Self { client, user }
    }

    /// Key identifying the subject this context stands for.
    #[must_use]
    pub fn subject_key(&self) -> (String, String) {
        (self.client.client_id.clone(), self.user.username.clone())
    }

    /// Returns a copy with every secret-bearing field cleared.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            client: self.client.without_secret(),
            user: self.user.without_password(),
        }
    }
}
