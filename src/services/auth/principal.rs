use std::collections::BTreeSet;

use crate::services::auth::claims::TokenClaims;

/// Authenticated identity derived from a validated token.
///
/// Authorities are taken from the token as-is; there is no user-store lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
    pub authorities: BTreeSet<String>,
    pub expires_at: i64,
}

impl Principal {
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }
}

impl From<TokenClaims> for Principal {
    fn from(claims: TokenClaims) -> Self {
        Self {
            subject: claims.sub,
            authorities: claims.authorities,
            expires_at: claims.exp,
        }
    }
}
