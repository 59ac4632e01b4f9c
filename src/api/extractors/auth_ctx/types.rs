/*
 * Responsibility
 * - the authenticated caller as handlers see it
 * - built by the access middleware from a validated token
 */
use std::collections::BTreeSet;

use crate::services::auth::Principal;

/// Context attached to an authenticated request.
///
/// - `login` is the token subject
/// - `authorities` is exactly the token's `auth` claim
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub login: String,
    pub authorities: BTreeSet<String>,
}

impl AuthCtx {
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }
}

impl From<Principal> for AuthCtx {
    fn from(principal: Principal) -> Self {
        Self {
            login: principal.subject,
            authorities: principal.authorities,
        }
    }
}
