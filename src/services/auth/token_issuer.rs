use std::collections::BTreeSet;

use jsonwebtoken::{EncodingKey, Header};
use thiserror::Error;
use tracing::error;

use crate::services::auth::claims::TokenClaims;
use crate::services::auth::secret::{JWT_ALGORITHM, JwtSecret};

#[derive(Debug, Error)]
pub enum IssueError {
    #[error("token validity must be positive, got {0}s")]
    InvalidValidity(i64),
    #[error("failed to sign token: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),
}

/// Signs access tokens with the shared HS512 secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    validity_seconds: i64,
    remember_me_validity_seconds: i64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("validity_seconds", &self.validity_seconds)
            .field(
                "remember_me_validity_seconds",
                &self.remember_me_validity_seconds,
            )
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(
        secret: &JwtSecret,
        validity_seconds: i64,
        remember_me_validity_seconds: i64,
    ) -> Result<Self, IssueError> {
        for v in [validity_seconds, remember_me_validity_seconds] {
            if v <= 0 {
                return Err(IssueError::InvalidValidity(v));
            }
        }

        Ok(Self {
            encoding_key: secret.encoding_key(),
            validity_seconds,
            remember_me_validity_seconds,
        })
    }

    pub fn validity_seconds(&self, remember_me: bool) -> i64 {
        if remember_me {
            self.remember_me_validity_seconds
        } else {
            self.validity_seconds
        }
    }

    /// Issue a token for `subject` valid from now.
    ///
    /// The subject is not validated; authorities go into the claim verbatim.
    pub fn issue(
        &self,
        subject: &str,
        authorities: &BTreeSet<String>,
        remember_me: bool,
    ) -> Result<String, IssueError> {
        let now = chrono::Utc::now().timestamp();
        self.issue_at(subject, authorities, now, self.validity_seconds(remember_me))
    }

    pub fn issue_at(
        &self,
        subject: &str,
        authorities: &BTreeSet<String>,
        issued_at: i64,
        validity_seconds: i64,
    ) -> Result<String, IssueError> {
        let claims = TokenClaims::new(subject, authorities.clone(), issued_at, validity_seconds)
            .ok_or(IssueError::InvalidValidity(validity_seconds))?;
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &TokenClaims) -> Result<String, IssueError> {
        let mut header = Header::new(JWT_ALGORITHM);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            IssueError::Sign(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
    use serde_json::Value;

    use super::*;

    fn issuer() -> TokenIssuer {
        let secret = JwtSecret::from_bytes(vec![3u8; 64]).unwrap();
        TokenIssuer::new(&secret, 3600, 86_400).unwrap()
    }

    fn segment(token: &str, index: usize) -> Value {
        let part = token.split('.').nth(index).unwrap();
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(part).unwrap()).unwrap()
    }

    #[test]
    fn token_is_compact_hs512() {
        let token = issuer()
            .issue("admin", &BTreeSet::from(["ROLE_ADMIN".to_string()]), false)
            .unwrap();

        assert_eq!(token.split('.').count(), 3);
        let header = segment(&token, 0);
        assert_eq!(header["alg"], "HS512");
        assert_eq!(header["typ"], "JWT");
    }

    #[test]
    fn remember_me_uses_the_long_validity() {
        let issuer = issuer();
        let token = issuer
            .issue_at("user", &BTreeSet::new(), 1_000, issuer.validity_seconds(true))
            .unwrap();

        let claims = segment(&token, 1);
        assert_eq!(claims["iat"], 1_000);
        assert_eq!(claims["exp"], 1_000 + 86_400);
        assert_eq!(claims["sub"], "user");
    }

    #[test]
    fn non_positive_validity_is_an_error() {
        let secret = JwtSecret::from_bytes(vec![3u8; 64]).unwrap();
        assert!(matches!(
            TokenIssuer::new(&secret, 0, 10),
            Err(IssueError::InvalidValidity(0))
        ));
        assert!(matches!(
            issuer().issue_at("user", &BTreeSet::new(), 10, -1),
            Err(IssueError::InvalidValidity(-1))
        ));
    }
}
