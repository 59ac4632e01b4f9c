use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, Validation};
use thiserror::Error;

use crate::services::auth::claims::TokenClaims;
use crate::services::auth::principal::Principal;
use crate::services::auth::secret::{JWT_ALGORITHM, JwtSecret};
use crate::services::metrics::SecurityMetrics;

/// Why a bearer token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token is malformed")]
    Malformed,
    #[error("token rejected: {0}")]
    Other(String),
}

impl TokenError {
    pub fn classify(err: &jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => Self::Malformed,
            _ => Self::Other(err.to_string()),
        }
    }

    /// Short label used in logs.
    pub fn cause(&self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::InvalidSignature => "invalid-signature",
            Self::Malformed => "malformed",
            Self::Other(_) => "unsupported",
        }
    }
}

/// HS512 access-token verifier.
///
/// `decode_at` is pure; `validate`/`validate_at` additionally record each
/// failure in the metrics sink, once.
#[derive(Clone)]
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
    leeway_seconds: i64,
    metrics: Arc<dyn SecurityMetrics>,
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenValidator")
            .field("validation", &self.validation)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenValidator {
    pub fn new(secret: &JwtSecret, leeway_seconds: u64, metrics: Arc<dyn SecurityMetrics>) -> Self {
        let mut validation = Validation::new(JWT_ALGORITHM);
        // Expiry is checked in `decode_at` against an explicit clock.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: secret.decoding_key(),
            validation,
            leeway_seconds: i64::try_from(leeway_seconds).unwrap_or(i64::MAX),
            metrics,
        }
    }

    pub fn validate(&self, token: &str) -> Result<Principal, TokenError> {
        self.validate_at(token, chrono::Utc::now().timestamp())
    }

    pub fn validate_at(&self, token: &str, now: i64) -> Result<Principal, TokenError> {
        match self.decode_at(token, now) {
            Ok(claims) => Ok(Principal::from(claims)),
            Err(err) => {
                self.record(&err);
                Err(err)
            }
        }
    }

    /// Verify signature and expiry. Does not touch metrics.
    pub fn decode_at(&self, token: &str, now: i64) -> Result<TokenClaims, TokenError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| TokenError::classify(&e))?;

        let claims = data.claims;
        if now >= claims.exp.saturating_add(self.leeway_seconds) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    fn record(&self, err: &TokenError) {
        match err {
            TokenError::Expired => self.metrics.track_token_expired(),
            TokenError::InvalidSignature => self.metrics.track_token_invalid_signature(),
            TokenError::Malformed => self.metrics.track_token_malformed(),
            TokenError::Other(_) => self.metrics.track_token_unsupported(),
        }
    }
}
