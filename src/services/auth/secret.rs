use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use thiserror::Error;

/// MAC algorithm used for every token this service signs or accepts.
pub const JWT_ALGORITHM: Algorithm = Algorithm::HS512;

/// HS512 key size (512 bits).
pub const MIN_SECRET_BYTES: usize = 64;

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("jwt secret is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("jwt secret must be at least {min} bytes, got {0}", min = MIN_SECRET_BYTES)]
    TooShort(usize),
}

/// Shared symmetric key, decoded once at startup.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct JwtSecret {
    bytes: Arc<[u8]>,
}

impl std::fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSecret")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl JwtSecret {
    pub fn from_base64(value: &str) -> Result<Self, SecretError> {
        let bytes = STANDARD.decode(value.trim())?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, SecretError> {
        let bytes = bytes.into();
        if bytes.len() < MIN_SECRET_BYTES {
            return Err(SecretError::TooShort(bytes.len()));
        }
        Ok(Self {
            bytes: bytes.into(),
        })
    }

    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.bytes)
    }

    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_base64_secret() {
        let encoded = STANDARD.encode([42u8; 64]);
        let secret = JwtSecret::from_base64(&format!("  {encoded}\n")).unwrap();
        assert_eq!(format!("{secret:?}"), "JwtSecret { len: 64 }");
    }

    #[test]
    fn rejects_short_secrets() {
        let encoded = STANDARD.encode([1u8; 32]);
        let err = JwtSecret::from_base64(&encoded).unwrap_err();
        assert!(matches!(err, SecretError::TooShort(32)));
    }

    #[test]
    fn rejects_non_base64() {
        let err = JwtSecret::from_base64("not base64 at all!").unwrap_err();
        assert!(matches!(err, SecretError::Base64(_)));
    }
}
