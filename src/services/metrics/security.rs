//! Invalid-token counters for the authentication boundary.
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Sink for token validation failures.
///
/// Injected into the validator so tests can observe it without global state.
/// Implementations are called from concurrent request handlers.
pub trait SecurityMetrics: Send + Sync {
    fn track_token_expired(&self);
    fn track_token_invalid_signature(&self);
    fn track_token_malformed(&self);
    /// Anything the decoder rejects that is not one of the three above.
    fn track_token_unsupported(&self);
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidTokenCounts {
    pub expired: u64,
    pub invalid_signature: u64,
    pub malformed: u64,
    pub unsupported: u64,
}

impl InvalidTokenCounts {
    pub fn total(&self) -> u64 {
        self.expired + self.invalid_signature + self.malformed + self.unsupported
    }
}

/// Process-local atomic counters.
#[derive(Debug, Default)]
pub struct SecurityMeters {
    expired: AtomicU64,
    invalid_signature: AtomicU64,
    malformed: AtomicU64,
    unsupported: AtomicU64,
}

impl SecurityMeters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> InvalidTokenCounts {
        InvalidTokenCounts {
            expired: self.expired.load(Ordering::Relaxed),
            invalid_signature: self.invalid_signature.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            unsupported: self.unsupported.load(Ordering::Relaxed),
        }
    }
}

impl SecurityMetrics for SecurityMeters {
    fn track_token_expired(&self) {
        self.expired.fetch_add(1, Ordering::Relaxed);
    }

    fn track_token_invalid_signature(&self) {
        self.invalid_signature.fetch_add(1, Ordering::Relaxed);
    }

    fn track_token_malformed(&self) {
        self.malformed.fetch_add(1, Ordering::Relaxed);
    }

    fn track_token_unsupported(&self) {
        self.unsupported.fetch_add(1, Ordering::Relaxed);
    }
}
