pub mod security;

pub use security::{InvalidTokenCounts, SecurityMeters, SecurityMetrics};
