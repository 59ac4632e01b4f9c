/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - hand the authenticated caller (AuthCtx) to handlers
 * - axum-specific code lives in core, the plain type in types
 *
 * Public API:
 * - AuthCtx
 * - AuthCtxExtractor
 */

mod core;
mod types;

pub use core::AuthCtxExtractor;
pub use types::AuthCtx;
