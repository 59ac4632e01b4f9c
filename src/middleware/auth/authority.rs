//! Authority gate for routes that need more than a valid token.
//!
//! Must run after `access`, which puts `AuthCtx` in the extensions.

use axum::{body::Body, http::Request, middleware::Next, response::Response};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::authorities;

/// 401 without an `AuthCtx`, 403 without `ROLE_ADMIN`.
pub async fn require_admin(req: Request<Body>, next: Next) -> Result<Response, AppError> {
    let ctx = req
        .extensions()
        .get::<AuthCtx>()
        .ok_or(AppError::Unauthorized)?;

    if !ctx.has_authority(authorities::ADMIN) {
        tracing::warn!(login = %ctx.login, path = %req.uri().path(), "admin authority required");
        return Err(AppError::Forbidden);
    }

    Ok(next.run(req).await)
}
