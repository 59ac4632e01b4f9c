//! Bearer token verification -> AuthCtx in request extensions.
//!
//! - `Authorization: Bearer <jwt>` is required (scheme is case-insensitive); anything else is 401.
//! - The token is checked by `TokenValidator`, which also records the failure metric.
//! - Applied with `route_layer`, so unmatched paths still fall through to 404.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

const BEARER_SCHEME: &str = "Bearer";

/// Require a valid bearer token on every route of `router`.
///
/// ```ignore
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // from_fn cannot see State, so the state is handed over explicitly
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

pub(crate) fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim_start().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case(BEARER_SCHEME))
        .map(|(_, token)| token.trim())
        .filter(|t| !t.is_empty())
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = bearer_token(&req) else {
        tracing::debug!(path = %req.uri().path(), "missing bearer token");
        return Err(AppError::Unauthorized);
    };

    let principal = match state.validator.validate(token) {
        Ok(principal) => principal,
        Err(err) => {
            tracing::warn!(
                cause = err.cause(),
                error = %err,
                path = %req.uri().path(),
                "access token rejected"
            );
            return Err(AppError::Unauthorized);
        }
    };

    req.extensions_mut().insert(AuthCtx::from(principal));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/produits");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn bearer_token_is_extracted() {
        let req = request(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&req), Some("abc.def.ghi"));
    }

    #[test]
    fn other_schemes_and_empty_tokens_are_ignored() {
        assert_eq!(bearer_token(&request(None)), None);
        assert_eq!(bearer_token(&request(Some("Basic dXNlcjpwYXNz"))), None);
        assert_eq!(bearer_token(&request(Some("Bearer "))), None);
        assert_eq!(bearer_token(&request(Some("Bearer"))), None);
    }

    #[test]
    fn scheme_is_case_insensitive() {
        assert_eq!(bearer_token(&request(Some("bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&request(Some("BEARER abc"))), Some("abc"));
        assert_eq!(bearer_token(&request(Some("Bearer   abc "))), Some("abc"));
    }
}
