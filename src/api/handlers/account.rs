/*
 * Responsibility
 * - POST /api/authenticate: credentials -> signed JWT
 * - GET /api/account: the caller's own user record
 */
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
};

use crate::{
    api::{
        dto::{
            auth::{JwtToken, LoginRequest},
            users::AdminUserDto,
        },
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    state::AppState,
};

pub async fn authenticate(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<JwtToken>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("validation", msg))?;

    let user = state.users.authenticate(&req.username, &req.password).await?;

    let token = state
        .issuer
        .issue(&user.login, &user.authorities, req.remember_me)
        .map_err(|e| {
            tracing::error!(error = %e, "failed to issue token");
            AppError::Internal
        })?;

    let mut headers = HeaderMap::new();
    let bearer =
        HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| AppError::Internal)?;
    headers.insert(header::AUTHORIZATION, bearer);

    tracing::info!(login = %user.login, remember_me = req.remember_me, "issued access token");

    Ok((headers, Json(JwtToken { id_token: token })))
}

pub async fn get_account(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<AdminUserDto>, AppError> {
    let user = state
        .users
        .get_user_with_authorities_by_login(&ctx.login)
        .await?
        .ok_or_else(|| {
            tracing::error!(login = %ctx.login, "User could not be found");
            AppError::Internal
        })?;

    Ok(Json(user.into()))
}
