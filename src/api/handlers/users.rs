/*
 * Responsibility
 * - /api/admin/users management (ROLE_ADMIN, gated in routes)
 * - /api/users public listing (id + login of activated users)
 * - /api/authorities
 */
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
};

use crate::{
    api::{
        dto::users::{AdminUserDto, UserDto, is_valid_login},
        extractors::AuthCtxExtractor,
        headers,
    },
    error::AppError,
    state::AppState,
};

const ENTITY_NAME: &str = "user";

pub async fn create_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(dto): Json<AdminUserDto>,
) -> Result<(StatusCode, HeaderMap, Json<AdminUserDto>), AppError> {
    tracing::debug!(login = %dto.login, "REST request to save User");
    dto.validate()
        .map_err(|msg| AppError::bad_request("validation", msg))?;
    if dto.id.is_some() {
        return Err(AppError::bad_request(
            "idexists",
            "A new user cannot already have an ID",
        ));
    }

    let user = state.users.create_user(dto.into(), &ctx.login).await?;

    let mut headers = state.alerts.alert("userManagement.created", &user.login);
    if let Ok(location) = HeaderValue::from_str(&format!("/api/admin/users/{}", user.login)) {
        headers.insert(header::LOCATION, location);
    }

    Ok((StatusCode::CREATED, headers, Json(user.into())))
}

pub async fn update_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(dto): Json<AdminUserDto>,
) -> Result<(HeaderMap, Json<AdminUserDto>), AppError> {
    tracing::debug!(login = %dto.login, "REST request to update User");
    dto.validate()
        .map_err(|msg| AppError::bad_request("validation", msg))?;

    let user = state
        .users
        .update_user(dto.into(), &ctx.login)
        .await?
        .ok_or(AppError::not_found(ENTITY_NAME))?;
    let headers = state.alerts.alert("userManagement.updated", &user.login);

    Ok((headers, Json(user.into())))
}

pub async fn list_all_users(
    State(state): State<AppState>,
) -> Result<(HeaderMap, Json<Vec<AdminUserDto>>), AppError> {
    let rows = state.users.get_all_managed_users().await?;
    let total = state.users.count_managed_users().await?;

    let body = rows.into_iter().map(AdminUserDto::from).collect();
    Ok((headers::total_count(total), Json(body)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(login): Path<String>,
) -> Result<Json<AdminUserDto>, AppError> {
    check_login(&login)?;

    let user = state
        .users
        .get_user_with_authorities_by_login(&login)
        .await?
        .ok_or(AppError::not_found(ENTITY_NAME))?;

    Ok(Json(user.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(login): Path<String>,
) -> Result<(StatusCode, HeaderMap), AppError> {
    check_login(&login)?;

    state.users.delete_user(&login).await?;
    let headers = state.alerts.alert("userManagement.deleted", &login);

    Ok((StatusCode::NO_CONTENT, headers))
}

pub async fn list_public_users(
    State(state): State<AppState>,
) -> Result<(HeaderMap, Json<Vec<UserDto>>), AppError> {
    let rows = state.users.get_all_public_users().await?;
    let total = rows.len() as u64;

    let body = rows.into_iter().map(UserDto::from).collect();
    Ok((headers::total_count(total), Json(body)))
}

pub async fn list_authorities(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.users.get_authorities().await?))
}

fn check_login(login: &str) -> Result<(), AppError> {
    if is_valid_login(login) {
        Ok(())
    } else {
        Err(AppError::bad_request("validation", "Invalid login"))
    }
}
