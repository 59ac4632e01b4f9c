/*
 * Responsibility
 * - /api/produits CRUD
 * - id consistency rules between path and body (idnull / idinvalid / idnotfound)
 * - alert headers on every mutation
 */
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
};

use crate::{
    api::{dto::produits::ProduitDto, headers},
    error::AppError,
    state::AppState,
};

const ENTITY_NAME: &str = "produit";

pub async fn create_produit(
    State(state): State<AppState>,
    Json(dto): Json<ProduitDto>,
) -> Result<(StatusCode, HeaderMap, Json<ProduitDto>), AppError> {
    if dto.id.is_some() {
        return Err(AppError::bad_request(
            "idexists",
            "A new produit cannot already have an ID",
        ));
    }

    let saved = state.produits.save(dto.into()).await?;
    let id = saved.id.clone().ok_or(AppError::Internal)?;

    let mut headers = state.alerts.entity_created(ENTITY_NAME, &id);
    if let Ok(location) = HeaderValue::from_str(&format!("/api/produits/{id}")) {
        headers.insert(header::LOCATION, location);
    }

    Ok((StatusCode::CREATED, headers, Json(saved.into())))
}

pub async fn update_produit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<ProduitDto>,
) -> Result<(HeaderMap, Json<ProduitDto>), AppError> {
    check_target(&state, &id, &dto).await?;

    let saved = state.produits.update(dto.into()).await?;
    let headers = state.alerts.entity_updated(ENTITY_NAME, &id);

    Ok((headers, Json(saved.into())))
}

/// Only the fields present in the body are written.
pub async fn partial_update_produit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<ProduitDto>,
) -> Result<(HeaderMap, Json<ProduitDto>), AppError> {
    check_target(&state, &id, &dto).await?;

    let saved = state
        .produits
        .partial_update(dto.into())
        .await?
        .ok_or(AppError::not_found(ENTITY_NAME))?;
    let headers = state.alerts.entity_updated(ENTITY_NAME, &id);

    Ok((headers, Json(saved.into())))
}

pub async fn list_produits(
    State(state): State<AppState>,
) -> Result<(HeaderMap, Json<Vec<ProduitDto>>), AppError> {
    let rows = state.produits.find_all().await?;
    let total = state.produits.count_all().await?;

    let body = rows.into_iter().map(ProduitDto::from).collect();
    Ok((headers::total_count(total), Json(body)))
}

pub async fn get_produit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProduitDto>, AppError> {
    let row = state
        .produits
        .find_one(&id)
        .await?
        .ok_or(AppError::not_found(ENTITY_NAME))?;

    Ok(Json(row.into()))
}

pub async fn delete_produit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, HeaderMap), AppError> {
    state.produits.delete(&id).await?;
    let headers = state.alerts.entity_deleted(ENTITY_NAME, &id);

    Ok((StatusCode::NO_CONTENT, headers))
}

async fn check_target(state: &AppState, id: &str, dto: &ProduitDto) -> Result<(), AppError> {
    let Some(body_id) = dto.id.as_deref() else {
        return Err(AppError::bad_request("idnull", "Invalid id"));
    };
    if body_id != id {
        return Err(AppError::bad_request("idinvalid", "Invalid ID"));
    }
    if !state.produits.exists(id).await? {
        return Err(AppError::bad_request("idnotfound", "Entity not found"));
    }
    Ok(())
}
