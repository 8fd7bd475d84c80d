use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::database::catalog::{PLACES, PlaceRow};
use crate::database::query::Page;
use crate::error::ApiError;
use crate::models::{Place, PlacePayload};

use super::{AppState, non_blank};

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Page<Place>>, ApiError> {
    let query = PLACES.parse(&params, state.page_size, state.max_page_size)?;
    let page = state.db.fetch_page::<PlaceRow>(&PLACES, &query).await?;
    Ok(Json(page.map(Place::from)))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<PlacePayload>,
) -> Result<(StatusCode, Json<Place>), ApiError> {
    non_blank(&payload.name, "name")?;
    let row = state
        .db
        .create_place(
            &payload.name,
            payload.address.as_deref(),
            payload.is_active.unwrap_or(true),
            payload.infosystem_id,
        )
        .await?;
    tracing::info!(place_id = row.id, name = %row.name, "place created");
    Ok((StatusCode::CREATED, Json(Place::from(row))))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Place>, ApiError> {
    let row = state.db.get_place(id).await?;
    Ok(Json(Place::from(row)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<PlacePayload>,
) -> Result<Json<Place>, ApiError> {
    non_blank(&payload.name, "name")?;
    let row = state
        .db
        .update_place(
            id,
            &payload.name,
            payload.address.as_deref(),
            payload.is_active.unwrap_or(true),
            payload.infosystem_id,
        )
        .await?;
    tracing::info!(place_id = id, "place updated");
    Ok(Json(Place::from(row)))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.delete_place(id).await?;
    tracing::info!(place_id = id, "place deleted");
    Ok(StatusCode::NO_CONTENT)
}
