use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::database::catalog::{OBJECTS, ObjectRow};
use crate::database::query::Page;
use crate::error::ApiError;
use crate::models::{ObjectEntity, ObjectPayload};

use super::{AppState, non_blank};

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Page<ObjectEntity>>, ApiError> {
    let query = OBJECTS.parse(&params, state.page_size, state.max_page_size)?;
    let page = state.db.fetch_page::<ObjectRow>(&OBJECTS, &query).await?;
    Ok(Json(page.map(ObjectEntity::from)))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ObjectPayload>,
) -> Result<(StatusCode, Json<ObjectEntity>), ApiError> {
    non_blank(&payload.name, "name")?;
    let row = state
        .db
        .create_object(
            &payload.name,
            payload.contact.as_deref(),
            payload.group_id,
            payload.organization_id,
        )
        .await?;
    tracing::info!(object_id = row.id, name = %row.name, "object created");
    Ok((StatusCode::CREATED, Json(ObjectEntity::from(row))))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ObjectEntity>, ApiError> {
    let row = state.db.get_object(id).await?;
    Ok(Json(ObjectEntity::from(row)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ObjectPayload>,
) -> Result<Json<ObjectEntity>, ApiError> {
    non_blank(&payload.name, "name")?;
    let row = state
        .db
        .update_object(
            id,
            &payload.name,
            payload.contact.as_deref(),
            payload.group_id,
            payload.organization_id,
        )
        .await?;
    tracing::info!(object_id = id, "object updated");
    Ok(Json(ObjectEntity::from(row)))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.delete_object(id).await?;
    tracing::info!(object_id = id, "object deleted");
    Ok(StatusCode::NO_CONTENT)
}
