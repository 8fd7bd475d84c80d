use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::database::groups::{GROUPS, GroupRow};
use crate::database::query::Page;
use crate::error::ApiError;
use crate::models::{Group, GroupPayload};

use super::{AppState, non_blank};

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Page<Group>>, ApiError> {
    let query = GROUPS.parse(&params, state.page_size, state.max_page_size)?;
    let page = state.db.fetch_page::<GroupRow>(&GROUPS, &query).await?;
    Ok(Json(page.map(Group::from)))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<GroupPayload>,
) -> Result<(StatusCode, Json<Group>), ApiError> {
    non_blank(&payload.name, "name")?;
    let row = state
        .db
        .create_group(&payload.name, payload.is_active.unwrap_or(true))
        .await?;
    tracing::info!(group_id = row.id, name = %row.name, "group created");
    Ok((StatusCode::CREATED, Json(Group::from(row))))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Group>, ApiError> {
    let row = state.db.get_group(id).await?;
    Ok(Json(Group::from(row)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<GroupPayload>,
) -> Result<Json<Group>, ApiError> {
    non_blank(&payload.name, "name")?;
    let row = state
        .db
        .update_group(id, &payload.name, payload.is_active.unwrap_or(true))
        .await?;
    tracing::info!(group_id = id, "group updated");
    Ok(Json(Group::from(row)))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.delete_group(id).await?;
    tracing::info!(group_id = id, "group deleted");
    Ok(StatusCode::NO_CONTENT)
}
