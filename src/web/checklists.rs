use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::database::projects::{CHECKLISTS, ChecklistRow};
use crate::database::query::Page;
use crate::error::ApiError;
use crate::models::{Checklist, ChecklistPayload};

use super::{AppState, non_blank};

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Page<Checklist>>, ApiError> {
    let query = CHECKLISTS.parse(&params, state.page_size, state.max_page_size)?;
    let page = state
        .db
        .fetch_page::<ChecklistRow>(&CHECKLISTS, &query)
        .await?;
    Ok(Json(page.map(Checklist::from)))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ChecklistPayload>,
) -> Result<(StatusCode, Json<Checklist>), ApiError> {
    non_blank(&payload.name, "name")?;
    let row = state
        .db
        .create_checklist(
            &payload.name,
            payload.is_check.unwrap_or(false),
            payload.project_id,
        )
        .await?;
    tracing::info!(checklist_id = row.id, name = %row.name, "checklist created");
    Ok((StatusCode::CREATED, Json(Checklist::from(row))))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Checklist>, ApiError> {
    let row = state.db.get_checklist(id).await?;
    Ok(Json(Checklist::from(row)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ChecklistPayload>,
) -> Result<Json<Checklist>, ApiError> {
    non_blank(&payload.name, "name")?;
    let row = state
        .db
        .update_checklist(
            id,
            &payload.name,
            payload.is_check.unwrap_or(false),
            payload.project_id,
        )
        .await?;
    tracing::info!(checklist_id = id, "checklist updated");
    Ok(Json(Checklist::from(row)))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.delete_checklist(id).await?;
    tracing::info!(checklist_id = id, "checklist deleted");
    Ok(StatusCode::NO_CONTENT)
}
