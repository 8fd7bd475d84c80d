use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;

use crate::database::projects::{PROJECTS, ProjectFields, ProjectRow};
use crate::database::query::Page;
use crate::error::ApiError;
use crate::models::{Project, ProjectPayload};

use super::{AppState, non_blank};

fn fields_from(payload: ProjectPayload) -> Result<ProjectFields, ApiError> {
    non_blank(&payload.name, "name")?;
    non_blank(&payload.deadline, "deadline")?;
    if NaiveDate::parse_from_str(&payload.deadline, "%Y-%m-%d").is_err() {
        return Err(ApiError::BadRequest {
            field: Some("deadline".to_string()),
            message: "deadline must be a date in YYYY-MM-DD format".to_string(),
        });
    }

    Ok(ProjectFields {
        name: payload.name,
        deadline: payload.deadline,
        is_check: payload.is_check.unwrap_or(false),
        is_finished: payload.is_finished.unwrap_or(false),
        infosystem_id: payload.infosystem_id,
        group_rp_id: payload.group_rp_id,
        group_work_id: payload.group_work_id,
    })
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Page<Project>>, ApiError> {
    let query = PROJECTS.parse(&params, state.page_size, state.max_page_size)?;
    let page = state.db.fetch_page::<ProjectRow>(&PROJECTS, &query).await?;
    Ok(Json(page.map(Project::from)))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ProjectPayload>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let fields = fields_from(payload)?;
    let row = state.db.create_project(&fields).await?;
    tracing::info!(project_id = row.id, name = %row.name, deadline = %row.deadline, "project created");
    Ok((StatusCode::CREATED, Json(Project::from(row))))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Project>, ApiError> {
    let row = state.db.get_project(id).await?;
    Ok(Json(Project::from(row)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProjectPayload>,
) -> Result<Json<Project>, ApiError> {
    let fields = fields_from(payload)?;
    let row = state.db.update_project(id, &fields).await?;
    tracing::info!(project_id = id, "project updated");
    Ok(Json(Project::from(row)))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.delete_project(id).await?;
    tracing::info!(project_id = id, "project deleted");
    Ok(StatusCode::NO_CONTENT)
}
