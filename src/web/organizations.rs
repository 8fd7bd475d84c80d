use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::database::catalog::{ORGANIZATIONS, OrganizationRow};
use crate::database::query::Page;
use crate::error::ApiError;
use crate::models::{Organization, OrganizationPayload};

use super::{AppState, non_blank};

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Page<Organization>>, ApiError> {
    let query = ORGANIZATIONS.parse(&params, state.page_size, state.max_page_size)?;
    let page = state
        .db
        .fetch_page::<OrganizationRow>(&ORGANIZATIONS, &query)
        .await?;
    Ok(Json(page.map(Organization::from)))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<OrganizationPayload>,
) -> Result<(StatusCode, Json<Organization>), ApiError> {
    non_blank(&payload.name, "name")?;
    let row = state
        .db
        .create_organization(&payload.name, payload.address.as_deref(), payload.group_id)
        .await?;
    tracing::info!(organization_id = row.id, name = %row.name, "organization created");
    Ok((StatusCode::CREATED, Json(Organization::from(row))))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Organization>, ApiError> {
    let row = state.db.get_organization(id).await?;
    Ok(Json(Organization::from(row)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrganizationPayload>,
) -> Result<Json<Organization>, ApiError> {
    non_blank(&payload.name, "name")?;
    let row = state
        .db
        .update_organization(id, &payload.name, payload.address.as_deref(), payload.group_id)
        .await?;
    tracing::info!(organization_id = id, "organization updated");
    Ok(Json(Organization::from(row)))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.delete_organization(id).await?;
    tracing::info!(organization_id = id, "organization deleted");
    Ok(StatusCode::NO_CONTENT)
}
