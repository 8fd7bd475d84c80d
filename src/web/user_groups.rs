use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::database::groups::{USER_GROUPS, UserGroupRow};
use crate::database::query::Page;
use crate::error::ApiError;
use crate::models::{UserGroup, UserGroupPayload};

use super::AppState;

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Page<UserGroup>>, ApiError> {
    let query = USER_GROUPS.parse(&params, state.page_size, state.max_page_size)?;
    let page = state
        .db
        .fetch_page::<UserGroupRow>(&USER_GROUPS, &query)
        .await?;
    Ok(Json(page.map(UserGroup::from)))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<UserGroupPayload>,
) -> Result<(StatusCode, Json<UserGroup>), ApiError> {
    let row = state
        .db
        .create_user_group(payload.user_id, payload.group_id)
        .await?;
    tracing::info!(
        user_group_id = row.id,
        user_id = row.user_id,
        group_id = row.group_id,
        "user added to group"
    );
    Ok((StatusCode::CREATED, Json(UserGroup::from(row))))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserGroup>, ApiError> {
    let row = state.db.get_user_group(id).await?;
    Ok(Json(UserGroup::from(row)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserGroupPayload>,
) -> Result<Json<UserGroup>, ApiError> {
    let row = state
        .db
        .update_user_group(id, payload.user_id, payload.group_id)
        .await?;
    Ok(Json(UserGroup::from(row)))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.delete_user_group(id).await?;
    tracing::info!(user_group_id = id, "user removed from group");
    Ok(StatusCode::NO_CONTENT)
}
