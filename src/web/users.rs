use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::auth::AuthUser;
use crate::database::query::Page;
use crate::database::users::{USERS, UserRow};
use crate::error::ApiError;
use crate::identity;
use crate::models::{User, UserPayload};

use super::AppState;

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Page<User>>, ApiError> {
    let query = USERS.parse(&params, state.page_size, state.max_page_size)?;
    let page = state.db.fetch_page::<UserRow>(&USERS, &query).await?;
    Ok(Json(page.map(User::from)))
}

/// Create a user. Creating a superuser is the privileged variant: only a
/// superuser caller may do it.
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Json(payload): Json<UserPayload>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let row = if payload.is_superuser.unwrap_or(false) {
        if !caller.is_superuser {
            return Err(ApiError::Forbidden(
                "only a superuser can create superusers".to_string(),
            ));
        }
        identity::create_superuser(&state.db, &payload).await?
    } else {
        identity::create_user(&state.db, &payload).await?
    };

    tracing::info!(user_id = row.id, username = %row.username, "user created");
    Ok((StatusCode::CREATED, Json(User::from(row))))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    let row = state.db.get_user_by_id(id).await?;
    Ok(Json(User::from(row)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<User>, ApiError> {
    let row = identity::update_user(&state.db, id, &payload).await?;
    tracing::info!(user_id = id, "user updated");
    Ok(Json(User::from(row)))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.delete_user(id).await?;
    tracing::info!(user_id = id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
