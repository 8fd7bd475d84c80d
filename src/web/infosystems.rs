use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::database::catalog::{INFOSYSTEMS, InfosystemFields, InfosystemRow};
use crate::database::query::Page;
use crate::error::ApiError;
use crate::models::{Infosystem, InfosystemPayload, InfosystemType};

use super::{AppState, non_blank};

fn fields_from(payload: InfosystemPayload) -> Result<InfosystemFields, ApiError> {
    non_blank(&payload.name, "name")?;
    let kind: InfosystemType = payload.kind.parse().map_err(|reason| ApiError::BadRequest {
        field: Some("type".to_string()),
        message: reason,
    })?;

    Ok(InfosystemFields {
        name: payload.name,
        address: payload.address,
        kind: kind.as_str().to_string(),
        clss: payload.clss,
        clss_info: payload.clss_info,
        level: payload.level,
        level_info: payload.level_info,
        contact: payload.contact,
        object_id: payload.object_id,
    })
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Page<Infosystem>>, ApiError> {
    let query = INFOSYSTEMS.parse(&params, state.page_size, state.max_page_size)?;
    let page = state
        .db
        .fetch_page::<InfosystemRow>(&INFOSYSTEMS, &query)
        .await?;
    Ok(Json(page.map(Infosystem::from)))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<InfosystemPayload>,
) -> Result<(StatusCode, Json<Infosystem>), ApiError> {
    let fields = fields_from(payload)?;
    let row = state.db.create_infosystem(&fields).await?;
    tracing::info!(infosystem_id = row.id, name = %row.name, kind = %row.kind, "infosystem created");
    Ok((StatusCode::CREATED, Json(Infosystem::from(row))))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Infosystem>, ApiError> {
    let row = state.db.get_infosystem(id).await?;
    Ok(Json(Infosystem::from(row)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<InfosystemPayload>,
) -> Result<Json<Infosystem>, ApiError> {
    let fields = fields_from(payload)?;
    let row = state.db.update_infosystem(id, &fields).await?;
    tracing::info!(infosystem_id = id, "infosystem updated");
    Ok(Json(Infosystem::from(row)))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.db.delete_infosystem(id).await?;
    tracing::info!(infosystem_id = id, "infosystem deleted");
    Ok(StatusCode::NO_CONTENT)
}
