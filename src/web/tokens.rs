use axum::{Json, extract::State};
use serde::Deserialize;

use crate::auth::TokenPair;
use crate::error::ApiError;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Issue an access/refresh pair for valid credentials.
pub async fn obtain(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let pair = state
        .auth
        .login(&state.db, &req.username, &req.password)
        .await?;
    tracing::info!(username = %req.username, "token pair issued");
    Ok(Json(pair))
}

/// Rotate a refresh token; the presented token is blacklisted.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let pair = state.auth.refresh(&state.db, &req.refresh).await?;
    Ok(Json(pair))
}
