use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::auth::AuthError;
use crate::database::DatabaseError;
use crate::identity::IdentityError;

/// Client-facing error. Every handler returns `Result<_, ApiError>` and
/// lets the `From` impls map layer errors onto HTTP statuses.
#[derive(Debug)]
pub enum ApiError {
    BadRequest {
        field: Option<String>,
        message: String,
    },
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest { message, .. } => write!(f, "Bad request: {}", message),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ApiError::NotFound(msg),
            DatabaseError::Conflict(msg) => ApiError::Conflict(msg),
            DatabaseError::InvalidData(msg) => ApiError::BadRequest {
                field: None,
                message: msg,
            },
            DatabaseError::Connection(e) | DatabaseError::Query(e) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::MissingField(field) => ApiError::BadRequest {
                field: Some(field.to_string()),
                message: format!("{} is required", field),
            },
            IdentityError::InvalidField { field, reason } => ApiError::BadRequest {
                field: Some(field.to_string()),
                message: reason,
            },
            IdentityError::Hash(msg) => ApiError::Internal(msg),
            IdentityError::Database(db) => db.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken
            | AuthError::InvalidToken(_)
            | AuthError::ExpiredToken
            | AuthError::WrongTokenKind
            | AuthError::RevokedToken
            | AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::InactiveUser => ApiError::Forbidden(err.to_string()),
            AuthError::Internal(msg) => ApiError::Internal(msg),
            AuthError::Database(db) => db.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, field, message) = match self {
            ApiError::BadRequest { field, message } => (StatusCode::BAD_REQUEST, field, message),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, None, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, None, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, None, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, None, msg),
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    None,
                    "internal server error".to_string(),
                )
            }
        };

        let body = match field {
            Some(field) => json!({ "error": message, "field": field }),
            None => json!({ "error": message }),
        };
        (status, Json(body)).into_response()
    }
}
