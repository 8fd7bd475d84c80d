//! HTTP surface: one resource router per entity, JWT middleware over
//! everything except token issuance.

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{self, AuthService};
use crate::config::Config;
use crate::database::Database;
use crate::error::ApiError;

mod checklists;
mod groups;
mod infosystems;
mod objects;
mod organizations;
mod places;
mod projects;
mod tokens;
mod user_groups;
mod users;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth: AuthService,
    pub page_size: i64,
    pub max_page_size: i64,
}

impl AppState {
    pub fn new(db: Database, config: &Config) -> Self {
        Self {
            db,
            auth: AuthService::new(config),
            page_size: config.page_size,
            max_page_size: config.max_page_size,
        }
    }
}

pub fn routes(state: AppState) -> Router {
    let protected = Router::new()
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/{id}",
            get(users::retrieve).put(users::update).delete(users::destroy),
        )
        .route("/groups", get(groups::list).post(groups::create))
        .route(
            "/groups/{id}",
            get(groups::retrieve)
                .put(groups::update)
                .delete(groups::destroy),
        )
        .route(
            "/user-groups",
            get(user_groups::list).post(user_groups::create),
        )
        .route(
            "/user-groups/{id}",
            get(user_groups::retrieve)
                .put(user_groups::update)
                .delete(user_groups::destroy),
        )
        .route(
            "/organizations",
            get(organizations::list).post(organizations::create),
        )
        .route(
            "/organizations/{id}",
            get(organizations::retrieve)
                .put(organizations::update)
                .delete(organizations::destroy),
        )
        .route("/objects", get(objects::list).post(objects::create))
        .route(
            "/objects/{id}",
            get(objects::retrieve)
                .put(objects::update)
                .delete(objects::destroy),
        )
        .route(
            "/infosystems",
            get(infosystems::list).post(infosystems::create),
        )
        .route(
            "/infosystems/{id}",
            get(infosystems::retrieve)
                .put(infosystems::update)
                .delete(infosystems::destroy),
        )
        .route("/places", get(places::list).post(places::create))
        .route(
            "/places/{id}",
            get(places::retrieve)
                .put(places::update)
                .delete(places::destroy),
        )
        .route("/projects", get(projects::list).post(projects::create))
        .route(
            "/projects/{id}",
            get(projects::retrieve)
                .put(projects::update)
                .delete(projects::destroy),
        )
        .route(
            "/checklists",
            get(checklists::list).post(checklists::create),
        )
        .route(
            "/checklists/{id}",
            get(checklists::retrieve)
                .put(checklists::update)
                .delete(checklists::destroy),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/auth/token", post(tokens::obtain))
        .route("/auth/refresh", post(tokens::refresh))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn non_blank(value: &str, field: &'static str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest {
            field: Some(field.to_string()),
            message: format!("{} must not be blank", field),
        });
    }
    Ok(())
}
