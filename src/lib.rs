pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod identity;
pub mod models;
pub mod web;

pub use config::Config;
pub use database::{Database, DatabaseError};
pub use web::{AppState, routes};
