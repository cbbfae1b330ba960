use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;

pub mod dto;
pub mod handler;
pub mod model;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::handle_push))
        .route("/health", get(handler::health))
        .route("/api/v1/jobs", post(handler::handle_push))
        .route("/api/v1/health", get(handler::health))
}
