use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/shorten", post(handlers::shorten_form))
        .route("/analytics", post(handlers::analytics_form))
        .route("/copy", post(handlers::copy_form))
        .route("/api/session", get(handlers::get_session))
        .route("/api/shorten", post(handlers::shorten))
        .route("/api/analytics", post(handlers::analytics))
        .route("/api/copy", post(handlers::copy))
        .with_state(state)
}
