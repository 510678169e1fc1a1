pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::advice::handlers as advice;
use crate::form::handlers as form;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // HTML form
        .route("/", get(form::handle_index))
        .route("/advice", post(form::handle_submit))
        // JSON API
        .route("/api/v1/advice", post(advice::handle_request_advice))
        .route("/api/v1/advice/example", get(advice::handle_example))
        .route("/api/v1/form/defaults", get(advice::handle_form_defaults))
        .with_state(state)
}
