//! Axum route handlers for the HTML form page.

use axum::{extract::State, response::Html, Form};
use tracing::{info, warn};

use crate::advice::request_advice;
use crate::form::{FormAction, FormState};
use crate::render::render_page;
use crate::state::AppState;

/// GET /
pub async fn handle_index() -> Html<String> {
    Html(render_page(&FormState::default()))
}

/// POST /advice
///
/// Rebuilds the form from the posted fields, then runs Submit. Without a
/// credential the page comes back unchanged and nothing is sent upstream.
pub async fn handle_submit(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Html<String> {
    let form = FormState::from_submission(&pairs).reduce(FormAction::Submit);

    if !form.is_submitting() {
        info!("Submit ignored: no API key entered");
        return Html(render_page(&form));
    }

    let outcome = request_advice(state.model.as_ref(), &form.credential, &form.profile).await;
    if let Err(e) = &outcome {
        warn!("Advice request failed: {e}");
    }

    Html(render_page(&form.reduce(FormAction::Resolve(outcome))))
}
