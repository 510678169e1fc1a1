//! Axum route handlers for the Advice JSON API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::advice::profile::{ExpenseCategory, FinancialHabit, ProfileInput};
use crate::advice::schema::AdviceResult;
use crate::advice::{request_advice, Credential};
use crate::errors::AppError;
use crate::render::{example_result, render_result, ResultView};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AdviceRequest {
    #[serde(default)]
    pub credential: Credential,
    #[serde(default)]
    pub profile: ProfileInput,
}

#[derive(Debug, Serialize)]
pub struct AdviceResponse {
    pub advice: AdviceResult,
    pub display: ResultView,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct FormDefaultsResponse {
    pub profile: ProfileInput,
    pub expense_categories: Vec<&'static str>,
    pub financial_habits: Vec<&'static str>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/advice
///
/// Validates the profile, then makes exactly one model call.
/// Bodies that fail to decode are VALIDATION_ERROR; model and
/// response-shape failures all surface as REQUEST_FAILED.
pub async fn handle_request_advice(
    State(state): State<AppState>,
    payload: Result<Json<AdviceRequest>, JsonRejection>,
) -> Result<Json<AdviceResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    if request.credential.is_blank() {
        return Err(AppError::MissingCredential);
    }

    request.profile.validate()?;

    let advice = request_advice(state.model.as_ref(), &request.credential, &request.profile).await?;
    let display = render_result(&advice);

    Ok(Json(AdviceResponse {
        advice,
        display,
        generated_at: Utc::now(),
    }))
}

/// GET /api/v1/advice/example
pub async fn handle_example() -> Json<AdviceResult> {
    Json(example_result())
}

/// GET /api/v1/form/defaults
pub async fn handle_form_defaults() -> Json<FormDefaultsResponse> {
    Json(FormDefaultsResponse {
        profile: ProfileInput::default(),
        expense_categories: ExpenseCategory::ALL.iter().map(|c| c.label()).collect(),
        financial_habits: FinancialHabit::ALL.iter().map(|h| h.label()).collect(),
    })
}
