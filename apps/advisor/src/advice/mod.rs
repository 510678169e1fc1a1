// Advice Client: profile → prompt → one model call → validated AdviceResult.
// All model calls go through the `GenerativeModel` seam; production uses
// llm_client::GeminiClient.

pub mod handlers;
pub mod profile;
pub mod prompts;
pub mod schema;

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm_client::LlmError;
use profile::ProfileInput;
use prompts::build_prompt;
use schema::{parse_advice, AdviceResult, SchemaError};

/// Opaque user-supplied API key. Held only for the duration of a request.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        self.0.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.expose().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_blank() {
            f.write_str("Credential(<empty>)")
        } else {
            f.write_str("Credential(<redacted>)")
        }
    }
}

/// A remote generative-language model. Implement this to swap backends
/// without touching handlers or the advice flow.
///
/// Carried in `AppState` as `Arc<dyn GenerativeModel>`.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Sends one prompt and returns the model's raw text response.
    async fn generate(&self, credential: &Credential, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("no API credential supplied")]
    MissingCredential,

    #[error("model call failed: {0}")]
    Model(#[from] LlmError),

    #[error("advice response rejected: {0}")]
    Schema(#[from] SchemaError),
}

impl AdviceError {
    /// Every failure past the credential check is reported to the user as
    /// the same generic "request failed" signal.
    pub fn is_request_failed(&self) -> bool {
        !matches!(self, AdviceError::MissingCredential)
    }
}

/// Retirement ages outside this range are logged but still returned.
const PLAUSIBLE_RETIREMENT_AGE: std::ops::RangeInclusive<f64> = 0.0..=120.0;

/// Builds the prompt for `profile`, makes exactly one model call with
/// `credential`, and validates the response shape.
///
/// A blank credential fails before anything is sent.
pub async fn request_advice(
    model: &dyn GenerativeModel,
    credential: &Credential,
    profile: &ProfileInput,
) -> Result<AdviceResult, AdviceError> {
    if credential.is_blank() {
        return Err(AdviceError::MissingCredential);
    }

    let category_total = profile.expense_categories.total();
    if category_total != 100 {
        debug!("Expense categories sum to {category_total}%; sent as entered");
    }

    let prompt = build_prompt(profile);
    info!(
        "Requesting retirement advice (age={}, habits={})",
        profile.age,
        profile.financial_habits.len()
    );

    let text = model.generate(credential, &prompt).await?;
    let advice = parse_advice(&text)?;

    if let Some(age) = advice.estimated_retirement_age.as_f64() {
        if !PLAUSIBLE_RETIREMENT_AGE.contains(&age) {
            warn!("Model returned implausible retirement age {age}; passing through unchanged");
        }
    }

    info!(
        "Advice received: retirement_age={}, recommendations={}",
        advice.estimated_retirement_age,
        advice.recommendations.len()
    );

    Ok(advice)
}


#[cfg(test)]
mod tests {
    use super::test_support::{StubModel, EXAMPLE_REPLY};
    use super::*;
    use serde_json::Number;

    #[tokio::test]
    async fn test_request_advice_returns_decoded_values() {
        let model = StubModel::replying(EXAMPLE_REPLY);
        let advice = request_advice(&model, &Credential::new("key"), &ProfileInput::default())
            .await
            .unwrap();

        assert_eq!(advice.estimated_retirement_age, Number::from(65));
        assert_eq!(advice.monthly_savings_needed, Number::from(2500));
        assert_eq!(
            advice.recommendations,
            vec![
                "Increase your emergency fund",
                "Diversify your investment portfolio",
                "Reduce discretionary spending"
            ]
        );
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_request_advice_sends_built_prompt() {
        let model = StubModel::replying(EXAMPLE_REPLY);
        let profile = ProfileInput {
            age: 52,
            ..ProfileInput::default()
        };
        request_advice(&model, &Credential::new("key"), &profile)
            .await
            .unwrap();

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.as_slice(), [build_prompt(&profile)]);
    }

    #[tokio::test]
    async fn test_blank_credential_makes_no_call() {
        let model = StubModel::replying(EXAMPLE_REPLY);
        for credential in ["", "   "] {
            let err = request_advice(&model, &Credential::new(credential), &ProfileInput::default())
                .await
                .unwrap_err();
            assert!(matches!(err, AdviceError::MissingCredential));
            assert!(!err.is_request_failed());
        }
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_non_json_reply_is_request_failed() {
        let model = StubModel::replying("I cannot help with that.");
        let err = request_advice(&model, &Credential::new("key"), &ProfileInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AdviceError::Schema(SchemaError::NotJson(_))));
        assert!(err.is_request_failed());
    }

    #[tokio::test]
    async fn test_missing_key_reply_is_request_failed() {
        let model = StubModel::replying(
            r#"{"estimated_retirement_age": 65, "recommendations": ["Save"]}"#,
        );
        let err = request_advice(&model, &Credential::new("key"), &ProfileInput::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AdviceError::Schema(SchemaError::MissingKey("monthly_savings_needed"))
        ));
        assert!(err.is_request_failed());
    }

    #[tokio::test]
    async fn test_model_error_is_request_failed() {
        let model = StubModel::failing(400);
        let err = request_advice(&model, &Credential::new("bad"), &ProfileInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AdviceError::Model(LlmError::Api { status: 400, .. })));
        assert!(err.is_request_failed());
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_implausible_age_passes_through() {
        let model = StubModel::replying(
            r#"{"estimated_retirement_age": -3, "monthly_savings_needed": 0, "recommendations": []}"#,
        );
        let advice = request_advice(&model, &Credential::new("key"), &ProfileInput::default())
            .await
            .unwrap();
        assert_eq!(advice.estimated_retirement_age, Number::from(-3));
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("AIzaSecret");
        assert_eq!(format!("{credential:?}"), "Credential(<redacted>)");
        assert_eq!(format!("{:?}", Credential::default()), "Credential(<empty>)");
    }

    #[test]
    fn test_credential_expose_trims_whitespace() {
        assert_eq!(Credential::new("  key \n").expose(), "key");
    }
}
