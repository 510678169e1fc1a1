use std::sync::Arc;

use crate::advice::GenerativeModel;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Remote model backend. Default: GeminiClient.
    pub model: Arc<dyn GenerativeModel>,
    pub config: Config,
}
