use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
///
/// The Gemini API key is deliberately absent: it is supplied by the user
/// with each submission and never read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_base_url: env_or("GEMINI_BASE_URL", DEFAULT_BASE_URL),
            gemini_model: env_or("GEMINI_MODEL", DEFAULT_MODEL),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
