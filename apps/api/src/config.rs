use anyhow::{anyhow, bail, Context, Result};

use crate::campaign::schema::SchemaVariant;
use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_temperature: f32,
    pub schema_variant: SchemaVariant,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            llm_api_key: require_env("GROQ_API_KEY")?,
            llm_base_url: optional_env("LLM_BASE_URL", DEFAULT_BASE_URL),
            llm_model: optional_env("LLM_MODEL", DEFAULT_MODEL),
            llm_temperature: parse_temperature(&optional_env("LLM_TEMPERATURE", "0.8"))?,
            schema_variant: optional_env("SCHEMA_VARIANT", "extended")
                .parse::<SchemaVariant>()
                .map_err(|e| anyhow!("SCHEMA_VARIANT must be 'basic' or 'extended': {e}"))?,
            port: optional_env("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_temperature(raw: &str) -> Result<f32> {
    let temperature = raw
        .parse::<f32>()
        .context("LLM_TEMPERATURE must be a number")?;
    if !(0.0..=2.0).contains(&temperature) {
        bail!("LLM_TEMPERATURE must be between 0 and 2, got {temperature}");
    }
    Ok(temperature)
}
