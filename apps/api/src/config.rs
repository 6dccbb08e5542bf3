use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every value has a default so the service starts with no environment at all.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Root directory for uploaded templates and rendered artifacts.
    pub storage_root: PathBuf,
    /// Base URL of the Ollama-compatible text generator.
    pub generator_url: String,
    pub generator_model: String,
    pub generator_timeout_secs: u64,
    pub default_profile: String,
    pub keyword_top_k: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 5000)?,
            rust_log: env_or("RUST_LOG", "info"),
            storage_root: PathBuf::from(env_or("STORAGE_ROOT", "uploads")),
            generator_url: env_or("GENERATOR_URL", "http://localhost:11434"),
            generator_model: env_or("GENERATOR_MODEL", "llama3:8b"),
            generator_timeout_secs: parse_env("GENERATOR_TIMEOUT_SECS", 60)?,
            default_profile: env_or("DEFAULT_PROFILE", "default_user"),
            keyword_top_k: parse_env("KEYWORD_TOP_K", 10)?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
