use anyhow::{Context, Result};

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";

/// Application configuration loaded from environment variables.
/// Only malformed values fail startup; everything has a default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Enables the Gemini analyzer when present and non-empty.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    /// model2vec repo id on the Hugging Face Hub, or a local model folder.
    pub embedding_model: String,
    pub port: u16,
    pub rust_log: String,
    pub cors_allowed_origins: Vec<String>,
    pub llm_timeout_secs: u64,
    pub llm_max_attempts: u32,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_model: env_or("GEMINI_MODEL", "gemini-1.5-flash"),
            embedding_model: env_or("EMBEDDING_MODEL", "minishlab/potion-base-8M"),
            port: parse_env("PORT", 8000)?,
            rust_log: env_or("RUST_LOG", "info"),
            cors_allowed_origins: split_origins(&env_or(
                "CORS_ALLOWED_ORIGINS",
                DEFAULT_CORS_ORIGINS,
            )),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            llm_max_attempts: parse_env::<u32>("LLM_MAX_ATTEMPTS", 1)?.max(1),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_origins_trims_and_drops_empty() {
        let origins = split_origins(" http://a.test , ,http://b.test,");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_default_origins_cover_local_frontends() {
        let origins = split_origins(DEFAULT_CORS_ORIGINS);
        assert!(origins.contains(&"http://localhost:5173".to_string()));
        assert!(origins.contains(&"http://localhost:3000".to_string()));
    }
}
