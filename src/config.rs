// src/config.rs
//! Startup configuration: two plain values from the environment, two secrets
//! from the OS credential store. Built once in `main` and passed to the
//! stages explicitly — no module-level credential state.

use crate::error::StageError;

// --- env names ---
pub const ENV_WORDPRESS_URL: &str = "WORDPRESS_URL";
pub const ENV_WORDPRESS_USERNAME: &str = "WORDPRESS_USERNAME";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_WORDPRESS_APP_PASSWORD: &str = "WORDPRESS_APP_PASSWORD";

// --- credential store (service, account) pairs ---
pub const KEYRING_OPENAI: (&str, &str) = ("openai", "api_key");
pub const KEYRING_WORDPRESS: (&str, &str) = ("wordpress", "application_password");

// --- pipeline constants ---
pub const SEARCH_TERM: &str = "artificial intelligence";
pub const MAX_TOPICS: usize = 5;
pub const OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const GENERATION_TEMPERATURE: f32 = 0.7;
pub const GENERATION_MAX_TOKENS: u32 = 1500;
pub const DEFAULT_CATEGORY_ID: i64 = 1;
pub const TAG_NAMES: [&str; 3] = ["AI", "Artificial Intelligence", "Technology"];

#[derive(Clone)]
pub struct AppConfig {
    pub wordpress_url: String,
    pub wordpress_username: String,
    pub wordpress_app_password: String,
    pub openai_api_key: String,
}

impl AppConfig {
    /// Collect all four required values. Any missing one is a fatal
    /// `Config` error naming what was absent, raised before any network
    /// activity.
    pub fn from_env() -> Result<Self, StageError> {
        let wordpress_url = require_env(ENV_WORDPRESS_URL)?;
        let wordpress_username = require_env(ENV_WORDPRESS_USERNAME)?;
        let openai_api_key = require_secret(KEYRING_OPENAI, ENV_OPENAI_API_KEY)?;
        let wordpress_app_password = require_secret(KEYRING_WORDPRESS, ENV_WORDPRESS_APP_PASSWORD)?;

        Ok(Self {
            wordpress_url,
            wordpress_username,
            wordpress_app_password,
            openai_api_key,
        })
    }
}

fn require_env(name: &str) -> Result<String, StageError> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| StageError::Config(format!("missing environment variable {name}")))
}

/// Secrets live in the OS keyring under a fixed (service, account) pair.
/// An environment variable is accepted as a fallback for headless runs.
fn require_secret(
    (service, account): (&str, &str),
    env_fallback: &str,
) -> Result<String, StageError> {
    let from_store = keyring::Entry::new(service, account)
        .and_then(|entry| entry.get_password())
        .ok()
        .filter(|v| !v.is_empty());

    from_store
        .or_else(|| {
            std::env::var(env_fallback)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
        .ok_or_else(|| {
            StageError::Config(format!(
                "missing secret: keyring entry ({service}, {account}) or env {env_fallback}"
            ))
        })
}

// Debug must never expose secret material.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("wordpress_url", &self.wordpress_url)
            .field("wordpress_username", &self.wordpress_username)
            .field("wordpress_app_password", &"***")
            .field("openai_api_key", &"***")
            .finish()
    }
}
