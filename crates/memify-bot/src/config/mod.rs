//! Configuration loading and resolution.

use crate::types::{BotError, BotResult};

/// Public Telegram Bot API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Seconds a single `getUpdates` call may hang waiting for messages.
pub const DEFAULT_POLL_TIMEOUT_SECS: u32 = 30;

/// Settings for talking to Telegram.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub api_url: String,
    pub poll_timeout_secs: u32,
}

impl BotConfig {
    /// Resolve from CLI flags, falling back to the environment.
    pub fn resolve(token: Option<&str>, api_url: Option<&str>) -> BotResult<Self> {
        Self::resolve_with(token, api_url, |key| std::env::var(key).ok())
    }

    pub fn resolve_with<F>(token: Option<&str>, api_url: Option<&str>, lookup: F) -> BotResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            token: resolve_token(token, &lookup)?,
            api_url: resolve_api_url(api_url, &lookup),
            poll_timeout_secs: lookup("TELEGRAM_POLL_TIMEOUT_SECS")
                .and_then(|raw| raw.trim().parse().ok())
                .unwrap_or(DEFAULT_POLL_TIMEOUT_SECS),
        })
    }
}

/// Resolve the bot token: flag, then `MEMIFY_BOT_TOKEN`, then `TELEGRAM_BOT_TOKEN`.
pub fn resolve_token<F>(explicit: Option<&str>, lookup: &F) -> BotResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    explicit
        .map(str::to_string)
        .or_else(|| lookup("MEMIFY_BOT_TOKEN"))
        .or_else(|| lookup("TELEGRAM_BOT_TOKEN"))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            BotError::Config(
                "bot token missing: pass --token or set MEMIFY_BOT_TOKEN".to_string(),
            )
        })
}

/// Resolve the Bot API base URL.
pub fn resolve_api_url<F>(explicit: Option<&str>, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    explicit
        .map(str::to_string)
        .or_else(|| lookup("TELEGRAM_API_URL"))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}
