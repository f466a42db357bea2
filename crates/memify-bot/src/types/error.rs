//! Error types for the chat adapter.

/// All errors that can occur in the bot.
#[derive(thiserror::Error, Debug)]
pub enum BotError {
    /// Telegram answered `ok: false`.
    #[error("Telegram API error in {method}: {description}")]
    Api { method: String, description: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Handing a chosen meme to the user failed.
    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BotError {
    pub fn api(method: &str, description: impl Into<String>) -> Self {
        BotError::Api {
            method: method.to_string(),
            description: description.into(),
        }
    }
}

pub type BotResult<T> = Result<T, BotError>;
