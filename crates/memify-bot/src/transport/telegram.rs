//! Telegram Bot API client over reqwest.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::ChatTransport;
use crate::config::BotConfig;
use crate::types::{
    ApiResponse, BotError, BotResult, GetUpdatesParams, SendMessageParams, SendPhotoParams,
    Update, User,
};

/// Telegram rejects photo captions longer than this many characters.
pub const MAX_CAPTION_CHARS: usize = 1024;

/// Slack on top of the long-poll timeout before the HTTP request gives up.
const POLL_GRACE_SECS: u64 = 10;
const SEND_TIMEOUT_SECS: u64 = 30;

/// Thin JSON client for the Bot API methods the bot uses.
#[derive(Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    base: String,
}

impl TelegramClient {
    pub fn new(config: &BotConfig) -> BotResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base: format!("{}/bot{}", config.api_url.trim_end_matches('/'), config.token),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.base, method)
    }

    async fn call<P, T>(&self, method: &str, params: &P, timeout: Duration) -> BotResult<T>
    where
        P: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .timeout(timeout)
            .json(params)
            .send()
            .await?;

        let body = response.text().await?;
        let parsed: ApiResponse<T> = serde_json::from_str(&body)?;

        if !parsed.ok {
            return Err(BotError::api(
                method,
                parsed
                    .description
                    .unwrap_or_else(|| format!("error code {:?}", parsed.error_code)),
            ));
        }

        parsed
            .result
            .ok_or_else(|| BotError::api(method, "response has no result"))
    }

    /// Identity of the bot behind the token.
    pub async fn get_me(&self) -> BotResult<User> {
        self.call(
            "getMe",
            &serde_json::json!({}),
            Duration::from_secs(SEND_TIMEOUT_SECS),
        )
        .await
    }

    /// Long-poll for updates with ids `>= offset`.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u32) -> BotResult<Vec<Update>> {
        let params = GetUpdatesParams {
            offset,
            timeout: timeout_secs,
            allowed_updates: vec!["message"],
        };
        let updates: Vec<Update> = self
            .call(
                "getUpdates",
                &params,
                Duration::from_secs(u64::from(timeout_secs) + POLL_GRACE_SECS),
            )
            .await?;
        debug!("getUpdates(offset={offset}) returned {}", updates.len());
        Ok(updates)
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn send_text(&self, chat_id: i64, text: &str) -> BotResult<()> {
        let _: serde_json::Value = self
            .call(
                "sendMessage",
                &SendMessageParams { chat_id, text },
                Duration::from_secs(SEND_TIMEOUT_SECS),
            )
            .await?;
        Ok(())
    }

    async fn send_photo(&self, chat_id: i64, photo_url: &str, caption: &str) -> BotResult<()> {
        let caption = fit_caption(caption);
        let _: serde_json::Value = self
            .call(
                "sendPhoto",
                &SendPhotoParams {
                    chat_id,
                    photo: photo_url,
                    caption: &caption,
                },
                Duration::from_secs(SEND_TIMEOUT_SECS),
            )
            .await?;
        Ok(())
    }
}

/// Cut a caption to Telegram's limit on a character boundary.
pub fn fit_caption(caption: &str) -> String {
    if caption.chars().count() <= MAX_CAPTION_CHARS {
        return caption.to_string();
    }
    let mut cut: String = caption.chars().take(MAX_CAPTION_CHARS - 1).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_captions_pass_through() {
        assert_eq!(fit_caption("Мем с Memify.ru"), "Мем с Memify.ru");
    }

    #[test]
    fn long_captions_are_cut_on_char_boundary() {
        let long = "ы".repeat(MAX_CAPTION_CHARS + 50);
        let cut = fit_caption(&long);
        assert_eq!(cut.chars().count(), MAX_CAPTION_CHARS);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn method_url_embeds_token() {
        let client = TelegramClient::new(&BotConfig {
            token: "123:abc".to_string(),
            api_url: "http://localhost:8081/".to_string(),
            poll_timeout_secs: 1,
        })
        .unwrap();
        assert_eq!(
            client.method_url("getMe"),
            "http://localhost:8081/bot123:abc/getMe"
        );
    }
}
