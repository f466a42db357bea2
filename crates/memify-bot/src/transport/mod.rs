//! Transport layer: how replies reach users and how updates arrive.

pub mod poller;
pub mod telegram;

use async_trait::async_trait;

use crate::types::BotResult;

pub use poller::Poller;
pub use telegram::TelegramClient;

/// Outbound side of the chat: the delivery seam for replies and memes.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str) -> BotResult<()>;

    /// Send a photo by URL with a caption.
    async fn send_photo(&self, chat_id: i64, photo_url: &str, caption: &str) -> BotResult<()>;
}
