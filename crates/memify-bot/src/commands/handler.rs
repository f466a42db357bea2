//! Command dispatcher: turns an incoming message into replies.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use memify::{MemeCandidate, MemeService, NoMemeAvailable};

use super::{texts, Command};
use crate::transport::ChatTransport;
use crate::types::{BotError, BotResult, Message};

/// What the adapter consumes from the acquisition core.
#[async_trait]
pub trait MemeSource: Send + Sync {
    async fn request_meme(&self) -> Result<MemeCandidate, NoMemeAvailable>;

    /// Memes served since the last exhaustion reset.
    async fn served_count(&self) -> usize;

    fn source_url(&self) -> String;
}

#[async_trait]
impl MemeSource for MemeService {
    async fn request_meme(&self) -> Result<MemeCandidate, NoMemeAvailable> {
        MemeService::request_meme(self).await
    }

    async fn served_count(&self) -> usize {
        MemeService::served_count(self).await
    }

    fn source_url(&self) -> String {
        MemeService::source_url(self).to_string()
    }
}

/// Routes parsed commands to the meme source and sends replies.
pub struct CommandHandler {
    source: Arc<dyn MemeSource>,
    transport: Arc<dyn ChatTransport>,
    bot_username: Option<String>,
}

impl CommandHandler {
    pub fn new(source: Arc<dyn MemeSource>, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            source,
            transport,
            bot_username: None,
        }
    }

    /// Only answer `/cmd@name` mentions addressed to this username.
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    /// Handle one message. Returns the command that was answered, if any.
    pub async fn handle_message(&self, message: &Message) -> BotResult<Option<Command>> {
        let Some(text) = message.text.as_deref() else {
            return Ok(None);
        };
        let Some(command) = Command::parse(text, self.bot_username.as_deref()) else {
            debug!("Ignoring non-command message from {}", message.sender_label());
            return Ok(None);
        };

        let chat_id = message.chat.id;
        match command {
            Command::Help => self.transport.send_text(chat_id, texts::WELCOME).await?,
            Command::Meme => self.send_meme(message).await?,
            Command::Stats => {
                let served = self.source.served_count().await;
                let reply = texts::stats(served, &self.source.source_url());
                self.transport.send_text(chat_id, &reply).await?;
            }
        }

        Ok(Some(command))
    }

    async fn send_meme(&self, message: &Message) -> BotResult<()> {
        let chat_id = message.chat.id;

        let meme = match self.source.request_meme().await {
            Ok(meme) => meme,
            Err(NoMemeAvailable) => {
                info!("No meme available for {}", message.sender_label());
                return self.transport.send_text(chat_id, texts::NO_MEME).await;
            }
        };

        match self
            .transport
            .send_photo(chat_id, meme.image_url.as_str(), &meme.caption)
            .await
        {
            Ok(()) => {
                info!("Meme sent to {}", message.sender_label());
                Ok(())
            }
            Err(e) => {
                let fault = BotError::Delivery(format!("{}: {e}", meme.image_url));
                error!("{fault}");
                self.transport.send_text(chat_id, texts::DELIVERY_FAULT).await
            }
        }
    }
}
