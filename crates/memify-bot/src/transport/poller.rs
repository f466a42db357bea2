//! Long-polling loop: reads updates from Telegram and dispatches each one on
//! its own task.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::TelegramClient;
use crate::commands::CommandHandler;
use crate::types::BotResult;

const ERROR_BACKOFF: Duration = Duration::from_secs(3);

/// Drives `getUpdates` and hands messages to the [`CommandHandler`].
pub struct Poller {
    client: Arc<TelegramClient>,
    handler: Arc<CommandHandler>,
    poll_timeout_secs: u32,
    offset: i64,
}

impl Poller {
    pub fn new(
        client: Arc<TelegramClient>,
        handler: Arc<CommandHandler>,
        poll_timeout_secs: u32,
    ) -> Self {
        Self {
            client,
            handler,
            poll_timeout_secs,
            offset: 0,
        }
    }

    /// Next update id to ask for.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Run until Ctrl-C. A failed poll is logged and retried after a short pause.
    pub async fn run(&mut self) -> BotResult<()> {
        info!("Polling Telegram for updates");

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Ctrl-C received, shutting down");
                    break;
                }
                polled = self.poll_once() => {
                    if let Err(e) = polled {
                        warn!("getUpdates failed: {e}");
                        tokio::time::sleep(ERROR_BACKOFF).await;
                    }
                }
            }
        }

        Ok(())
    }

    /// One `getUpdates` round. Spawns a task per message and returns their handles.
    pub async fn poll_once(&mut self) -> BotResult<Vec<JoinHandle<()>>> {
        let updates = self
            .client
            .get_updates(self.offset, self.poll_timeout_secs)
            .await?;

        let mut tasks = Vec::with_capacity(updates.len());
        for update in updates {
            self.offset = self.offset.max(update.update_id + 1);

            let Some(message) = update.message else {
                continue;
            };

            let handler = Arc::clone(&self.handler);
            tasks.push(tokio::spawn(async move {
                if let Err(e) = handler.handle_message(&message).await {
                    error!(
                        "Failed to answer {} in chat {}: {e}",
                        message.sender_label(),
                        message.chat.id
                    );
                }
            }));
        }

        Ok(tasks)
    }
}
