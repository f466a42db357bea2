//! Memify Bot: Telegram adapter for the meme acquisition core.

pub mod commands;
pub mod config;
pub mod transport;
pub mod types;

pub use commands::{Command, CommandHandler, MemeSource};
pub use config::BotConfig;
pub use transport::{ChatTransport, Poller, TelegramClient};
