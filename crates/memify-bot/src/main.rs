//! Memify Bot entry point.

use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde_json::json;

use memify::{AcquisitionConfig, MemeService};
use memify_bot::commands::CommandHandler;
use memify_bot::config::BotConfig;
use memify_bot::transport::{Poller, TelegramClient};

#[derive(Parser)]
#[command(
    name = "memify-bot",
    about = "Memify Bot: serves fresh memes from Memify.ru without repeats",
    version
)]
struct Cli {
    /// Telegram bot token. Also reads MEMIFY_BOT_TOKEN / TELEGRAM_BOT_TOKEN.
    #[arg(long, global = true)]
    token: Option<String>,

    /// Telegram Bot API base URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot with long polling (default).
    Serve,

    /// Run one acquisition cycle and print the candidates as JSON.
    Fetch {
        /// Skip the static path and render with Chromium.
        #[arg(long)]
        render: bool,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let bot_config = BotConfig::resolve(cli.token.as_deref(), cli.api_url.as_deref())?;
            let acquisition = AcquisitionConfig::from_env();
            let service = Arc::new(MemeService::from_config(&acquisition)?);
            let client = Arc::new(TelegramClient::new(&bot_config)?);

            let mut handler = CommandHandler::new(service, client.clone());
            match client.get_me().await {
                Ok(me) => {
                    let name = me.username.as_deref().unwrap_or(&me.first_name);
                    tracing::info!("Memify Bot started as {name}");
                    if let Some(username) = me.username {
                        handler = handler.with_bot_username(username);
                    }
                }
                Err(e) => tracing::warn!("getMe failed, mentions will not be filtered: {e}"),
            }
            tracing::info!("Source: {}", acquisition.target_url);

            let mut poller = Poller::new(client, Arc::new(handler), bot_config.poll_timeout_secs);
            poller.run().await?;
        }

        Commands::Fetch { render } => {
            let acquisition = AcquisitionConfig::from_env();
            let service = MemeService::from_config(&acquisition)?;
            let result = if render {
                service.pipeline().acquire_rendered().await
            } else {
                service.pipeline().acquire().await
            };

            let path = match &result {
                memify::Acquisition::Candidates { path, .. } => Some(path.to_string()),
                memify::Acquisition::Empty => None,
            };
            let info = json!({
                "source": acquisition.target_url.as_str(),
                "path": path,
                "count": result.len(),
                "candidates": result.items(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "memify-bot", &mut std::io::stdout());
        }
    }

    Ok(())
}
