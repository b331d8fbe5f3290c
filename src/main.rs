//! Easel - pixiv repost bot for Discord
//!
//! Watches messages for pixiv links and re-posts the linked artwork as
//! attachments, preserving `||spoiler||` markup around the link.

mod common;
mod config;
mod discord;
mod pixiv;
mod policy;
mod scan;

use std::sync::Arc;

use anyhow::Result;
use serenity::prelude::*;
use tokio::signal;
use tracing::{error, info};

use config::env::get_config_path;
use discord::{RepostHandler, Reposter};
use pixiv::PixivClient;
use policy::AccessPolicy;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Easel v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_path = get_config_path();
    info!("Loading configuration from {}...", config_path);

    let config = config::load_and_validate(&config_path).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        error!("Please ensure {} exists and is properly formatted.", config_path);
        error!("See easel.conf.example for reference.");
        e
    })?;

    info!("Configuration loaded successfully");
    info!("  Token store: {}", config.pixiv.token_file);
    info!("  Staging dir: {}", config.pixiv.temp_dir);

    let tokens = pixiv::load_token_store(&config.pixiv.token_file)?;
    tokio::fs::create_dir_all(&config.pixiv.temp_dir).await?;

    let pixiv = Arc::new(PixivClient::new(tokens)?);
    let policy = AccessPolicy::from_config(config.access.as_ref());
    let reposter = Reposter::new(pixiv, &config.pixiv.temp_dir);
    let handler = RepostHandler::new(policy, reposter);

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord.token, intents)
        .event_handler(handler)
        .await?;

    // Disconnect the shards when the process is asked to stop
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutting down...");
        shard_manager.shutdown_all().await;
    });

    info!("Starting Discord client...");
    client.start().await?;

    info!("Exiting...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
