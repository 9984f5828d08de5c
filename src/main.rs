//! # Main Entry Point
//!
//! Runs a search-and-reply bot:
//! - Domain: Configuration, Types, Traits
//! - Infrastructure: Twitter client
//! - Application: Bot cycle, Watermark store, Logging
//!
//! Usage: `marathon-runner <CONFIG> <CREDENTIALS>`

mod application;
mod domain;
mod infrastructure;
mod strings;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::application::bot::Bot;
use crate::domain::config::{BotConfig, Credentials};
use crate::infrastructure::twitter::TwitterFactory;

#[derive(Debug, Parser)]
#[command(version, about = "Replies to posts matching configured search terms")]
struct Args {
    /// Bot configuration document (YAML)
    config: PathBuf,
    /// Credentials document (YAML)
    credentials: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load Configuration
    let config = BotConfig::load(&args.config)?;

    // 2. Logging Setup
    let _log_guard = application::logging::init(config.log_path().as_deref())?;
    tracing::info!(
        "{}",
        strings::logs::config_loaded(&config.name, &config.username)
    );

    let credentials = Credentials::load(&args.credentials)?;

    // 3. Build the bot
    let mut bot = Bot::from_config(&config, Arc::new(TwitterFactory::new()))
        .context("Failed to initialize bot")?;
    bot.set_auth_credentials(
        credentials.consumer_key,
        credentials.consumer_secret,
        credentials.access_key,
        credentials.access_secret,
    );

    tracing::info!("{}", strings::logs::store_opened(bot.store().path()));
    tracing::info!("{}", strings::logs::behaviors_loaded(bot.behaviors().len()));

    // 4. Shutdown on Ctrl-C, forced on the second one
    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match application::shutdown::watch(shutdown, tokio::signal::ctrl_c).await {
            Ok(()) => std::process::exit(130),
            Err(e) => tracing::error!("{}", strings::logs::shutdown_fail(&e.to_string())),
        }
    });

    // 5. Poll loop
    tracing::info!(
        "{}",
        strings::logs::loop_start(bot.name(), bot.handle(), bot.delay().as_secs())
    );
    bot.run_forever(cancel).await?;
    Ok(())
}
