//! Placement-Bot main entry point
//!
//! This is the command-line interface for the placement lookup bot.

use anyhow::Context;
use clap::Parser;
use placement_bot::bot::{ConsoleSession, Dispatcher};
use placement_bot::config::{load_config_with_hash, Config};
use placement_bot::telegram::{run_bot, TelegramApi};
use placement_bot::BotError;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Placement-Bot: freshman placement lookups over Telegram
///
/// Students send their admission number; the bot fetches their placement
/// from the university portal and replies with the result.
#[derive(Parser, Debug)]
#[command(name = "placement-bot")]
#[command(version)]
#[command(about = "Telegram bot for freshman placement lookups", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Bot API token (overrides [bot].token)
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and print the effective settings without starting the bot
    #[arg(long, conflicts_with = "lookup")]
    dry_run: bool,

    /// Look up one admission number, print the reply and exit
    #[arg(long, value_name = "ID", conflicts_with = "dry_run")]
    lookup: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, cli.token.is_some());
    } else if let Some(identifier) = &cli.lookup {
        handle_lookup(&config, identifier).await?;
    } else {
        handle_serve(config, cli.token).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("placement_bot=info,warn"),
            1 => EnvFilter::new("placement_bot=debug,info"),
            2 => EnvFilter::new("placement_bot=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --dry-run: shows the effective configuration
fn handle_dry_run(config: &Config, cli_token: bool) {
    println!("=== Placement-Bot Dry Run ===\n");

    println!("Portal:");
    println!("  Endpoint: {}", config.portal.endpoint);
    println!("  Query parameter: {}", config.portal.query_param);
    println!("  Timeout: {}s", config.portal.timeout_secs);
    println!("  User agent: {}", config.portal.user_agent);
    println!(
        "  Accept invalid certificates: {}",
        config.portal.accept_invalid_certs
    );

    println!("\nBot:");
    println!("  API URL: {}", config.bot.api_url);
    println!("  Poll timeout: {}s", config.bot.poll_timeout_secs);
    println!(
        "  Token: {}",
        if cli_token || config.bot.token.is_some() {
            "configured"
        } else {
            "missing"
        }
    );

    println!("\nDedup window: {}ms", config.dedup.window_ms);

    println!("\n✓ Configuration is valid");
}

/// Handles --lookup: one lookup through the dispatcher, printed to stdout
async fn handle_lookup(config: &Config, identifier: &str) -> anyhow::Result<()> {
    let dispatcher = Dispatcher::from_config(config)?;
    let session = ConsoleSession::new();

    let outcome = dispatcher.lookup(&session, identifier).await?;
    tracing::debug!("Lookup outcome: {:?}", outcome);

    Ok(())
}

/// Runs the Telegram bot until shutdown
async fn handle_serve(config: Config, cli_token: Option<String>) -> anyhow::Result<()> {
    let token = cli_token
        .or_else(|| config.bot.token.clone())
        .ok_or(BotError::MissingToken)?;

    tracing::info!("Portal endpoint: {}", config.portal.endpoint);
    tracing::info!("Starting JU Placement Bot...");

    let dispatcher = Arc::new(Dispatcher::from_config(&config)?);
    let api = TelegramApi::new(&config.bot, &token)?;

    match run_bot(api, dispatcher, config.bot.poll_timeout_secs).await {
        Ok(()) => {
            tracing::info!("Bot stopped");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Failed to run bot: {}", e);
            Err(e.into())
        }
    }
}
