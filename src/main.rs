use anyhow::{Context, Result};
use clap::Parser;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use restock_watcher::commands::CommandGateway;
use restock_watcher::config::{AppConfig, LoggingConfig};
use restock_watcher::plugins::manager::ExtractorRegistry;
use restock_watcher::plugins::notifiers::console::ConsoleNotifier;
use restock_watcher::plugins::notifiers::discord::DiscordNotifier;
use restock_watcher::plugins::traits::NotificationSink;
use restock_watcher::product_manager::ProductManager;
use restock_watcher::scraper::WebScraper;
use restock_watcher::session::SessionManager;

/// Watches product pages and tells you when they restock or get cheap enough.
#[derive(Debug, Parser)]
#[command(name = "restock-watcher", version, about)]
struct Args {
    /// Path to a TOML config file (defaults to config/default.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Session owner for commands read from stdin
    #[arg(short, long, default_value = "local")]
    user: String,
}

fn setup_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&config.directory)
        .with_context(|| format!("Failed to create log directory {}", config.directory))?;

    let file_appender = tracing_appender::rolling::never(&config.directory, &config.file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("restock_watcher=info"));

    // stdout carries command replies, so console logs go to stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

fn build_sink(config: &AppConfig) -> Arc<dyn NotificationSink> {
    let notifications = &config.notifications;
    match &notifications.discord.webhook_url {
        Some(webhook_url) => {
            info!("Delivering notifications to Discord");
            Arc::new(DiscordNotifier::new(
                webhook_url.clone(),
                notifications.discord.username.clone(),
                notifications.currency_symbol.clone(),
            ))
        }
        None => {
            info!("No Discord webhook configured, notifications go to the console");
            Arc::new(ConsoleNotifier::new(notifications.currency_symbol.clone()))
        }
    }
}

/// Answer commands line by line until `input` ends or `shutdown` resolves.
///
/// `shutdown` is polled from one pinned future for the whole loop, so a signal
/// that arrives while a command is being handled is still observed.
async fn run_command_loop<R, S>(gateway: &CommandGateway, user: &str, input: R, shutdown: S) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    S: Future,
{
    let mut lines = input.lines();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("Failed to read stdin")? {
                    Some(line) if line.trim().is_empty() => continue,
                    Some(line) => println!("{}", gateway.handle(user, &line).await),
                    None => break,
                }
            }
            _ = &mut shutdown => break,
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    let _log_guard = setup_logging(&config.logging)?;

    info!("Starting Restock Watcher...");

    let fetcher = Arc::new(WebScraper::new(&config.scraper).context("Failed to build HTTP client")?);
    let registry = Arc::new(ExtractorRegistry::with_default_stores());
    info!("Supported stores: {}", registry.stores().join(", "));

    let product_manager = Arc::new(ProductManager::new(registry, fetcher, config.scraper.request_timeout()));
    let sessions = Arc::new(SessionManager::new(
        product_manager,
        build_sink(&config),
        config.monitor.clone(),
    ));
    let gateway = CommandGateway::new(Arc::clone(&sessions), config.notifications.currency_symbol.clone());

    println!("{}", gateway.handle(&args.user, "start").await);

    let stdin = BufReader::new(tokio::io::stdin());
    run_command_loop(&gateway, &args.user, stdin, tokio::signal::ctrl_c()).await?;

    info!("Shutting down...");
    sessions.shutdown_all().await;

    Ok(())
}
