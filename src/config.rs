use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub scraper: ScraperConfig,
    pub monitor: MonitorConfig,
    pub notifications: NotificationsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    pub user_agent: String,
    /// Upper bound for one fetch-and-extract, in seconds.
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub round_interval_secs: u64,
    /// Pause between two item checks inside a round.
    pub item_delay_ms: u64,
    pub max_items: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    pub currency_symbol: String,
    pub discord: DiscordConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    pub webhook_url: Option<String>,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub directory: String,
    pub file_name: String,
}

impl ScraperConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl MonitorConfig {
    pub fn round_interval(&self) -> Duration {
        Duration::from_secs(self.round_interval_secs)
    }

    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_ms)
    }
}

impl AppConfig {
    /// Layered load: built-in defaults, then the TOML file, then `RESTOCK__*` variables.
    ///
    /// Without an explicit path `config/default.toml` is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("scraper.user_agent", "restock-watcher/0.1")?
            .set_default("scraper.request_timeout_secs", 30_i64)?
            .set_default("monitor.round_interval_secs", 120_i64)?
            .set_default("monitor.item_delay_ms", 2000_i64)?
            .set_default("monitor.max_items", 100_i64)?
            .set_default("notifications.currency_symbol", "R$")?
            .set_default("notifications.discord.username", "Restock Watcher")?
            .set_default("logging.directory", "logs")?
            .set_default("logging.file_name", "restock-watcher.log")?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name("config/default").required(false)),
        };

        let config: AppConfig = builder
            .add_source(Environment::with_prefix("RESTOCK").separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scraper.request_timeout_secs == 0 {
            return Err(ConfigError::Message("Scraper request_timeout_secs must be greater than 0".into()));
        }

        if self.scraper.user_agent.trim().is_empty() {
            return Err(ConfigError::Message("Scraper user_agent cannot be empty".into()));
        }

        if self.monitor.round_interval_secs == 0 {
            return Err(ConfigError::Message("Monitor round_interval_secs must be greater than 0".into()));
        }

        if self.monitor.max_items == 0 {
            return Err(ConfigError::Message("Monitor max_items must be greater than 0".into()));
        }

        if let Some(webhook_url) = &self.notifications.discord.webhook_url {
            match Url::parse(webhook_url) {
                Ok(url) if url.scheme() == "https" || url.scheme() == "http" => {}
                _ => return Err(ConfigError::Message("Invalid Discord webhook URL format".into())),
            }
        }

        Ok(())
    }
}
