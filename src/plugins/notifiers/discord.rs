use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::models::{Notification, NotificationKind};
use crate::plugins::traits::NotificationSink;
use crate::utils::error::{AppError, Result};
use crate::utils::format::format_price;

/// Posts notifications to a Discord webhook as embeds.
pub struct DiscordNotifier {
    client: Client,
    webhook_url: String,
    username: String,
    currency_symbol: String,
}

impl DiscordNotifier {
    pub fn new(webhook_url: impl Into<String>, username: impl Into<String>, currency_symbol: impl Into<String>) -> Self {
        DiscordNotifier {
            client: Client::new(),
            webhook_url: webhook_url.into(),
            username: username.into(),
            currency_symbol: currency_symbol.into(),
        }
    }

    fn get_embed_color(&self, kind: NotificationKind) -> u32 {
        match kind {
            NotificationKind::ThresholdMet => 0x00ff00, // Green for a hit
            NotificationKind::Restock => 0x0099ff,      // Blue for stock updates
        }
    }

    fn get_title(&self, kind: NotificationKind) -> &str {
        match kind {
            NotificationKind::ThresholdMet => "💰 Price target reached",
            NotificationKind::Restock => "📦 Back in stock",
        }
    }

    fn create_embed(&self, recipient: &str, notification: &Notification) -> serde_json::Value {
        json!({
            "title": format!("{}: {}", self.get_title(notification.kind), notification.name),
            "url": notification.url,
            "description": notification.message(&self.currency_symbol),
            "color": self.get_embed_color(notification.kind),
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "fields": [
                {
                    "name": "Price",
                    "value": format!("{} {}", self.currency_symbol, format_price(notification.price)),
                    "inline": true
                },
                {
                    "name": "Limit",
                    "value": format!("{} {}", self.currency_symbol, format_price(notification.max_price)),
                    "inline": true
                }
            ],
            "footer": { "text": format!("Tracked for {}", recipient) }
        })
    }

    fn create_webhook_payload(&self, recipient: &str, notification: &Notification) -> serde_json::Value {
        json!({
            "username": self.username,
            "embeds": [self.create_embed(recipient, notification)]
        })
    }
}

#[async_trait]
impl NotificationSink for DiscordNotifier {
    fn name(&self) -> &str {
        "discord"
    }

    async fn notify(&self, recipient: &str, notification: &Notification) -> Result<()> {
        let payload = self.create_webhook_payload(recipient, notification);

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Notification(format!("Discord webhook request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Notification(format!("Discord webhook returned {}", status)));
        }

        tracing::debug!("Delivered {:?} notification for {} to Discord", notification.kind, recipient);
        Ok(())
    }
}
