use async_trait::async_trait;
use tokio::io::{AsyncWriteExt, Stdout};
use tokio::sync::Mutex;

use crate::models::Notification;
use crate::plugins::traits::NotificationSink;
use crate::utils::error::Result;

/// Writes notifications to stdout, one line each.
pub struct ConsoleNotifier {
    out: Mutex<Stdout>,
    currency_symbol: String,
}

impl ConsoleNotifier {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            out: Mutex::new(tokio::io::stdout()),
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn render(&self, recipient: &str, notification: &Notification) -> String {
        format!("[{}] {}\n", recipient, notification.message(&self.currency_symbol))
    }
}

#[async_trait]
impl NotificationSink for ConsoleNotifier {
    fn name(&self) -> &str {
        "console"
    }

    async fn notify(&self, recipient: &str, notification: &Notification) -> Result<()> {
        let line = self.render(recipient, notification);
        let mut out = self.out.lock().await;
        out.write_all(line.as_bytes()).await?;
        out.flush().await?;
        Ok(())
    }
}
