use async_trait::async_trait;

use crate::models::Notification;
use crate::utils::error::Result;

/// Delivers notifications to the user who owns a session.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    fn name(&self) -> &str;

    async fn notify(&self, recipient: &str, notification: &Notification) -> Result<()>;
}
