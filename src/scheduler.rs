use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::config::MonitorConfig;
use crate::models::Notification;
use crate::plugins::traits::NotificationSink;
use crate::product_manager::ProductManager;
use crate::session::TrackedProducts;

/// Outcome of one pass over a session's products.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundReport {
    pub checked: usize,
    pub failed: usize,
    pub restocked: usize,
    pub retired: usize,
    pub notifications_sent: usize,
    pub notifications_failed: usize,
    /// The round stopped early because the session is shutting down.
    pub cancelled: bool,
}

/// Periodic re-check of one session's products.
///
/// A round holds the session guard from start to finish, network calls
/// included. Commands issued meanwhile wait for the round to end, so they are
/// applied strictly before or after it, never in the middle.
pub struct MonitorLoop {
    owner: String,
    products: TrackedProducts,
    product_manager: Arc<ProductManager>,
    sink: Arc<dyn NotificationSink>,
    config: MonitorConfig,
}

impl MonitorLoop {
    pub fn new(
        owner: impl Into<String>,
        products: TrackedProducts,
        product_manager: Arc<ProductManager>,
        sink: Arc<dyn NotificationSink>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            owner: owner.into(),
            products,
            product_manager,
            sink,
            config,
        }
    }

    /// Run rounds until `cancel` turns true or its sender goes away.
    pub async fn run(self, mut cancel: watch::Receiver<bool>) {
        tracing::info!("Monitor loop started for {}", self.owner);

        loop {
            if is_cancelled(&cancel) {
                break;
            }

            let report = self.round(&mut cancel).await;
            if report.cancelled {
                break;
            }

            if sleep_or_cancel(self.config.round_interval(), &mut cancel).await {
                break;
            }
        }

        tracing::info!("Monitor loop stopped for {}", self.owner);
    }

    /// Run a single round now.
    pub async fn run_round(&self) -> RoundReport {
        let (_keep_open, mut cancel) = watch::channel(false);
        self.round(&mut cancel).await
    }

    async fn round(&self, cancel: &mut watch::Receiver<bool>) -> RoundReport {
        let start_time = tokio::time::Instant::now();
        let mut report = RoundReport::default();

        let mut products = self.products.lock().await;
        let mut retire = vec![false; products.len()];

        for index in 0..products.len() {
            if index > 0 && sleep_or_cancel(self.config.item_delay(), cancel).await {
                report.cancelled = true;
                break;
            }

            report.checked += 1;
            let result = self.product_manager.check_product(&products[index]).await;
            let product = &mut products[index];

            let extraction = match result {
                Ok(extraction) => extraction,
                Err(e) => {
                    product.record_failure();
                    report.failed += 1;
                    if e.is_extraction_failure() {
                        tracing::warn!(
                            "Check failed for {} ({}), {} failures so far: {}",
                            product.url,
                            product.id,
                            product.failure_count,
                            e
                        );
                    } else {
                        tracing::error!("Unexpected error checking {} ({}): {}", product.url, product.id, e);
                    }
                    continue;
                }
            };

            let was_available = product.available;
            product.apply(&extraction);
            tracing::debug!(
                "{}: available {} -> {}, price {}",
                product.url,
                was_available,
                product.available,
                product.price
            );

            if !was_available && product.available {
                report.restocked += 1;
                self.deliver(&Notification::restock(product), &mut report).await;
            }

            if product.is_threshold_met() {
                retire[index] = true;
                self.deliver(&Notification::threshold_met(product), &mut report).await;
            }
        }

        // Positions refer to the sequence as it was when the round began.
        report.retired = retire.iter().filter(|r| **r).count();
        if report.retired > 0 {
            let mut mask = retire.iter();
            products.retain(|_| !mask.next().copied().unwrap_or(false));
        }
        drop(products);

        tracing::info!(
            "Round for {} done in {} ms: {} checked, {} failed, {} restocked, {} retired",
            self.owner,
            start_time.elapsed().as_millis(),
            report.checked,
            report.failed,
            report.restocked,
            report.retired
        );
        report
    }

    async fn deliver(&self, notification: &Notification, report: &mut RoundReport) {
        match self.sink.notify(&self.owner, notification).await {
            Ok(()) => report.notifications_sent += 1,
            Err(e) => {
                report.notifications_failed += 1;
                tracing::error!(
                    "Failed to deliver {:?} notification for {} via {}: {}",
                    notification.kind,
                    self.owner,
                    self.sink.name(),
                    e
                );
            }
        }
    }
}

fn is_cancelled(cancel: &watch::Receiver<bool>) -> bool {
    *cancel.borrow()
}

/// Sleep for `duration`, waking early on cancellation. Returns true when cancelled.
async fn sleep_or_cancel(duration: Duration, cancel: &mut watch::Receiver<bool>) -> bool {
    if is_cancelled(cancel) {
        return true;
    }
    if duration.is_zero() {
        return false;
    }

    let sleep = tokio::time::sleep(duration);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            _ = &mut sleep => return is_cancelled(cancel),
            changed = cancel.changed() => {
                if changed.is_err() || is_cancelled(cancel) {
                    return true;
                }
            }
        }
    }
}
