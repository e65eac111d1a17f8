use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, RwLock, watch};
use tokio::task::JoinHandle;

use crate::config::MonitorConfig;
use crate::models::Product;
use crate::plugins::traits::NotificationSink;
use crate::product_manager::ProductManager;
use crate::scheduler::MonitorLoop;
use crate::utils::error::{AppError, Result};

/// A session's ordered product list behind its single guard.
///
/// Every read and write goes through the guard; the monitor loop holds it for
/// a whole round.
#[derive(Clone, Default)]
pub struct TrackedProducts {
    inner: Arc<Mutex<Vec<Product>>>,
}

impl TrackedProducts {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, Vec<Product>> {
        self.inner.lock().await
    }

    /// Append unless the list already holds `max_items` entries.
    pub async fn push(&self, product: Product, max_items: usize) -> Result<()> {
        let mut products = self.inner.lock().await;
        if products.len() >= max_items {
            return Err(AppError::Capacity { max: max_items });
        }
        products.push(product);
        Ok(())
    }

    /// Remove by 1-based position.
    pub async fn remove(&self, position: usize) -> Result<Product> {
        let mut products = self.inner.lock().await;
        if position == 0 || position > products.len() {
            return Err(AppError::Range {
                position,
                len: products.len(),
            });
        }
        Ok(products.remove(position - 1))
    }

    pub async fn snapshot(&self) -> Vec<Product> {
        self.inner.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// One user's tracked products and the monitor task bound to them.
///
/// State lives only in memory and is gone after a restart.
pub struct Session {
    owner: String,
    products: TrackedProducts,
    product_manager: Arc<ProductManager>,
    max_items: usize,
    cancel_tx: watch::Sender<bool>,
    monitor: Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    /// A session with no monitor running yet.
    pub fn new(owner: impl Into<String>, product_manager: Arc<ProductManager>, max_items: usize) -> Self {
        let (cancel_tx, _) = watch::channel(false);
        Self {
            owner: owner.into(),
            products: TrackedProducts::new(),
            product_manager,
            max_items,
            cancel_tx,
            monitor: Mutex::new(None),
        }
    }

    /// Create a session and start its monitor loop.
    pub async fn start(
        owner: impl Into<String>,
        product_manager: Arc<ProductManager>,
        sink: Arc<dyn NotificationSink>,
        config: MonitorConfig,
    ) -> Self {
        let session = Self::new(owner, product_manager, config.max_items);
        session.start_monitor(sink, config).await;
        session
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn products(&self) -> &TrackedProducts {
        &self.products
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// A monitor loop bound to this session's product list.
    pub fn monitor_loop(&self, sink: Arc<dyn NotificationSink>, config: MonitorConfig) -> MonitorLoop {
        MonitorLoop::new(
            self.owner.clone(),
            self.products.clone(),
            Arc::clone(&self.product_manager),
            sink,
            config,
        )
    }

    /// Spawn the monitor task. A session never runs more than one.
    pub async fn start_monitor(&self, sink: Arc<dyn NotificationSink>, config: MonitorConfig) {
        let mut monitor = self.monitor.lock().await;
        if monitor.as_ref().is_some_and(|handle| !handle.is_finished()) {
            tracing::debug!("Monitor for {} already running", self.owner);
            return;
        }
        if *self.cancel_tx.borrow() {
            tracing::debug!("Session for {} is shut down, not starting a monitor", self.owner);
            return;
        }

        let monitor_loop = self.monitor_loop(sink, config);
        let cancel = self.cancel_tx.subscribe();
        *monitor = Some(tokio::spawn(monitor_loop.run(cancel)));
    }

    pub async fn is_monitoring(&self) -> bool {
        self.monitor
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Create a product from `url` and start tracking it.
    ///
    /// The page is fetched before the guard is taken, so a slow store does not
    /// block the session.
    pub async fn add(&self, url: &str, max_price: Decimal) -> Result<Product> {
        let product = self.product_manager.create_product(url, max_price).await?;
        self.products.push(product.clone(), self.max_items).await?;

        tracing::info!("{} now tracks '{}' ({})", self.owner, product.name, product.id);
        Ok(product)
    }

    /// Stop tracking the product at the 1-based `position`.
    pub async fn remove(&self, position: usize) -> Result<Product> {
        let product = self.products.remove(position).await?;
        tracing::info!("{} stopped tracking '{}' ({})", self.owner, product.name, product.id);
        Ok(product)
    }

    pub async fn snapshot(&self) -> Vec<Product> {
        self.products.snapshot().await
    }

    /// Signal the monitor to stop and wait for it. An in-flight check is allowed to finish.
    pub async fn shutdown(&self) {
        self.cancel_tx.send_replace(true);

        let handle = self.monitor.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::warn!("Monitor task for {} ended abnormally: {}", self.owner, e);
            }
        }
        tracing::info!("Session for {} shut down", self.owner);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel_tx.send_replace(true);
    }
}

/// All live sessions, keyed by user.
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    product_manager: Arc<ProductManager>,
    sink: Arc<dyn NotificationSink>,
    config: MonitorConfig,
}

impl SessionManager {
    pub fn new(product_manager: Arc<ProductManager>, sink: Arc<dyn NotificationSink>, config: MonitorConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            product_manager,
            sink,
            config,
        }
    }

    pub fn product_manager(&self) -> &ProductManager {
        &self.product_manager
    }

    pub async fn get(&self, user: &str) -> Option<Arc<Session>> {
        self.sessions.read().await.get(user).cloned()
    }

    /// Existing session for `user`, or a fresh one with its monitor running.
    /// The flag is true when the session was just created.
    pub async fn get_or_start(&self, user: &str) -> (Arc<Session>, bool) {
        if let Some(session) = self.get(user).await {
            return (session, false);
        }

        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get(user) {
            return (Arc::clone(session), false);
        }

        let session = Arc::new(
            Session::start(
                user,
                Arc::clone(&self.product_manager),
                Arc::clone(&self.sink),
                self.config.clone(),
            )
            .await,
        );
        sessions.insert(user.to_string(), Arc::clone(&session));
        tracing::info!("Started session for {}", user);
        (session, true)
    }

    /// Tear down one user's session. Returns false if there was none.
    pub async fn stop(&self, user: &str) -> bool {
        let session = self.sessions.write().await.remove(user);
        match session {
            Some(session) => {
                session.shutdown().await;
                true
            }
            None => false,
        }
    }

    pub async fn shutdown_all(&self) {
        let sessions: Vec<Arc<Session>> = self.sessions.write().await.drain().map(|(_, s)| s).collect();
        for session in sessions {
            session.shutdown().await;
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
