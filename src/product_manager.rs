use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

use crate::models::{NewProduct, Product, store_id_from_url};
use crate::plugins::extractors::StoreExtractor;
use crate::plugins::manager::ExtractorRegistry;
use crate::plugins::traits::{Extraction, Extractor};
use crate::scraper::DocumentFetcher;
use crate::utils::error::{AppError, Result};

/// Creates product records and re-checks them: store lookup, fetch, extraction.
pub struct ProductManager {
    registry: Arc<ExtractorRegistry>,
    fetcher: Arc<dyn DocumentFetcher>,
    check_timeout: Duration,
}

impl ProductManager {
    pub fn new(registry: Arc<ExtractorRegistry>, fetcher: Arc<dyn DocumentFetcher>, check_timeout: Duration) -> Self {
        Self {
            registry,
            fetcher,
            check_timeout,
        }
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    /// Build a record from its first successful extraction.
    ///
    /// Fails without creating anything if the store is unsupported or the
    /// page cannot be fetched or understood.
    pub async fn create_product(&self, url: &str, max_price: Decimal) -> Result<Product> {
        if max_price.is_sign_negative() {
            return Err(AppError::Validation("price cannot be negative".to_string()));
        }

        let url = url.trim();
        let store_id = store_id_from_url(url)?;
        let extractor = self.registry.resolve(&store_id)?;

        tracing::info!("New product: {} at {}", url, store_id);
        let extraction = self.fetch_and_extract(url, extractor).await?;

        let product = Product::new(NewProduct {
            url: url.to_string(),
            store_id,
            extractor,
            max_price,
            extraction,
        });

        tracing::info!("Product '{}' ({}) created", product.name, product.id);
        Ok(product)
    }

    /// Current state of a tracked product, without touching the record.
    pub async fn check_product(&self, product: &Product) -> Result<Extraction> {
        self.fetch_and_extract(&product.url, product.extractor).await
    }

    async fn fetch_and_extract(&self, url: &str, extractor: StoreExtractor) -> Result<Extraction> {
        let fetch = self.fetcher.fetch(url);
        let document = tokio::time::timeout(self.check_timeout, fetch)
            .await
            .map_err(|_| AppError::fetch(url, format!("timed out after {:?}", self.check_timeout)))??;

        extractor.extract(&document)
    }
}
