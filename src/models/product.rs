use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::plugins::extractors::StoreExtractor;
use crate::plugins::traits::Extraction;
use crate::utils::error::{AppError, Result};

// Second-level labels that sit under a country code, as in `amazon.com.br`.
const GENERIC_SECOND_LEVEL: &[&str] = &["com", "net", "org", "gov", "edu", "co"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub url: String,
    pub store_id: String,
    pub extractor: StoreExtractor,
    pub name: String,
    pub price: Decimal,
    pub available: bool,
    pub max_price: Decimal,
    pub failure_count: u32,

    pub created_at: DateTime<Utc>,
    pub last_checked: Option<DateTime<Utc>>,
}

/// Everything needed to build a record once its first extraction succeeded.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub url: String,
    pub store_id: String,
    pub extractor: StoreExtractor,
    pub max_price: Decimal,
    pub extraction: Extraction,
}

impl Product {
    pub fn new(new_product: NewProduct) -> Self {
        let now = Utc::now();
        let Extraction { name, price, available } = new_product.extraction;

        Self {
            id: Uuid::new_v4(),
            name: name.unwrap_or_else(|| new_product.url.clone()),
            url: new_product.url,
            store_id: new_product.store_id,
            extractor: new_product.extractor,
            price,
            available,
            max_price: new_product.max_price,
            failure_count: 0,
            created_at: now,
            last_checked: Some(now),
        }
    }

    /// Overwrite the mutable fields with a fresh extraction.
    ///
    /// A missing name keeps the one we already have.
    pub fn apply(&mut self, extraction: &Extraction) {
        if let Some(name) = &extraction.name {
            self.name = name.clone();
        }
        self.price = extraction.price;
        self.available = extraction.available;
        self.last_checked = Some(Utc::now());
    }

    pub fn record_failure(&mut self) {
        self.failure_count = self.failure_count.saturating_add(1);
    }

    /// True when tracking this item is done: it can be bought at or below the threshold.
    pub fn is_threshold_met(&self) -> bool {
        self.available && self.price <= self.max_price
    }
}

/// Derive the store identifier (registrable domain) from a product URL.
pub fn store_id_from_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url.trim())
        .map_err(|e| AppError::Validation(format!("invalid URL '{}': {}", url, e)))?;

    let host = parsed
        .host_str()
        .ok_or_else(|| AppError::Validation(format!("URL '{}' has no host", url)))?
        .trim_end_matches('.')
        .to_ascii_lowercase();

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() < 2 {
        return Ok(host);
    }

    let tld = labels[labels.len() - 1];
    let second = labels[labels.len() - 2];
    let keep = if labels.len() >= 3 && tld.len() == 2 && GENERIC_SECOND_LEVEL.contains(&second) {
        3
    } else {
        2
    };

    Ok(labels[labels.len() - keep..].join("."))
}
