use std::collections::HashMap;

use super::extractors::StoreExtractor;
use crate::utils::error::AppError;

/// Store id -> extractor table, resolved once when a product is created.
#[derive(Debug, Clone, Default)]
pub struct ExtractorRegistry {
    extractors: HashMap<String, StoreExtractor>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every store supported out of the box.
    pub fn with_default_stores() -> Self {
        let mut registry = Self::new();
        for (store, extractor) in StoreExtractor::DEFAULT_STORES {
            registry.register(store, *extractor);
        }
        registry
    }

    pub fn register(&mut self, store_id: &str, extractor: StoreExtractor) {
        self.extractors.insert(store_id.to_ascii_lowercase(), extractor);
    }

    pub fn has_store(&self, store_id: &str) -> bool {
        self.extractors.contains_key(store_id)
    }

    /// Sorted list of supported store ids.
    pub fn stores(&self) -> Vec<&str> {
        let mut stores: Vec<&str> = self.extractors.keys().map(String::as_str).collect();
        stores.sort_unstable();
        stores
    }

    pub fn resolve(&self, store_id: &str) -> Result<StoreExtractor, AppError> {
        self.extractors
            .get(store_id)
            .copied()
            .ok_or_else(|| AppError::UnsupportedStore {
                store: store_id.to_string(),
            })
    }
}
