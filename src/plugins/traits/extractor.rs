use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::error::Result;

/// What a store page says about a product right now.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Extraction {
    pub name: Option<String>,
    pub price: Decimal,
    pub available: bool,
}

impl Extraction {
    pub fn unavailable(name: Option<String>) -> Self {
        Self {
            name,
            price: Decimal::ZERO,
            available: false,
        }
    }
}

/// Maps a fetched document to an [`Extraction`].
///
/// Implementations are pure functions of the document. Missing or malformed
/// fields must come back as `AppError::Parse`, never as a made-up value.
pub trait Extractor: Send + Sync {
    fn extract(&self, document: &str) -> Result<Extraction>;
}
