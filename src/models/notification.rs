use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Product;
use crate::utils::format::format_price;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Restock,
    ThresholdMet,
}

/// A state transition worth telling the session owner about.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub name: String,
    pub price: Decimal,
    pub max_price: Decimal,
    pub url: String,
}

impl Notification {
    pub fn restock(product: &Product) -> Self {
        Self::from_product(NotificationKind::Restock, product)
    }

    pub fn threshold_met(product: &Product) -> Self {
        Self::from_product(NotificationKind::ThresholdMet, product)
    }

    fn from_product(kind: NotificationKind, product: &Product) -> Self {
        Self {
            kind,
            name: product.name.clone(),
            price: product.price,
            max_price: product.max_price,
            url: product.url.clone(),
        }
    }

    pub fn message(&self, currency_symbol: &str) -> String {
        let price = format!("{} {}", currency_symbol, format_price(self.price));
        match self.kind {
            NotificationKind::Restock => {
                format!("{} is back in stock at {}. {}", self.name, price, self.url)
            }
            NotificationKind::ThresholdMet => format!(
                "{} now costs {} (your limit was {} {}). Tracking stopped. {}",
                self.name,
                price,
                currency_symbol,
                format_price(self.max_price),
                self.url
            ),
        }
    }
}
