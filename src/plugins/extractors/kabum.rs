use rust_decimal::Decimal;
use scraper::Html;

use super::dom;
use crate::plugins::traits::Extraction;
use crate::utils::error::{AppError, Result};
use crate::utils::format::decimal_from_json;

/// Product data lives in the Next.js bootstrap script.
pub fn extract(document: &str) -> Result<Extraction> {
    let html = Html::parse_document(document);
    let script = dom::require(&html, "script#__NEXT_DATA__")?;
    let data: serde_json::Value = serde_json::from_str(&dom::raw_text(script))?;

    let product = data
        .pointer("/props/pageProps/productData")
        .filter(|v| v.is_object())
        .ok_or_else(|| AppError::parse("productData missing from __NEXT_DATA__"))?;

    let price = match product.pointer("/priceDetails/discountPrice") {
        Some(value) if !value.is_null() => decimal_from_json(value)?,
        _ => Decimal::ZERO,
    };

    Ok(Extraction {
        name: dom::json_str(product, "/name"),
        price,
        available: product.get("available").and_then(|v| v.as_bool()).unwrap_or(false),
    })
}
