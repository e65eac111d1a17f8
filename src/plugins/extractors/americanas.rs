use scraper::Html;

use super::dom;
use crate::plugins::traits::Extraction;
use crate::utils::error::{AppError, Result};
use crate::utils::format::decimal_from_json;

/// Shared layout of americanas, submarino and shoptime: a JSON-LD `@graph`
/// with a `Product` node.
pub fn extract(document: &str) -> Result<Extraction> {
    let html = Html::parse_document(document);
    let scripts = dom::selector(r#"script[type="application/ld+json"]"#)?;

    let mut product = None;
    for script in html.select(&scripts) {
        let Ok(data) = serde_json::from_str::<serde_json::Value>(&dom::raw_text(script)) else {
            continue;
        };
        let found = data
            .get("@graph")
            .and_then(|graph| graph.as_array())
            .and_then(|nodes| nodes.iter().find(|node| node["@type"] == "Product"))
            .cloned();
        if found.is_some() {
            product = found;
            break;
        }
    }

    let product = product.ok_or_else(|| AppError::parse("no Product node in JSON-LD graph"))?;

    let price = match product.pointer("/offers/lowPrice") {
        Some(value) if !value.is_null() => decimal_from_json(value)?,
        _ => rust_decimal::Decimal::ZERO,
    };

    Ok(Extraction {
        name: dom::json_str(&product, "/name"),
        available: !price.is_zero(),
        price,
    })
}
