use scraper::Html;

use super::dom;
use crate::plugins::traits::Extraction;
use crate::utils::error::{AppError, Result};
use crate::utils::format::parse_brl;

/// Available pages carry the full product JSON on the header block; sold-out
/// pages only keep a reduced JSON on the wishlist button.
pub fn extract(document: &str) -> Result<Extraction> {
    let html = Html::parse_document(document);

    if dom::first(&html, "h1.header-product__title")?.is_some() {
        let header = dom::require(&html, "div.js-header-product")?;
        let data = dom::attr_json(header, "data-product")?;

        let price_text = data
            .get("bestPriceTemplate")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::parse("bestPriceTemplate missing from product data"))?;

        return Ok(Extraction {
            name: dom::json_str(&data, "/fullTitle"),
            price: parse_brl(price_text)?,
            available: true,
        });
    }

    let wishlist = dom::require(&html, "i.js-wishlist")?;
    let data = dom::attr_json(wishlist, "data-product")?;
    Ok(Extraction::unavailable(dom::json_str(&data, "/name")))
}
