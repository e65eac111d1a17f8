use scraper::Html;

use super::dom;
use crate::plugins::traits::Extraction;
use crate::utils::error::Result;
use crate::utils::format::parse_brl;

/// Shared layout of casasbahia, extra and pontofrio. The price element is
/// only rendered while the product can be bought.
pub fn extract(document: &str) -> Result<Extraction> {
    let html = Html::parse_document(document);

    let name = dom::non_empty_text(dom::require(&html, "h1")?);

    match dom::first(&html, "span#product-price")? {
        Some(price) => Ok(Extraction {
            name,
            price: parse_brl(&dom::text(price))?,
            available: true,
        }),
        None => Ok(Extraction::unavailable(name)),
    }
}
