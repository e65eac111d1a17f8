use rust_decimal::Decimal;
use scraper::Html;

use super::dom;
use crate::plugins::traits::Extraction;
use crate::utils::error::Result;
use crate::utils::format::parse_brl;

/// The store renders an empty shell for products it no longer carries, so a
/// missing title reads as "unavailable" rather than as a broken page.
pub fn extract(document: &str) -> Result<Extraction> {
    let html = Html::parse_document(document);

    let Some(title) = dom::first(&html, "h1.title")? else {
        return Ok(Extraction::unavailable(None));
    };

    let fraction = dom::first(&html, "span.price-fraction")?;
    let cents = dom::first(&html, "span.price-cents")?;
    let price = match (fraction, cents) {
        (Some(fraction), Some(cents)) => {
            parse_brl(&format!("{}{}", dom::text(fraction), dom::text(cents)))?
        }
        _ => Decimal::ZERO,
    };

    Ok(Extraction {
        name: dom::non_empty_text(title),
        available: !price.is_zero(),
        price,
    })
}
