use scraper::Html;

use super::dom;
use crate::plugins::traits::Extraction;
use crate::utils::error::Result;
use crate::utils::format::parse_brl;

pub fn extract(document: &str) -> Result<Extraction> {
    let html = Html::parse_document(document);

    let name = dom::non_empty_text(dom::require(&html, "span#productTitle")?);

    let price_block = match dom::first(&html, "span.priceToPay")? {
        Some(block) => Some(block),
        None => dom::first(&html, "span.apexPriceToPay")?,
    };
    let price = match price_block {
        Some(block) => dom::first_within(block, "span.a-offscreen")?,
        None => None,
    };

    match price {
        Some(price) => Ok(Extraction {
            name,
            price: parse_brl(&dom::text(price))?,
            available: true,
        }),
        None => Ok(Extraction::unavailable(name)),
    }
}
