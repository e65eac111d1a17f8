use scraper::Html;

use super::dom;
use crate::plugins::traits::Extraction;
use crate::utils::error::{AppError, Result};
use crate::utils::format::parse_brl;

/// The page lists the lowest and highest current offers; both at zero means nobody sells it.
pub fn extract(document: &str) -> Result<Extraction> {
    let html = Html::parse_document(document);

    let name = dom::non_empty_text(dom::require(&html, "div.nome")?);

    let spans = dom::selector("span")?;
    let offers: Vec<String> = html
        .select(&spans)
        .filter(|span| span.children().all(|child| !child.value().is_element()))
        .map(dom::text)
        .filter(|text| text.starts_with("R$"))
        .collect();

    let [min, max] = match offers.as_slice() {
        [min, max, ..] => [min, max],
        _ => return Err(AppError::parse("expected a minimum and a maximum offer")),
    };

    let min_price = parse_brl(min)?;
    let max_price = parse_brl(max)?;
    if min_price.is_zero() && max_price.is_zero() {
        return Ok(Extraction::unavailable(name));
    }

    Ok(Extraction {
        name,
        price: min_price,
        available: true,
    })
}
