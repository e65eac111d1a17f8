//! Small helpers shared by the store extractors.

use scraper::{ElementRef, Html, Selector};

use crate::utils::error::{AppError, Result};

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AppError::parse(format!("bad selector '{}': {:?}", css, e)))
}

pub(crate) fn first<'a>(document: &'a Html, css: &str) -> Result<Option<ElementRef<'a>>> {
    let selector = selector(css)?;
    Ok(document.select(&selector).next())
}

pub(crate) fn require<'a>(document: &'a Html, css: &str) -> Result<ElementRef<'a>> {
    first(document, css)?.ok_or_else(|| AppError::parse(format!("element '{}' not found", css)))
}

pub(crate) fn first_within<'a>(element: ElementRef<'a>, css: &str) -> Result<Option<ElementRef<'a>>> {
    let selector = selector(css)?;
    Ok(element.select(&selector).next())
}

/// Collapsed text content of an element.
pub(crate) fn text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn non_empty_text(element: ElementRef<'_>) -> Option<String> {
    Some(text(element)).filter(|t| !t.is_empty())
}

/// Raw (uncollapsed) text, for script bodies.
pub(crate) fn raw_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

pub(crate) fn attr_json(element: ElementRef<'_>, attr: &str) -> Result<serde_json::Value> {
    let raw = element
        .value()
        .attr(attr)
        .ok_or_else(|| AppError::parse(format!("attribute '{}' not found", attr)))?;
    Ok(serde_json::from_str(raw)?)
}

pub(crate) fn json_str(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
