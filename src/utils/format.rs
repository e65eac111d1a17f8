use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

use super::error::{AppError, Result};

// Brazilian notation: "." groups thousands, "," separates cents.
static BRL_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,3}(?:\.\d{3})+(?:,\d{1,2})?|\d+(?:,\d{1,2})?").expect("valid BRL regex")
});

/// Parse a store-rendered BRL amount such as `R$ 1.299,90`.
pub fn parse_brl(text: &str) -> Result<Decimal> {
    let amount = BRL_AMOUNT
        .find(text)
        .ok_or_else(|| AppError::parse(format!("no price in {:?}", text.trim())))?;

    let normalized = amount.as_str().replace('.', "").replace(',', ".");
    Ok(Decimal::from_str(&normalized)?)
}

/// Parse a user-supplied threshold, accepting either `,` or `.` as the decimal separator.
pub fn parse_user_price(text: &str) -> Result<Decimal> {
    let normalized = text.trim().replace(',', ".");
    let price = Decimal::from_str(&normalized)
        .map_err(|_| AppError::Validation(format!("'{}' is not a valid price", text.trim())))?;

    if price.is_sign_negative() {
        return Err(AppError::Validation("price cannot be negative".to_string()));
    }
    Ok(price)
}

/// Read a non-negative price out of an embedded JSON document.
pub fn decimal_from_json(value: &serde_json::Value) -> Result<Decimal> {
    let price = match value {
        serde_json::Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))?,
        serde_json::Value::String(s) if s.contains(',') => parse_brl(s)?,
        serde_json::Value::String(s) => Decimal::from_str(s.trim())?,
        other => return Err(AppError::parse(format!("expected a price, found {}", other))),
    };

    if price.is_sign_negative() {
        return Err(AppError::parse(format!("negative price {}", price)));
    }
    Ok(price)
}

/// Render a price with exactly two fractional digits.
pub fn format_price(price: Decimal) -> String {
    let mut rounded = price.round_dp(2);
    rounded.rescale(2);
    rounded.to_string()
}
