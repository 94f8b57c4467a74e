//! Money parsing and formatting.
//!
//! Amounts are kept as integer cents end to end. Forms submit decimal text
//! such as `"1,250.50"` or `"$45"`, which [`parse_amount`] converts.

use crate::error::CoreError;
use crate::types::Cents;

/// Parse a decimal amount (at most two fractional digits) into cents.
///
/// Accepts an optional leading `-`, an optional `$` and thousands
/// separators. Rejects anything else.
pub fn parse_amount(input: &str) -> Result<Cents, CoreError> {
    let invalid = || CoreError::Validation(format!("Invalid amount '{}'", input.trim()));

    let mut text = input.trim();
    let negative = text.starts_with('-');
    if negative {
        text = text[1..].trim_start();
    }
    text = text.strip_prefix('$').unwrap_or(text);

    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    let (whole, frac) = cleaned.split_once('.').unwrap_or((cleaned.as_str(), ""));

    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit())
        || !frac.chars().all(|c| c.is_ascii_digit())
        || frac.len() > 2
    {
        return Err(invalid());
    }

    let whole_value: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let frac_value: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => frac.parse().map_err(|_| invalid())?,
    };

    let cents = whole_value
        .checked_mul(100)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(invalid)?;

    Ok(if negative { -cents } else { cents })
}

/// Like [`parse_amount`], but blank input yields `None`.
pub fn parse_optional_amount(input: &str) -> Result<Option<Cents>, CoreError> {
    if input.trim().is_empty() {
        Ok(None)
    } else {
        parse_amount(input).map(Some)
    }
}

/// Format cents as `1,234.56` (no currency symbol).
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let whole = (abs / 100).to_string();
    let frac = abs % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}.{frac:02}")
}

/// Total for a quote line: `quantity * unit_price`, rounded to the cent.
pub fn line_total(quantity: f64, unit_price: Cents) -> Result<Cents, CoreError> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(CoreError::Validation(format!(
            "Quantity must be greater than zero, got {quantity}"
        )));
    }
    if unit_price < 0 {
        return Err(CoreError::InvalidAmount(
            "Unit price cannot be negative".to_string(),
        ));
    }
    Ok((quantity * unit_price as f64).round() as Cents)
}
