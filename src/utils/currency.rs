/// Currency utility functions for enquiry valuations
///
/// Wizard amounts arrive as free text ("8,500,000", "9500000.00") and are kept as
/// `BigDecimal` so no precision is lost before a ratio is actually needed.
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_traits::Zero;

// Largest decimal exponent accepted in either direction ("1e400", "1e-400").
const MAX_AMOUNT_EXPONENT: i64 = 1000;

/// Validate and parse an amount string into a decimal.
/// Thousands separators, underscores and surrounding whitespace are ignored.
pub fn parse_amount(amount_str: &str) -> Result<BigDecimal, String> {
    let cleaned: String = amount_str
        .chars()
        .filter(|c| *c != ',' && *c != '_' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err("Amount is required".to_string());
    }

    BigDecimal::from_str(&cleaned)
        .map_err(|_| "Invalid amount format".to_string())
        .and_then(|amount| {
            let (_, scale) = amount.as_bigint_and_exponent();
            if scale.unsigned_abs() > MAX_AMOUNT_EXPONENT as u64 {
                Err("Amount is out of range".to_string())
            } else if amount < BigDecimal::zero() {
                Err("Amount cannot be negative".to_string())
            } else {
                Ok(amount)
            }
        })
}

/// Format an amount with its currency code and 2 decimal places
pub fn format_amount(amount: &BigDecimal, currency: &str) -> String {
    format!("{} {}", currency, amount.with_scale(2))
}

/// Currency codes are compared case-insensitively and stored upper-case.
pub fn normalize_currency(code: &str) -> String {
    code.trim().to_uppercase()
}
