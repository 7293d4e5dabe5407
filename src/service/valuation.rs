// service/valuation.rs
use bigdecimal::BigDecimal;
use thiserror::Error;

use crate::{
    models::enquirymodel::Money,
    utils::decimal::BigDecimalHelpers,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValuationError {
    #[error("valuation must be greater than zero, got {0}")]
    NonPositive(String),

    #[error("valuation must be a finite number")]
    NonFinite,
}

fn check_valuation(value: f64) -> Result<f64, ValuationError> {
    if !value.is_finite() {
        return Err(ValuationError::NonFinite);
    }
    if value <= 0.0 {
        return Err(ValuationError::NonPositive(value.to_string()));
    }
    Ok(value)
}

fn check_amount(amount: &BigDecimal) -> Result<&BigDecimal, ValuationError> {
    if !amount.is_positive_amount() {
        return Err(ValuationError::NonPositive(amount.to_string()));
    }
    Ok(amount)
}

/// Unrounded closeness of two valuations in (0, 1]. 1.0 means identical values.
pub fn match_ratio(value_a: f64, value_b: f64) -> Result<f64, ValuationError> {
    let a = check_valuation(value_a)?;
    let b = check_valuation(value_b)?;

    Ok((a / b).min(b / a))
}

/// Symmetric match percentage between two valuations, rounded half up to a whole percent.
pub fn valuation_match(value_a: f64, value_b: f64) -> Result<u8, ValuationError> {
    let ratio = match_ratio(value_a, value_b)?;
    Ok((ratio * 100.0).round() as u8)
}

/// Same match as `valuation_match`, computed entirely in decimal so amounts beyond the
/// f64 range still compare correctly.
pub fn decimal_match(value_a: &BigDecimal, value_b: &BigDecimal) -> Result<u8, ValuationError> {
    let a = check_amount(value_a)?;
    let b = check_amount(value_b)?;

    let ratio = if a <= b { a / b } else { b / a };
    ratio.ratio_to_percent().ok_or(ValuationError::NonFinite)
}

pub fn money_match(offered: &Money, received: &Money) -> Result<u8, ValuationError> {
    decimal_match(&offered.amount, &received.amount)
}
