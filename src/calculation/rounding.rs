//! Conversion between exact decimal intermediates and whole-rupiah amounts.
//!
//! Every fractional intermediate is floored, never rounded half-up. All
//! amounts handled here are non-negative, so flooring and truncation agree.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{EngineError, EngineResult};
use crate::models::Amount;

/// Floors a decimal to a whole amount.
pub fn floor_amount(value: Decimal, context: &str) -> EngineResult<Amount> {
    value
        .floor()
        .to_i64()
        .ok_or_else(|| EngineError::overflow(context))
}

/// Multiplies an amount by a rate and floors the product.
pub fn apply_rate(amount: Amount, rate: Decimal, context: &str) -> EngineResult<Amount> {
    let product = Decimal::from(amount)
        .checked_mul(rate)
        .ok_or_else(|| EngineError::overflow(context))?;
    floor_amount(product, context)
}

/// Adds two amounts, reporting overflow instead of wrapping.
pub fn checked_add(a: Amount, b: Amount, context: &str) -> EngineResult<Amount> {
    a.checked_add(b).ok_or_else(|| EngineError::overflow(context))
}

/// Subtracts `b` from `a`, reporting overflow instead of wrapping.
pub fn checked_sub(a: Amount, b: Amount, context: &str) -> EngineResult<Amount> {
    a.checked_sub(b).ok_or_else(|| EngineError::overflow(context))
}

/// Multiplies two amounts, reporting overflow instead of wrapping.
pub fn checked_mul(a: Amount, b: Amount, context: &str) -> EngineResult<Amount> {
    a.checked_mul(b).ok_or_else(|| EngineError::overflow(context))
}
