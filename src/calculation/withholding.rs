//! Withholding modes.
//!
//! Regular salary is withheld through the progressive brackets; one-off
//! events are withheld at a flat rate on their gross. Callers pick the mode
//! explicitly for each rule.

use rust_decimal::Decimal;

use crate::config::TaxBracketTable;
use crate::error::{EngineError, EngineResult};
use crate::models::Amount;

use super::progressive_tax::compute_progressive_tax;
use super::rounding::apply_rate;

/// How tax is withheld from an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithholdingMode {
    /// Marginal brackets applied to the amount.
    Progressive,
    /// A single rate applied to the whole amount.
    Flat(Decimal),
}

/// Withholds a flat share of a gross amount, flooring the result.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::flat_withholding;
/// use rust_decimal::Decimal;
///
/// assert_eq!(flat_withholding(756_000, Decimal::new(5, 2)).unwrap(), 37_800);
/// ```
pub fn flat_withholding(gross: Amount, rate: Decimal) -> EngineResult<Amount> {
    if gross < 0 {
        return Err(EngineError::invalid_input(
            "gross",
            format!("cannot withhold from a negative amount ({})", gross),
        ));
    }
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(EngineError::invalid_input(
            "rate",
            format!("{} is outside [0, 1]", rate),
        ));
    }
    apply_rate(gross, rate, "flat withholding")
}

/// Withholds tax from an amount in the given mode.
pub fn withhold(
    amount: Amount,
    mode: WithholdingMode,
    brackets: &TaxBracketTable,
) -> EngineResult<Amount> {
    match mode {
        WithholdingMode::Progressive => compute_progressive_tax(amount, brackets),
        WithholdingMode::Flat(rate) => flat_withholding(amount, rate),
    }
}
