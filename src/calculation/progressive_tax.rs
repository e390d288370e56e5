//! Progressive (marginal-bracket) tax calculation.
//!
//! Each band taxes only the slice of income that falls inside it. The exact
//! decimal contributions are summed first and the total is floored once.

use rust_decimal::Decimal;

use crate::config::TaxBracketTable;
use crate::error::{EngineError, EngineResult};
use crate::models::Amount;

use super::rounding::floor_amount;

/// The statute that fixes the PPh 21 bands.
pub const PROGRESSIVE_TAX_LEGAL_REF: &str = "UU 7/2021 Pasal 17 ayat (1)";

/// The portion of taxable income taxed inside one band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketSlice {
    /// Band lower bound.
    pub lower_bound: Amount,
    /// Band upper bound, `None` for the top band.
    pub upper_bound: Option<Amount>,
    /// Marginal rate.
    pub rate: Decimal,
    /// Income falling inside the band.
    pub taxed_amount: Amount,
    /// Exact (unfloored) tax on that income.
    pub tax: Decimal,
}

/// Splits taxable income across the bands it reaches.
///
/// Bands entirely above the income are omitted.
pub fn bracket_slices(taxable_amount: Amount, table: &TaxBracketTable) -> Vec<BracketSlice> {
    if taxable_amount <= 0 {
        return Vec::new();
    }

    table
        .brackets()
        .iter()
        .take_while(|bracket| taxable_amount > bracket.lower_bound)
        .map(|bracket| {
            let top = match bracket.upper_bound {
                Some(upper) => taxable_amount.min(upper),
                None => taxable_amount,
            };
            let taxed_amount = top - bracket.lower_bound;
            BracketSlice {
                lower_bound: bracket.lower_bound,
                upper_bound: bracket.upper_bound,
                rate: bracket.rate,
                taxed_amount,
                tax: Decimal::from(taxed_amount) * bracket.rate,
            }
        })
        .collect()
}

/// Computes the tax due on a taxable amount using marginal brackets.
///
/// Zero and negative amounts owe nothing.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::compute_progressive_tax;
/// use payroll_engine::config::{TaxBracket, TaxBracketTable};
/// use rust_decimal::Decimal;
///
/// let table = TaxBracketTable::new(vec![
///     TaxBracket { lower_bound: 0, upper_bound: Some(60_000_000), rate: Decimal::new(5, 2) },
///     TaxBracket { lower_bound: 60_000_000, upper_bound: None, rate: Decimal::new(15, 2) },
/// ]).unwrap();
///
/// // 5% of 60M + 15% of 40M
/// assert_eq!(compute_progressive_tax(100_000_000, &table).unwrap(), 9_000_000);
/// assert_eq!(compute_progressive_tax(-5, &table).unwrap(), 0);
/// ```
pub fn compute_progressive_tax(
    taxable_amount: Amount,
    table: &TaxBracketTable,
) -> EngineResult<Amount> {
    let mut total = Decimal::ZERO;
    for slice in bracket_slices(taxable_amount, table) {
        total = total
            .checked_add(slice.tax)
            .ok_or_else(|| EngineError::overflow("progressive tax"))?;
    }
    floor_amount(total, "progressive tax")
}
