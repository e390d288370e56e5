//! PTKP (non-taxable income threshold) resolution.
//!
//! This module maps a taxpayer's marital status and dependent count onto the
//! annual PTKP threshold from the configured tables.

use crate::config::PtkpTable;
use crate::error::{EngineError, EngineResult};
use crate::models::{Amount, MAX_PTKP_DEPENDENTS, MaritalStatus};

/// The regulation that fixes the PTKP amounts.
pub const PTKP_LEGAL_REF: &str = "PMK 101/PMK.010/2016";

/// Returns the annual PTKP threshold.
///
/// Dependent counts above three are treated exactly like three. A table
/// too short for the clamped count is reported as
/// [`EngineError::InvalidConfig`]; tables held by a
/// [`TaxConfig`](crate::config::TaxConfig) have already been validated.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::resolve_ptkp;
/// use payroll_engine::config::PtkpTable;
/// use payroll_engine::models::MaritalStatus;
///
/// let table = PtkpTable {
///     single: vec![54_000_000, 58_500_000, 63_000_000, 67_500_000],
///     married: vec![58_500_000, 63_000_000, 67_500_000, 72_000_000],
/// };
/// assert_eq!(resolve_ptkp(MaritalStatus::Married, 1, &table).unwrap(), 63_000_000);
/// assert_eq!(resolve_ptkp(MaritalStatus::Single, 9, &table).unwrap(), 67_500_000);
/// ```
pub fn resolve_ptkp(
    status: MaritalStatus,
    dependent_count: u32,
    table: &PtkpTable,
) -> EngineResult<Amount> {
    let index = dependent_count.min(MAX_PTKP_DEPENDENTS) as usize;
    table.for_status(status).get(index).copied().ok_or_else(|| {
        EngineError::invalid_config(
            "ptkp",
            format!(
                "no {} threshold for {} dependents",
                status.ptkp_code(),
                index
            ),
        )
    })
}

/// Parses a marital status label and resolves its threshold.
///
/// Unknown labels fail with
/// [`EngineError::UnknownMaritalStatus`](crate::error::EngineError::UnknownMaritalStatus)
/// instead of falling back to a default table.
pub fn resolve_ptkp_label(
    status: &str,
    dependent_count: u32,
    table: &PtkpTable,
) -> EngineResult<Amount> {
    let status: MaritalStatus = status.parse()?;
    resolve_ptkp(status, dependent_count, table)
}

/// The PTKP status code, e.g. "K/1" or "TK/3".
pub fn ptkp_status_code(status: MaritalStatus, dependent_count: u32) -> String {
    format!(
        "{}/{}",
        status.ptkp_code(),
        dependent_count.min(MAX_PTKP_DEPENDENTS)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::reference_config;

    fn table() -> PtkpTable {
        reference_config().ptkp().clone()
    }

    #[test]
    fn test_married_one_dependent_is_63_million() {
        assert_eq!(resolve_ptkp(MaritalStatus::Married, 1, &table()).unwrap(), 63_000_000);
    }

    #[test]
    fn test_single_no_dependents_is_54_million() {
        assert_eq!(resolve_ptkp(MaritalStatus::Single, 0, &table()).unwrap(), 54_000_000);
    }

    #[test]
    fn test_dependents_above_three_clamp_to_three() {
        let table = table();
        for count in [3, 4, 10, u32::MAX] {
            assert_eq!(resolve_ptkp(MaritalStatus::Married, count, &table).unwrap(), 72_000_000);
            assert_eq!(resolve_ptkp(MaritalStatus::Single, count, &table).unwrap(), 67_500_000);
        }
    }

    #[test]
    fn test_strictly_increasing_in_dependents() {
        let table = table();
        for status in [MaritalStatus::Single, MaritalStatus::Married] {
            for count in 0..3 {
                let lower = resolve_ptkp(status, count, &table).unwrap();
                let upper = resolve_ptkp(status, count + 1, &table).unwrap();
                assert!(upper > lower);
            }
        }
    }

    #[test]
    fn test_married_at_least_single_for_equal_dependents() {
        let table = table();
        for count in 0..=3 {
            assert!(
                resolve_ptkp(MaritalStatus::Married, count, &table).unwrap()
                    >= resolve_ptkp(MaritalStatus::Single, count, &table).unwrap()
            );
        }
    }

    #[test]
    fn test_marriage_adds_one_dependent_increment() {
        let table = table();
        assert_eq!(
            resolve_ptkp(MaritalStatus::Married, 0, &table).unwrap(),
            resolve_ptkp(MaritalStatus::Single, 1, &table).unwrap()
        );
    }

    #[test]
    fn test_short_table_is_an_error_not_a_panic() {
        let table = PtkpTable {
            single: vec![54_000_000],
            married: vec![58_500_000],
        };
        assert_eq!(resolve_ptkp(MaritalStatus::Single, 0, &table).unwrap(), 54_000_000);
        match resolve_ptkp(MaritalStatus::Single, 2, &table) {
            Err(EngineError::InvalidConfig { table, .. }) => assert_eq!(table, "ptkp"),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_label_resolution_fails_fast_on_unknown_status() {
        match resolve_ptkp_label("janda", 0, &table()) {
            Err(EngineError::UnknownMaritalStatus { value }) => assert_eq!(value, "janda"),
            other => panic!("Expected UnknownMaritalStatus, got {:?}", other),
        }
    }

    #[test]
    fn test_label_resolution_accepts_codes() {
        assert_eq!(resolve_ptkp_label("K", 2, &table()).unwrap(), 67_500_000);
        assert_eq!(resolve_ptkp_label("single", 1, &table()).unwrap(), 58_500_000);
    }

    #[test]
    fn test_status_code() {
        assert_eq!(ptkp_status_code(MaritalStatus::Married, 1), "K/1");
        assert_eq!(ptkp_status_code(MaritalStatus::Single, 5), "TK/3");
    }
}
