//! Period and population selection.
//!
//! This module picks the employees a computation run covers: active
//! employees whose assigned period matches the selector and, optionally,
//! whose division matches exactly.

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{Employee, PeriodSelector, ResultRecord};

/// The sentinel that disables division filtering.
pub const ALL_DIVISIONS: &str = "all";

/// Restricts a run to one division.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivisionFilter {
    /// Every division.
    #[default]
    All,
    /// Only the named division (exact match).
    Only(String),
}

impl DivisionFilter {
    /// Builds a filter from a request parameter; `"all"` disables filtering.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::calculation::DivisionFilter;
    ///
    /// assert_eq!(DivisionFilter::from_param("all"), DivisionFilter::All);
    /// assert_eq!(
    ///     DivisionFilter::from_param("Finance"),
    ///     DivisionFilter::Only("Finance".to_string())
    /// );
    /// ```
    pub fn from_param(value: &str) -> Self {
        if value == ALL_DIVISIONS {
            DivisionFilter::All
        } else {
            DivisionFilter::Only(value.to_string())
        }
    }

    /// Returns true if the division passes the filter.
    pub fn matches(&self, division: &str) -> bool {
        match self {
            DivisionFilter::All => true,
            DivisionFilter::Only(wanted) => wanted == division,
        }
    }
}

/// Selects the employees a run applies to, preserving input order.
///
/// Inactive employees are always excluded. An inverted range selector is
/// rejected; an empty result is not an error.
pub fn select_population<'a>(
    employees: &'a [Employee],
    selector: &PeriodSelector,
    division: &DivisionFilter,
) -> EngineResult<Vec<&'a Employee>> {
    selector.validate()?;

    Ok(employees
        .iter()
        .filter(|employee| employee.active)
        .filter(|employee| selector.matches(employee.period))
        .filter(|employee| division.matches(&employee.division))
        .collect())
}

/// Selects previously computed records by period.
pub fn filter_records<'a>(
    records: &'a [ResultRecord],
    selector: &PeriodSelector,
) -> EngineResult<Vec<&'a ResultRecord>> {
    selector.validate()?;

    Ok(records
        .iter()
        .filter(|record| selector.matches(record.period))
        .collect())
}
