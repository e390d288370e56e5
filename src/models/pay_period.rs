//! Pay period and period selector models.
//!
//! This module contains the [`PayPeriod`] (a calendar month) and the
//! [`PeriodSelector`] used to pick the periods a computation run covers.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A monthly pay period.
///
/// Periods order by year first, then month, so comparisons across a year
/// boundary behave as expected.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayPeriod;
///
/// let december = PayPeriod::new(2024, 12).unwrap();
/// let january = PayPeriod::new(2025, 1).unwrap();
/// assert!(december < january);
/// assert_eq!(december.next().unwrap(), january);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "PeriodParts")]
pub struct PayPeriod {
    year: i32,
    month: u32,
}

#[derive(Deserialize)]
struct PeriodParts {
    year: i32,
    month: u32,
}

impl TryFrom<PeriodParts> for PayPeriod {
    type Error = EngineError;

    fn try_from(parts: PeriodParts) -> Result<Self, Self::Error> {
        PayPeriod::new(parts.year, parts.month)
    }
}

impl PayPeriod {
    /// Creates a period, rejecting months outside 1..=12.
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::invalid_input(
                "month",
                format!("{} is not a calendar month (expected 1..=12)", month),
            ));
        }
        Ok(Self { year, month })
    }

    /// The period containing the given date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The calendar month, 1..=12.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following period.
    ///
    /// Fails with [`EngineError::InvalidInput`] when December of the last
    /// representable year has no successor.
    pub fn next(&self) -> EngineResult<Self> {
        if self.month < 12 {
            return Ok(Self {
                year: self.year,
                month: self.month + 1,
            });
        }
        let year = self.year.checked_add(1).ok_or_else(|| {
            EngineError::invalid_input("year", format!("no period follows {}", self))
        })?;
        Ok(Self { year, month: 1 })
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Selects which periods a run applies to.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{PayPeriod, PeriodSelector};
///
/// let range = PeriodSelector::range(
///     PayPeriod::new(2024, 11).unwrap(),
///     PayPeriod::new(2025, 2).unwrap(),
/// ).unwrap();
///
/// assert!(range.matches(PayPeriod::new(2024, 12).unwrap()));
/// assert!(!range.matches(PayPeriod::new(2025, 3).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodSelector {
    /// Exactly one period.
    Single(PayPeriod),
    /// An inclusive range of periods.
    Range {
        /// First period included.
        start: PayPeriod,
        /// Last period included.
        end: PayPeriod,
    },
}

impl PeriodSelector {
    /// Creates an inclusive range selector, rejecting a start after the end.
    pub fn range(start: PayPeriod, end: PayPeriod) -> EngineResult<Self> {
        let selector = PeriodSelector::Range { start, end };
        selector.validate()?;
        Ok(selector)
    }

    /// Checks that a range selector is not inverted.
    pub fn validate(&self) -> EngineResult<()> {
        match self {
            PeriodSelector::Range { start, end } if start > end => {
                Err(EngineError::invalid_input(
                    "period_selector",
                    format!("range start {} is after range end {}", start, end),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Returns true if the period is selected.
    pub fn matches(&self, period: PayPeriod) -> bool {
        match self {
            PeriodSelector::Single(selected) => *selected == period,
            PeriodSelector::Range { start, end } => *start <= period && period <= *end,
        }
    }
}
