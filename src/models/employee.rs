//! Employee model and related types.
//!
//! This module defines the [`Employee`] fact consumed by every computation,
//! together with the [`EmploymentType`] and [`MaritalStatus`] enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{Amount, PayPeriod};

/// The number of dependents beyond which PTKP stops increasing.
pub const MAX_PTKP_DEPENDENTS: u32 = 3;

/// Represents the type of employment arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    /// Permanent employment (karyawan tetap).
    Permanent,
    /// Fixed-term contract employment (PKWT).
    Contract,
}

impl EmploymentType {
    /// Returns the snake_case label used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::Permanent => "permanent",
            EmploymentType::Contract => "contract",
        }
    }
}

/// Marital status as recorded for PTKP purposes.
///
/// Parsing is strict: anything other than a recognised married or single
/// label is rejected with [`EngineError::UnknownMaritalStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    /// Married (status K).
    #[serde(alias = "k")]
    Married,
    /// Not married (status TK).
    #[serde(alias = "tk")]
    Single,
}

impl MaritalStatus {
    /// Returns the PTKP status code ("K" or "TK").
    pub fn ptkp_code(&self) -> &'static str {
        match self {
            MaritalStatus::Married => "K",
            MaritalStatus::Single => "TK",
        }
    }
}

impl FromStr for MaritalStatus {
    type Err = EngineError;

    /// Parses a marital status label.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::MaritalStatus;
    ///
    /// assert_eq!("married".parse::<MaritalStatus>().unwrap(), MaritalStatus::Married);
    /// assert_eq!("TK".parse::<MaritalStatus>().unwrap(), MaritalStatus::Single);
    /// assert!("widowed".parse::<MaritalStatus>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "married" | "k" => Ok(MaritalStatus::Married),
            "single" | "tk" => Ok(MaritalStatus::Single),
            _ => Err(EngineError::UnknownMaritalStatus {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for MaritalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaritalStatus::Married => write!(f, "married"),
            MaritalStatus::Single => write!(f, "single"),
        }
    }
}

fn default_active() -> bool {
    true
}

/// A read-only snapshot of one employee, as supplied by the employee-master
/// collaborator for a single computation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique employee code (NIK karyawan).
    pub code: String,
    /// Display name.
    pub name: String,
    /// Division label; opaque to the engine apart from exact-match filtering.
    pub division: String,
    /// Job title; used for position-level classification.
    pub position: String,
    /// Monthly base salary.
    pub base_salary: Amount,
    /// Fixed monthly allowance (tunjangan tetap).
    #[serde(default)]
    pub fixed_allowance: Amount,
    /// Pre-computed attendance adjustment for the period; negative for deductions.
    #[serde(default)]
    pub attendance_adjustment: Amount,
    /// The type of employment arrangement.
    pub employment_type: EmploymentType,
    /// Marital status for PTKP.
    pub marital_status: MaritalStatus,
    /// Number of dependents; values above three count as three.
    #[serde(default)]
    pub dependent_count: u32,
    /// The pay period this fact is assigned to.
    pub period: PayPeriod,
    /// Inactive employees are never included in a run.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Employee {
    /// Returns true if the employee is on a fixed-term contract.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{Employee, EmploymentType, MaritalStatus, PayPeriod};
    ///
    /// let employee = Employee {
    ///     code: "EMP-001".to_string(),
    ///     name: "Sari".to_string(),
    ///     division: "Produksi".to_string(),
    ///     position: "Operator Mesin".to_string(),
    ///     base_salary: 4_500_000,
    ///     fixed_allowance: 0,
    ///     attendance_adjustment: 0,
    ///     employment_type: EmploymentType::Contract,
    ///     marital_status: MaritalStatus::Single,
    ///     dependent_count: 0,
    ///     period: PayPeriod::new(2025, 3).unwrap(),
    ///     active: true,
    /// };
    /// assert!(employee.is_contract());
    /// ```
    pub fn is_contract(&self) -> bool {
        self.employment_type == EmploymentType::Contract
    }

    /// Checks the monetary fields of the fact.
    ///
    /// Base salary must be positive and the fixed allowance must not be
    /// negative. The attendance adjustment is signed and checked later,
    /// against the gross it is applied to.
    pub fn validate(&self) -> EngineResult<()> {
        if self.base_salary <= 0 {
            return Err(self.invalid("base_salary", "must be positive"));
        }
        if self.fixed_allowance < 0 {
            return Err(self.invalid("fixed_allowance", "cannot be negative"));
        }
        Ok(())
    }

    pub(crate) fn invalid(&self, field: &str, message: impl Into<String>) -> EngineError {
        EngineError::InvalidEmployee {
            employee_code: self.code.clone(),
            field: field.to_string(),
            message: message.into(),
        }
    }
}
