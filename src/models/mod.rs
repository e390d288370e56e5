//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod calculation_result;
mod employee;
mod pay_period;

pub use calculation_result::{
    AuditStep, Breakdown, CompensationEvent, PaymentInstruction, PaymentStatus, RecordKind,
    ResultRecord, RunReport, Totals,
};
pub use employee::{Employee, EmploymentType, MAX_PTKP_DEPENDENTS, MaritalStatus};
pub use pay_period::{PayPeriod, PeriodSelector};

/// A monetary amount in whole rupiah.
///
/// `i64` leaves ample headroom for population-wide sums; every addition in
/// the engine is checked and reports [`crate::error::EngineError::Overflow`].
pub type Amount = i64;
