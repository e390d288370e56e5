//! Payroll Tax & Statutory Compensation Engine
//!
//! This crate computes Indonesian PPh 21 withholding and the statutory
//! compensation events paid alongside regular salary: the holiday allowance
//! (THR), the annual bonus, and the retroactive wage-increase settlement
//! (Surut). Every operation is a pure function of employee facts and a
//! validated tax-regime configuration.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
