//! Population computation runs.
//!
//! A run selects the employees a request covers, derives one record per
//! employee in parallel, and reduces the records into totals.

use std::time::Instant;

use chrono::Utc;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::TaxConfig;
use crate::error::EngineResult;
use crate::models::{AuditStep, Employee, PeriodSelector, ResultRecord, RunReport};

use super::aggregation::aggregate;
use super::annual_bonus::calculate_annual_bonus;
use super::holiday_allowance::calculate_holiday_allowance;
use super::income_tax::calculate_monthly_withholding;
use super::population::{DivisionFilter, select_population};
use super::retroactive_settlement::{RetroactiveTerms, calculate_retroactive_settlement};

/// The derivation a run applies to every selected employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Computation {
    /// Regular monthly PPh 21 withholding.
    MonthlyWithholding,
    /// Holiday allowance (THR).
    HolidayAllowance,
    /// Annual bonus at a base-salary multiplier.
    AnnualBonus {
        /// Months of base salary paid.
        multiplier: u32,
    },
    /// Retroactive settlement (Surut).
    RetroactiveSettlement(RetroactiveTerms),
}

impl Computation {
    /// Returns a short label for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Computation::MonthlyWithholding => "monthly_withholding",
            Computation::HolidayAllowance => "holiday_allowance",
            Computation::AnnualBonus { .. } => "annual_bonus",
            Computation::RetroactiveSettlement(_) => "retroactive_settlement",
        }
    }

    /// Derives the record and audit step for one employee.
    pub fn derive(
        &self,
        employee: &Employee,
        config: &TaxConfig,
    ) -> EngineResult<(ResultRecord, AuditStep)> {
        match *self {
            Computation::MonthlyWithholding => calculate_monthly_withholding(employee, config)
                .map(|result| (result.record, result.audit_step)),
            Computation::HolidayAllowance => calculate_holiday_allowance(employee, config)
                .map(|result| (result.record, result.audit_step)),
            Computation::AnnualBonus { multiplier } => calculate_annual_bonus(employee, multiplier)
                .map(|result| (result.record, result.audit_step)),
            Computation::RetroactiveSettlement(terms) => {
                calculate_retroactive_settlement(employee, terms, config)
                    .map(|result| (result.record, result.audit_step))
            }
        }
    }
}

/// What a run covers and what it computes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    /// The periods included.
    pub selector: PeriodSelector,
    /// Optional division restriction.
    #[serde(default)]
    pub division: DivisionFilter,
    /// The derivation applied to each employee.
    pub computation: Computation,
}

/// Runs a computation over a population.
///
/// Records keep the input order of the selected employees. The first
/// failing employee aborts the run; an empty population yields an empty
/// report with zero totals.
pub fn run_payroll(
    employees: &[Employee],
    request: &RunRequest,
    config: &TaxConfig,
) -> EngineResult<RunReport> {
    let run_id = Uuid::new_v4();
    let start_time = Instant::now();

    let population = select_population(employees, &request.selector, &request.division)?;
    info!(
        run_id = %run_id,
        computation = request.computation.as_str(),
        candidates = employees.len(),
        population = population.len(),
        "Starting payroll run"
    );

    let derived: Vec<(ResultRecord, AuditStep)> = population
        .par_iter()
        .map(|employee| request.computation.derive(employee, config))
        .collect::<EngineResult<_>>()
        .inspect_err(|err| warn!(run_id = %run_id, error = %err, "Payroll run failed"))?;

    let (records, audit_trace): (Vec<_>, Vec<_>) = derived.into_iter().unzip();
    let totals = aggregate(&records)?;

    debug!(
        run_id = %run_id,
        withheld = totals.withheld_amount,
        breakdown_components = totals.breakdown.len(),
        "Aggregated run totals"
    );
    info!(
        run_id = %run_id,
        records = totals.record_count,
        gross = totals.gross_amount,
        net = totals.net_amount,
        duration_us = start_time.elapsed().as_micros() as u64,
        "Payroll run completed"
    );

    Ok(RunReport {
        run_id,
        computed_at: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        regime_version: config.regime().version.clone(),
        records,
        totals,
        audit_trace,
    })
}
