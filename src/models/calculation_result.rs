//! Calculation result models for the payroll engine.
//!
//! This module contains the per-employee [`ResultRecord`], the population
//! [`Totals`], the [`AuditStep`] that explains each derivation, and the
//! envelope types handed to reporting and payment collaborators.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

use super::{Amount, PayPeriod};

/// The one-off statutory compensation events the engine derives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompensationEvent {
    /// Holiday allowance (THR).
    HolidayAllowance,
    /// Annual bonus.
    AnnualBonus,
    /// Retroactive wage-increase settlement (Surut).
    RetroactiveSettlement,
}

/// What produced a [`ResultRecord`].
///
/// # Example
///
/// ```
/// use payroll_engine::models::{CompensationEvent, RecordKind};
///
/// let kind = RecordKind::Event(CompensationEvent::HolidayAllowance);
/// assert_eq!(serde_json::to_string(&kind).unwrap(), r#"{"event":"holiday_allowance"}"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Regular monthly salary with PPh 21 withholding.
    MonthlyWithholding,
    /// A one-off compensation event.
    Event(CompensationEvent),
}

/// Named breakdown components, ordered by name.
pub type Breakdown = BTreeMap<String, Amount>;

/// The computed outcome for one employee, one period, one kind of payment.
///
/// [`ResultRecord::new`] derives the net amount so that
/// `net = gross - withheld` holds. Deserialized records go through the same
/// checks and are rejected when the stored net does not reconcile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RecordParts")]
pub struct ResultRecord {
    /// The employee this record is for.
    pub employee_code: String,
    /// The period the record is assigned to.
    pub period: PayPeriod,
    /// What produced the record.
    pub kind: RecordKind,
    /// Gross amount before withholding.
    pub gross_amount: Amount,
    /// Tax withheld.
    pub withheld_amount: Amount,
    /// Amount payable: gross minus withheld.
    pub net_amount: Amount,
    /// Named components that make up the gross and the withholding.
    pub breakdown: Breakdown,
}

impl ResultRecord {
    /// Builds a record, rejecting negative gross or withholding.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{CompensationEvent, PayPeriod, RecordKind, ResultRecord};
    /// use std::collections::BTreeMap;
    ///
    /// let record = ResultRecord::new(
    ///     "EMP-001",
    ///     PayPeriod::new(2025, 3).unwrap(),
    ///     RecordKind::Event(CompensationEvent::AnnualBonus),
    ///     12_000_000,
    ///     0,
    ///     BTreeMap::new(),
    /// ).unwrap();
    /// assert_eq!(record.net_amount, 12_000_000);
    /// ```
    pub fn new(
        employee_code: impl Into<String>,
        period: PayPeriod,
        kind: RecordKind,
        gross_amount: Amount,
        withheld_amount: Amount,
        breakdown: Breakdown,
    ) -> EngineResult<Self> {
        if gross_amount < 0 {
            return Err(EngineError::invalid_input(
                "gross_amount",
                format!("cannot be negative (got {})", gross_amount),
            ));
        }
        if withheld_amount < 0 {
            return Err(EngineError::invalid_input(
                "withheld_amount",
                format!("cannot be negative (got {})", withheld_amount),
            ));
        }
        let net_amount = gross_amount
            .checked_sub(withheld_amount)
            .ok_or_else(|| EngineError::overflow("net amount"))?;

        Ok(Self {
            employee_code: employee_code.into(),
            period,
            kind,
            gross_amount,
            withheld_amount,
            net_amount,
            breakdown,
        })
    }
}

#[derive(Deserialize)]
struct RecordParts {
    employee_code: String,
    period: PayPeriod,
    kind: RecordKind,
    gross_amount: Amount,
    withheld_amount: Amount,
    net_amount: Amount,
    #[serde(default)]
    breakdown: Breakdown,
}

impl TryFrom<RecordParts> for ResultRecord {
    type Error = EngineError;

    fn try_from(parts: RecordParts) -> Result<Self, Self::Error> {
        let record = ResultRecord::new(
            parts.employee_code,
            parts.period,
            parts.kind,
            parts.gross_amount,
            parts.withheld_amount,
            parts.breakdown,
        )?;
        if record.net_amount != parts.net_amount {
            return Err(EngineError::invalid_input(
                "net_amount",
                format!(
                    "{} does not equal gross {} minus withheld {}",
                    parts.net_amount, record.gross_amount, record.withheld_amount
                ),
            ));
        }
        Ok(record)
    }
}

/// Population totals produced by aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Number of records summed.
    pub record_count: usize,
    /// Sum of gross amounts.
    pub gross_amount: Amount,
    /// Sum of withheld amounts.
    pub withheld_amount: Amount,
    /// Sum of net amounts.
    pub net_amount: Amount,
    /// Sums of the breakdown components present on every record.
    pub breakdown: Breakdown,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The regulation the rule implements.
    pub legal_ref: String,
    /// The employee the rule was applied to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_code: Option<String>,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The status a payment collaborator is asked to move a payment into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Approved for payment.
    Approved,
    /// Paid out.
    Paid,
}

/// A request for the payment collaborator to pay an employee's net amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInstruction {
    /// The employee to pay.
    pub employee_code: String,
    /// The period the payment belongs to.
    pub period: PayPeriod,
    /// What is being paid.
    pub kind: RecordKind,
    /// The amount to pay.
    pub net_amount: Amount,
    /// The status transition being requested.
    pub requested_status: PaymentStatus,
}

/// The complete output of a computation run.
///
/// `records` and `totals` depend only on the inputs; `run_id` and
/// `computed_at` identify the run itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// When the run was performed.
    pub computed_at: DateTime<Utc>,
    /// The version of the engine that performed the run.
    pub engine_version: String,
    /// The tax regime version the run was computed under.
    pub regime_version: String,
    /// Per-employee records, in population order.
    pub records: Vec<ResultRecord>,
    /// Totals over `records`.
    pub totals: Totals,
    /// One audit step per record.
    pub audit_trace: Vec<AuditStep>,
}
