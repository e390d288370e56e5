//! Retroactive wage-increase settlement (Surut) calculation functionality.
//!
//! When the annual base-wage increase is set after the year has started,
//! the difference for the months already paid at the old rate is settled
//! as one lump sum and withheld at a flat rate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::TaxConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Amount, AuditStep, Breakdown, CompensationEvent, Employee, RecordKind, ResultRecord,
};

use super::rounding::{checked_add, checked_mul, checked_sub, floor_amount};
use super::withholding::flat_withholding;

/// Maximum number of back-months a settlement can cover.
pub const MAX_REALIZATION_MONTHS: u32 = 12;

/// The regulation under which the annual wage increase is set.
pub const RETROACTIVE_SETTLEMENT_LEGAL_REF: &str = "PP 51/2023";

/// Terms of a retroactive settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetroactiveTerms {
    /// Wage increase in percent, 0..=100 with at most one decimal place.
    pub increase_pct: Decimal,
    /// Number of back-months owed, 0..=12.
    pub realization_months: u32,
}

impl RetroactiveTerms {
    /// Checks percentage range and precision and the month count.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::calculation::RetroactiveTerms;
    /// use rust_decimal::Decimal;
    ///
    /// let ok = RetroactiveTerms { increase_pct: Decimal::new(65, 1), realization_months: 3 };
    /// assert!(ok.validate().is_ok());
    ///
    /// let too_precise = RetroactiveTerms {
    ///     increase_pct: Decimal::new(625, 2),
    ///     realization_months: 3,
    /// };
    /// assert!(too_precise.validate().is_err());
    /// ```
    pub fn validate(&self) -> EngineResult<()> {
        let pct = self.increase_pct;
        if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
            return Err(EngineError::invalid_input(
                "increase_pct",
                format!("{} is outside 0..=100", pct),
            ));
        }
        if pct.normalize().scale() > 1 {
            return Err(EngineError::invalid_input(
                "increase_pct",
                format!("{} has more than one decimal place", pct),
            ));
        }
        if self.realization_months > MAX_REALIZATION_MONTHS {
            return Err(EngineError::invalid_input(
                "realization_months",
                format!(
                    "{} exceeds the maximum of {}",
                    self.realization_months, MAX_REALIZATION_MONTHS
                ),
            ));
        }
        Ok(())
    }
}

/// Every figure of a settlement, in derivation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementFigures {
    /// Salary after the increase.
    pub new_salary: Amount,
    /// Allowance after the increase.
    pub new_allowance: Amount,
    /// Salary plus allowance difference owed per month.
    pub monthly_difference: Amount,
    /// Difference times the number of back-months.
    pub gross: Amount,
    /// Flat withholding on the gross.
    pub withheld: Amount,
    /// Gross minus withheld.
    pub net: Amount,
}

fn raise(amount: Amount, increase_pct: Decimal, context: &str) -> EngineResult<Amount> {
    let factor = (Decimal::ONE_HUNDRED + increase_pct) / Decimal::ONE_HUNDRED;
    let raised = Decimal::from(amount)
        .checked_mul(factor)
        .ok_or_else(|| EngineError::overflow(context))?;
    floor_amount(raised, context)
}

/// Computes a settlement from prior-period amounts.
///
/// A zero percentage or zero back-months yields all-zero figures.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{RetroactiveTerms, compute_settlement};
/// use rust_decimal::Decimal;
///
/// let terms = RetroactiveTerms { increase_pct: Decimal::new(60, 1), realization_months: 3 };
/// let figures = compute_settlement(4_000_000, 200_000, terms, Decimal::new(5, 2)).unwrap();
/// assert_eq!(figures.monthly_difference, 252_000);
/// assert_eq!(figures.gross, 756_000);
/// assert_eq!(figures.net, 718_200);
/// ```
pub fn compute_settlement(
    prior_salary: Amount,
    prior_allowance: Amount,
    terms: RetroactiveTerms,
    withholding_rate: Decimal,
) -> EngineResult<SettlementFigures> {
    terms.validate()?;
    if prior_salary < 0 {
        return Err(EngineError::invalid_input(
            "prior_salary",
            "cannot be negative",
        ));
    }
    if prior_allowance < 0 {
        return Err(EngineError::invalid_input(
            "prior_allowance",
            "cannot be negative",
        ));
    }

    let new_salary = raise(prior_salary, terms.increase_pct, "new salary")?;
    let new_allowance = raise(prior_allowance, terms.increase_pct, "new allowance")?;

    let salary_difference = checked_sub(new_salary, prior_salary, "salary difference")?;
    let allowance_difference =
        checked_sub(new_allowance, prior_allowance, "allowance difference")?;
    let monthly_difference =
        checked_add(salary_difference, allowance_difference, "monthly difference")?;

    let gross = checked_mul(
        monthly_difference,
        i64::from(terms.realization_months),
        "settlement gross",
    )?;
    let withheld = flat_withholding(gross, withholding_rate)?;
    let net = checked_sub(gross, withheld, "settlement net")?;

    Ok(SettlementFigures {
        new_salary,
        new_allowance,
        monthly_difference,
        gross,
        withheld,
        net,
    })
}

/// The result of a retroactive settlement calculation.
#[derive(Debug, Clone)]
pub struct RetroactiveSettlementResult {
    /// The computed record.
    pub record: ResultRecord,
    /// Intermediate figures.
    pub figures: SettlementFigures,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the settlement for an employee, taking the current base salary
/// and fixed allowance as the prior-period amounts.
pub fn calculate_retroactive_settlement(
    employee: &Employee,
    terms: RetroactiveTerms,
    config: &TaxConfig,
) -> EngineResult<RetroactiveSettlementResult> {
    employee.validate()?;

    let rate = config.event_withholding().retroactive_settlement_rate;
    let figures = compute_settlement(employee.base_salary, employee.fixed_allowance, terms, rate)?;

    let mut breakdown = Breakdown::new();
    breakdown.insert("prior_salary".to_string(), employee.base_salary);
    breakdown.insert("prior_allowance".to_string(), employee.fixed_allowance);
    breakdown.insert("new_salary".to_string(), figures.new_salary);
    breakdown.insert("new_allowance".to_string(), figures.new_allowance);
    breakdown.insert("monthly_difference".to_string(), figures.monthly_difference);

    let record = ResultRecord::new(
        employee.code.clone(),
        employee.period,
        RecordKind::Event(CompensationEvent::RetroactiveSettlement),
        figures.gross,
        figures.withheld,
        breakdown,
    )?;

    let audit_step = AuditStep {
        rule_id: "retroactive_settlement".to_string(),
        rule_name: "Retroactive Settlement (Surut)".to_string(),
        legal_ref: RETROACTIVE_SETTLEMENT_LEGAL_REF.to_string(),
        employee_code: Some(employee.code.clone()),
        input: serde_json::json!({
            "prior_salary": employee.base_salary,
            "prior_allowance": employee.fixed_allowance,
            "increase_pct": terms.increase_pct.normalize().to_string(),
            "realization_months": terms.realization_months,
        }),
        output: serde_json::json!({
            "new_salary": figures.new_salary,
            "new_allowance": figures.new_allowance,
            "monthly_difference": figures.monthly_difference,
            "gross": figures.gross,
            "withheld": figures.withheld,
            "net": figures.net,
        }),
        reasoning: format!(
            "{} per month x {} months = {}; {} withheld at {}",
            figures.monthly_difference,
            terms.realization_months,
            figures.gross,
            figures.withheld,
            rate.normalize()
        ),
    };

    Ok(RetroactiveSettlementResult {
        record,
        figures,
        audit_step,
    })
}
