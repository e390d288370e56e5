//! Holiday allowance (THR) calculation functionality.
//!
//! This module derives the religious holiday allowance: one month of base
//! salary plus the in-kind rice, meat and show allowances for the
//! employee's position level, withheld at a flat rate.

use crate::config::{PositionLevel, TaxConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Breakdown, CompensationEvent, Employee, RecordKind, ResultRecord};

use super::position_level::PositionClassifier;
use super::rounding::checked_add;
use super::withholding::{WithholdingMode, withhold};

/// The regulation that mandates the holiday allowance.
pub const HOLIDAY_ALLOWANCE_LEGAL_REF: &str = "Permenaker 6/2016";

/// The result of a holiday allowance calculation.
#[derive(Debug, Clone)]
pub struct HolidayAllowanceResult {
    /// The computed record.
    pub record: ResultRecord,
    /// The position level the allowances were looked up for.
    pub level: PositionLevel,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the holiday allowance for an employee.
///
/// `gross = base salary + rice + meat + show`, where the three allowances
/// come from the employee's position level. The withholding is a flat
/// share of gross at the configured rate.
///
/// # Returns
///
/// Returns a `HolidayAllowanceResult`, or an error if the employee fact is
/// invalid or an amount overflows.
pub fn calculate_holiday_allowance(
    employee: &Employee,
    config: &TaxConfig,
) -> EngineResult<HolidayAllowanceResult> {
    employee.validate()?;

    let classifier = PositionClassifier::from_config(config.allowances());
    let level = classifier.classify(employee);
    let allowances = *config.allowances().levels.get(&level).ok_or_else(|| {
        EngineError::invalid_config(
            "allowance",
            format!("missing allowances for level '{}'", level.as_str()),
        )
    })?;

    let mut gross = employee.base_salary;
    for component in [allowances.rice, allowances.meat, allowances.show] {
        gross = checked_add(gross, component, "holiday allowance gross")?;
    }

    let rate = config.event_withholding().holiday_allowance_rate;
    let withheld = withhold(gross, WithholdingMode::Flat(rate), config.brackets())?;

    let mut breakdown = Breakdown::new();
    breakdown.insert("base_salary".to_string(), employee.base_salary);
    breakdown.insert("rice_allowance".to_string(), allowances.rice);
    breakdown.insert("meat_allowance".to_string(), allowances.meat);
    breakdown.insert("show_allowance".to_string(), allowances.show);

    let record = ResultRecord::new(
        employee.code.clone(),
        employee.period,
        RecordKind::Event(CompensationEvent::HolidayAllowance),
        gross,
        withheld,
        breakdown,
    )?;

    let audit_step = AuditStep {
        rule_id: "holiday_allowance".to_string(),
        rule_name: "Holiday Allowance (THR)".to_string(),
        legal_ref: HOLIDAY_ALLOWANCE_LEGAL_REF.to_string(),
        employee_code: Some(employee.code.clone()),
        input: serde_json::json!({
            "base_salary": employee.base_salary,
            "position": employee.position,
            "employment_type": employee.employment_type.as_str(),
        }),
        output: serde_json::json!({
            "position_level": level.as_str(),
            "gross": gross,
            "withholding_rate": rate.normalize().to_string(),
            "withheld": withheld,
            "net": record.net_amount,
        }),
        reasoning: format!(
            "{} + {} + {} + {} = {} ({} level); {} withheld at {}",
            employee.base_salary,
            allowances.rice,
            allowances.meat,
            allowances.show,
            gross,
            level.as_str(),
            withheld,
            rate.normalize()
        ),
    };

    Ok(HolidayAllowanceResult {
        record,
        level,
        audit_step,
    })
}
