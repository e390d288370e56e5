//! Annual bonus calculation functionality.
//!
//! The bonus is a whole multiple of monthly base salary. No tax is withheld
//! here: a caller that wants a taxed bonus routes the gross through
//! [`flat_withholding`](super::flat_withholding) itself.

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Breakdown, CompensationEvent, Employee, RecordKind, ResultRecord};

use super::rounding::checked_mul;

/// Multipliers offered by the payroll screens. Any positive multiplier is
/// accepted; these are only flagged as standard in the audit trace.
pub const STANDARD_BONUS_MULTIPLIERS: [u32; 6] = [1, 2, 3, 4, 6, 12];

/// The result of an annual bonus calculation.
#[derive(Debug, Clone)]
pub struct AnnualBonusResult {
    /// The computed record; withheld is always zero.
    pub record: ResultRecord,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the annual bonus: `gross = base salary × multiplier`.
///
/// # Errors
///
/// Rejects a zero multiplier and invalid employee facts.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_annual_bonus;
/// use payroll_engine::models::{Employee, EmploymentType, MaritalStatus, PayPeriod};
///
/// let employee = Employee {
///     code: "EMP-002".to_string(),
///     name: "Rina".to_string(),
///     division: "Sales".to_string(),
///     position: "Staff Sales".to_string(),
///     base_salary: 4_000_000,
///     fixed_allowance: 0,
///     attendance_adjustment: 0,
///     employment_type: EmploymentType::Permanent,
///     marital_status: MaritalStatus::Single,
///     dependent_count: 0,
///     period: PayPeriod::new(2025, 12).unwrap(),
///     active: true,
/// };
///
/// let result = calculate_annual_bonus(&employee, 3).unwrap();
/// assert_eq!(result.record.gross_amount, 12_000_000);
/// assert_eq!(result.record.net_amount, 12_000_000);
/// ```
pub fn calculate_annual_bonus(
    employee: &Employee,
    multiplier: u32,
) -> EngineResult<AnnualBonusResult> {
    employee.validate()?;
    if multiplier == 0 {
        return Err(EngineError::invalid_input(
            "multiplier",
            "bonus multiplier must be a positive integer",
        ));
    }

    let gross = checked_mul(employee.base_salary, i64::from(multiplier), "annual bonus gross")?;

    let mut breakdown = Breakdown::new();
    breakdown.insert("base_salary".to_string(), employee.base_salary);

    let record = ResultRecord::new(
        employee.code.clone(),
        employee.period,
        RecordKind::Event(CompensationEvent::AnnualBonus),
        gross,
        0,
        breakdown,
    )?;

    let audit_step = AuditStep {
        rule_id: "annual_bonus".to_string(),
        rule_name: "Annual Bonus".to_string(),
        legal_ref: "Company bonus policy".to_string(),
        employee_code: Some(employee.code.clone()),
        input: serde_json::json!({
            "base_salary": employee.base_salary,
            "multiplier": multiplier,
        }),
        output: serde_json::json!({
            "gross": gross,
            "withheld": 0,
            "net": gross,
            "standard_multiplier": STANDARD_BONUS_MULTIPLIERS.contains(&multiplier),
        }),
        reasoning: format!(
            "{} x {} = {}; not withheld",
            employee.base_salary, multiplier, gross
        ),
    };

    Ok(AnnualBonusResult { record, audit_step })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmploymentType, MaritalStatus, PayPeriod};

    fn create_test_employee(base_salary: i64) -> Employee {
        Employee {
            code: "EMP-002".to_string(),
            name: "Rina".to_string(),
            division: "Sales".to_string(),
            position: "Staff Sales".to_string(),
            base_salary,
            fixed_allowance: 500_000,
            attendance_adjustment: 0,
            employment_type: EmploymentType::Permanent,
            marital_status: MaritalStatus::Single,
            dependent_count: 0,
            period: PayPeriod::new(2025, 12).unwrap(),
            active: true,
        }
    }

    #[test]
    fn test_three_month_bonus_reference_scenario() {
        let result = calculate_annual_bonus(&create_test_employee(4_000_000), 3).unwrap();
        assert_eq!(result.record.gross_amount, 12_000_000);
        assert_eq!(result.record.withheld_amount, 0);
        assert_eq!(result.record.net_amount, 12_000_000);
    }

    #[test]
    fn test_standard_multipliers() {
        let employee = create_test_employee(4_000_000);
        for multiplier in STANDARD_BONUS_MULTIPLIERS {
            let result = calculate_annual_bonus(&employee, multiplier).unwrap();
            assert_eq!(
                result.record.gross_amount,
                4_000_000 * i64::from(multiplier)
            );
            assert_eq!(result.audit_step.output["standard_multiplier"], true);
        }
    }

    #[test]
    fn test_non_standard_multiplier_is_accepted() {
        let result = calculate_annual_bonus(&create_test_employee(4_000_000), 5).unwrap();
        assert_eq!(result.record.gross_amount, 20_000_000);
        assert_eq!(result.audit_step.output["standard_multiplier"], false);
    }

    #[test]
    fn test_zero_multiplier_is_rejected() {
        let result = calculate_annual_bonus(&create_test_employee(4_000_000), 0);
        match result {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "multiplier"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_overflow_is_reported() {
        let result = calculate_annual_bonus(&create_test_employee(i64::MAX / 2), 3);
        assert!(matches!(result, Err(EngineError::Overflow { .. })));
    }

    #[test]
    fn test_bonus_ignores_fixed_allowance() {
        let result = calculate_annual_bonus(&create_test_employee(4_000_000), 1).unwrap();
        assert_eq!(result.record.gross_amount, 4_000_000);
        assert!(!result.record.breakdown.contains_key("fixed_allowance"));
    }
}
