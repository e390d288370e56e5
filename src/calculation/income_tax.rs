//! Regular PPh 21 withholding on monthly salary.
//!
//! The monthly gross is annualised, reduced by biaya jabatan and PTKP, taxed
//! through the progressive brackets, and the annual tax is spread evenly
//! over twelve months.

use crate::config::{PositionCost, TaxConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Amount, AuditStep, Breakdown, Employee, MaritalStatus, RecordKind, ResultRecord,
};

use super::progressive_tax::{PROGRESSIVE_TAX_LEGAL_REF, compute_progressive_tax};
use super::ptkp::{ptkp_status_code, resolve_ptkp};
use super::rounding::{apply_rate, checked_add, checked_mul, checked_sub};

/// Months in a tax year.
pub const MONTHS_PER_YEAR: i64 = 12;

/// The regulation that fixes the biaya jabatan deduction.
pub const POSITION_COST_LEGAL_REF: &str = "PMK 250/PMK.03/2008";

/// The annual PTKP → PKP → tax path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnualTax {
    /// Annual net income the tax was computed on.
    pub net_income: Amount,
    /// Non-taxable threshold applied.
    pub ptkp: Amount,
    /// Taxable income: `max(0, net income - PTKP)`.
    pub pkp: Amount,
    /// Annual tax due.
    pub tax: Amount,
}

/// Computes annual PPh 21 on an annual net income.
///
/// # Examples
///
/// ```no_run
/// use payroll_engine::calculation::compute_annual_income_tax;
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::MaritalStatus;
///
/// let config = ConfigLoader::load("./config/pph21_2024")?.into_config();
/// let tax = compute_annual_income_tax(63_000_000, MaritalStatus::Married, 1, &config)?;
/// assert_eq!(tax.pkp, 0);
/// assert_eq!(tax.tax, 0);
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
pub fn compute_annual_income_tax(
    annual_net_income: Amount,
    status: MaritalStatus,
    dependent_count: u32,
    config: &TaxConfig,
) -> EngineResult<AnnualTax> {
    let ptkp = resolve_ptkp(status, dependent_count, config.ptkp())?;
    let pkp = checked_sub(annual_net_income, ptkp, "taxable income")?.max(0);
    let tax = compute_progressive_tax(pkp, config.brackets())?;

    Ok(AnnualTax {
        net_income: annual_net_income,
        ptkp,
        pkp,
        tax,
    })
}

/// Biaya jabatan on an annual gross: a share of gross, capped at the lower
/// of the annual cap and twelve monthly caps.
pub fn position_cost_deduction(
    annual_gross: Amount,
    params: &PositionCost,
) -> EngineResult<Amount> {
    let uncapped = apply_rate(annual_gross, params.rate, "biaya jabatan")?;
    let monthly_cap_annualised =
        checked_mul(params.monthly_cap, MONTHS_PER_YEAR, "biaya jabatan cap")?;
    Ok(uncapped.min(params.annual_cap).min(monthly_cap_annualised))
}

/// The result of a monthly withholding calculation.
#[derive(Debug, Clone)]
pub struct MonthlyWithholdingResult {
    /// The computed record for the month.
    pub record: ResultRecord,
    /// The annual figures behind the monthly withholding.
    pub annual: AnnualTax,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates regular monthly PPh 21 withholding for an employee.
///
/// Monthly gross is base salary plus fixed allowance plus the attendance
/// adjustment; a negative result is rejected.
pub fn calculate_monthly_withholding(
    employee: &Employee,
    config: &TaxConfig,
) -> EngineResult<MonthlyWithholdingResult> {
    employee.validate()?;

    let monthly_gross = checked_add(employee.base_salary, employee.fixed_allowance, "monthly gross")
        .and_then(|sum| checked_add(sum, employee.attendance_adjustment, "monthly gross"))?;
    if monthly_gross < 0 {
        return Err(EngineError::InvalidEmployee {
            employee_code: employee.code.clone(),
            field: "attendance_adjustment".to_string(),
            message: format!("deduction exceeds salary (gross would be {})", monthly_gross),
        });
    }

    let annual_gross = checked_mul(monthly_gross, MONTHS_PER_YEAR, "annual gross")?;
    let position_cost = position_cost_deduction(annual_gross, config.position_cost())?;
    let annual_net = checked_sub(annual_gross, position_cost, "annual net income")?;

    let annual = compute_annual_income_tax(
        annual_net,
        employee.marital_status,
        employee.dependent_count,
        config,
    )?;
    let withheld = annual.tax / MONTHS_PER_YEAR;

    let mut breakdown = Breakdown::new();
    breakdown.insert("base_salary".to_string(), employee.base_salary);
    breakdown.insert("fixed_allowance".to_string(), employee.fixed_allowance);
    breakdown.insert("attendance_adjustment".to_string(), employee.attendance_adjustment);
    breakdown.insert("annual_position_cost".to_string(), position_cost);
    breakdown.insert("annual_ptkp".to_string(), annual.ptkp);
    breakdown.insert("annual_pkp".to_string(), annual.pkp);
    breakdown.insert("annual_tax".to_string(), annual.tax);

    let record = ResultRecord::new(
        employee.code.clone(),
        employee.period,
        RecordKind::MonthlyWithholding,
        monthly_gross,
        withheld,
        breakdown,
    )?;

    let status_code = ptkp_status_code(employee.marital_status, employee.dependent_count);
    let audit_step = AuditStep {
        rule_id: "monthly_pph21".to_string(),
        rule_name: "Monthly PPh 21 Withholding".to_string(),
        legal_ref: format!("{}; {}", PROGRESSIVE_TAX_LEGAL_REF, POSITION_COST_LEGAL_REF),
        employee_code: Some(employee.code.clone()),
        input: serde_json::json!({
            "monthly_gross": monthly_gross,
            "ptkp_status": status_code,
        }),
        output: serde_json::json!({
            "annual_gross": annual_gross,
            "annual_position_cost": position_cost,
            "annual_net_income": annual_net,
            "ptkp": annual.ptkp,
            "pkp": annual.pkp,
            "annual_tax": annual.tax,
            "monthly_withheld": withheld,
        }),
        reasoning: format!(
            "({} - {} - PTKP {} {}) = PKP {}; annual tax {} / 12 = {}",
            annual_gross, position_cost, status_code, annual.ptkp, annual.pkp, annual.tax, withheld
        ),
    };

    Ok(MonthlyWithholdingResult {
        record,
        annual,
        audit_step,
    })
}
