//! Calculation logic for the payroll engine.
//!
//! This module contains all the calculation functions for PPh 21 and the
//! statutory compensation events, including PTKP resolution, progressive and
//! flat withholding, position-level classification, the holiday allowance,
//! annual bonus and retroactive settlement derivers, regular monthly
//! withholding, population selection, aggregation, and population runs.

mod aggregation;
mod annual_bonus;
mod holiday_allowance;
mod income_tax;
mod payment;
mod payroll_run;
mod population;
mod position_level;
mod progressive_tax;
mod ptkp;
mod retroactive_settlement;
mod rounding;
mod withholding;

pub use aggregation::{aggregate, merge_totals, record_totals};
pub use annual_bonus::{AnnualBonusResult, STANDARD_BONUS_MULTIPLIERS, calculate_annual_bonus};
pub use holiday_allowance::{
    HOLIDAY_ALLOWANCE_LEGAL_REF, HolidayAllowanceResult, calculate_holiday_allowance,
};
pub use income_tax::{
    AnnualTax, MONTHS_PER_YEAR, MonthlyWithholdingResult, POSITION_COST_LEGAL_REF,
    calculate_monthly_withholding, compute_annual_income_tax, position_cost_deduction,
};
pub use payment::payment_instructions;
pub use payroll_run::{Computation, RunRequest, run_payroll};
pub use population::{ALL_DIVISIONS, DivisionFilter, filter_records, select_population};
pub use position_level::{LevelRule, PositionClassifier};
pub use progressive_tax::{
    BracketSlice, PROGRESSIVE_TAX_LEGAL_REF, bracket_slices, compute_progressive_tax,
};
pub use ptkp::{PTKP_LEGAL_REF, ptkp_status_code, resolve_ptkp, resolve_ptkp_label};
pub use retroactive_settlement::{
    MAX_REALIZATION_MONTHS, RETROACTIVE_SETTLEMENT_LEGAL_REF, RetroactiveSettlementResult,
    RetroactiveTerms, SettlementFigures, calculate_retroactive_settlement, compute_settlement,
};
pub use withholding::{WithholdingMode, flat_withholding, withhold};
