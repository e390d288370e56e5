//! Configuration types for the tax regime.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, and the structural
//! validation each table must pass before any computation may use it.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{Amount, MaritalStatus};

/// Number of entries in each PTKP table (0, 1, 2, and 3+ dependents).
pub const PTKP_TABLE_LEN: usize = 4;

/// Metadata about the tax regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeMetadata {
    /// Short identifier (e.g., "PPH21-ID").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// The version or effective date of the rule set.
    pub version: String,
    /// The statutes the tables are taken from.
    pub legal_basis: String,
}

/// Annual non-taxable income thresholds indexed by dependent count.
///
/// The married table's first entry must equal the single table's second:
/// marriage adds the same increment as one dependent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PtkpTable {
    /// Thresholds for single taxpayers (TK/0 .. TK/3).
    pub single: Vec<Amount>,
    /// Thresholds for married taxpayers (K/0 .. K/3).
    pub married: Vec<Amount>,
}

impl PtkpTable {
    /// Checks table shape and monotonicity.
    pub fn validate(&self) -> EngineResult<()> {
        for (label, table) in [("single", &self.single), ("married", &self.married)] {
            if table.len() != PTKP_TABLE_LEN {
                return Err(EngineError::invalid_config(
                    "ptkp",
                    format!(
                        "{} table must have {} entries, found {}",
                        label,
                        PTKP_TABLE_LEN,
                        table.len()
                    ),
                ));
            }
            if table[0] <= 0 {
                return Err(EngineError::invalid_config(
                    "ptkp",
                    format!("{} thresholds must be positive", label),
                ));
            }
            if table.windows(2).any(|pair| pair[1] <= pair[0]) {
                return Err(EngineError::invalid_config(
                    "ptkp",
                    format!("{} thresholds must strictly increase with dependents", label),
                ));
            }
        }
        if self.married[0] != self.single[1] {
            return Err(EngineError::invalid_config(
                "ptkp",
                format!(
                    "married/0 ({}) must equal single/1 ({})",
                    self.married[0], self.single[1]
                ),
            ));
        }
        Ok(())
    }

    /// Returns the table for a marital status.
    pub fn for_status(&self, status: MaritalStatus) -> &[Amount] {
        match status {
            MaritalStatus::Married => &self.married,
            MaritalStatus::Single => &self.single,
        }
    }
}

/// One marginal tax band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Taxable income at which the band starts.
    pub lower_bound: Amount,
    /// Taxable income at which the band ends; `None` for the top band.
    #[serde(default)]
    pub upper_bound: Option<Amount>,
    /// Marginal rate for income inside the band (e.g., 0.05).
    pub rate: Decimal,
}

/// An ordered, contiguous set of marginal tax bands.
///
/// Only constructible through [`TaxBracketTable::new`], so every instance
/// starts at zero, is contiguous, ends open-ended, and has strictly
/// increasing rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaxBracketTable {
    brackets: Vec<TaxBracket>,
}

impl TaxBracketTable {
    /// Validates and wraps a list of brackets.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::config::{TaxBracket, TaxBracketTable};
    /// use rust_decimal::Decimal;
    ///
    /// let table = TaxBracketTable::new(vec![
    ///     TaxBracket { lower_bound: 0, upper_bound: Some(60_000_000), rate: Decimal::new(5, 2) },
    ///     TaxBracket { lower_bound: 60_000_000, upper_bound: None, rate: Decimal::new(15, 2) },
    /// ]);
    /// assert!(table.is_ok());
    /// ```
    pub fn new(brackets: Vec<TaxBracket>) -> EngineResult<Self> {
        let Some(first) = brackets.first() else {
            return Err(EngineError::invalid_config(
                "tax_bracket",
                "at least one bracket is required",
            ));
        };
        if first.lower_bound != 0 {
            return Err(EngineError::invalid_config(
                "tax_bracket",
                format!("first bracket must start at 0, found {}", first.lower_bound),
            ));
        }

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate <= Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(EngineError::invalid_config(
                    "tax_bracket",
                    format!("bracket {} rate {} is outside (0, 1]", index, bracket.rate),
                ));
            }

            let is_last = index + 1 == brackets.len();
            match (bracket.upper_bound, is_last) {
                (None, true) => {}
                (None, false) => {
                    return Err(EngineError::invalid_config(
                        "tax_bracket",
                        format!("only the last bracket may be open-ended (bracket {})", index),
                    ));
                }
                (Some(_), true) => {
                    return Err(EngineError::invalid_config(
                        "tax_bracket",
                        "last bracket must be open-ended",
                    ));
                }
                (Some(upper), false) => {
                    if upper <= bracket.lower_bound {
                        return Err(EngineError::invalid_config(
                            "tax_bracket",
                            format!(
                                "bracket {} upper bound {} is not above its lower bound {}",
                                index, upper, bracket.lower_bound
                            ),
                        ));
                    }
                    let next = &brackets[index + 1];
                    if next.lower_bound != upper {
                        return Err(EngineError::invalid_config(
                            "tax_bracket",
                            format!(
                                "bracket {} starts at {} but bracket {} ends at {}",
                                index + 1,
                                next.lower_bound,
                                index,
                                upper
                            ),
                        ));
                    }
                    if next.rate <= bracket.rate {
                        return Err(EngineError::invalid_config(
                            "tax_bracket",
                            format!(
                                "bracket {} rate must exceed bracket {} rate",
                                index + 1,
                                index
                            ),
                        ));
                    }
                }
            }
        }

        Ok(Self { brackets })
    }

    /// The brackets, lowest first.
    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }
}

/// Parameters of the biaya jabatan (positional cost) deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionCost {
    /// Share of gross income deducted (e.g., 0.05).
    pub rate: Decimal,
    /// Maximum deduction per month.
    pub monthly_cap: Amount,
    /// Maximum deduction per year.
    pub annual_cap: Amount,
}

/// Flat withholding rates for one-off compensation events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWithholding {
    /// Flat rate withheld from the holiday allowance.
    pub holiday_allowance_rate: Decimal,
    /// Flat rate withheld from the retroactive settlement.
    pub retroactive_settlement_rate: Decimal,
}

/// The contents of `tax.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxFile {
    /// Progressive brackets, lowest first.
    pub brackets: Vec<TaxBracket>,
    /// Biaya jabatan parameters.
    pub position_cost: PositionCost,
    /// Flat event withholding rates.
    pub event_withholding: EventWithholding,
}

/// The contents of `ptkp.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PtkpFile {
    /// The PTKP tables.
    pub ptkp: PtkpTable,
}

/// Position level used to look up in-kind holiday allowances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionLevel {
    /// Staff and supervisory titles.
    Staff,
    /// Operational titles.
    Operator,
    /// Contract employees without a staff or operator title.
    Contract,
    /// Everyone else.
    General,
}

impl PositionLevel {
    /// All levels, in classification precedence order.
    pub const ALL: [PositionLevel; 4] = [
        PositionLevel::Staff,
        PositionLevel::Operator,
        PositionLevel::Contract,
        PositionLevel::General,
    ];

    /// Returns the snake_case label used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionLevel::Staff => "staff",
            PositionLevel::Operator => "operator",
            PositionLevel::Contract => "contract",
            PositionLevel::General => "general",
        }
    }
}

/// In-kind allowances paid with the holiday allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InKindAllowances {
    /// Rice allowance (tunjangan beras).
    pub rice: Amount,
    /// Meat allowance (tunjangan daging).
    pub meat: Amount,
    /// Show allowance (tunjangan pertunjukan).
    pub show: Amount,
}

/// The contents of `allowances.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceConfig {
    /// Title fragments that mark a staff or supervisory position.
    pub staff_keywords: Vec<String>,
    /// Title fragments that mark an operational position.
    pub operator_keywords: Vec<String>,
    /// In-kind allowances per level.
    pub levels: BTreeMap<PositionLevel, InKindAllowances>,
}

impl AllowanceConfig {
    /// Checks that every level is priced and no keyword is blank.
    pub fn validate(&self) -> EngineResult<()> {
        for level in PositionLevel::ALL {
            let Some(amounts) = self.levels.get(&level) else {
                return Err(EngineError::invalid_config(
                    "allowance",
                    format!("missing allowances for level '{}'", level.as_str()),
                ));
            };
            if amounts.rice < 0 || amounts.meat < 0 || amounts.show < 0 {
                return Err(EngineError::invalid_config(
                    "allowance",
                    format!("allowances for level '{}' cannot be negative", level.as_str()),
                ));
            }
        }
        let blank = self
            .staff_keywords
            .iter()
            .chain(&self.operator_keywords)
            .any(|keyword| keyword.trim().is_empty());
        if blank {
            return Err(EngineError::invalid_config(
                "allowance",
                "title keywords cannot be blank",
            ));
        }
        Ok(())
    }
}

fn validate_rate(table: &str, name: &str, rate: Decimal) -> EngineResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(EngineError::invalid_config(
            table,
            format!("{} {} is outside [0, 1]", name, rate),
        ));
    }
    Ok(())
}

/// The complete, validated tax-regime configuration.
///
/// Immutable once built; share it across threads by reference or `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxConfig {
    metadata: RegimeMetadata,
    ptkp: PtkpTable,
    brackets: TaxBracketTable,
    position_cost: PositionCost,
    event_withholding: EventWithholding,
    allowances: AllowanceConfig,
}

impl TaxConfig {
    /// Creates a configuration, validating every table.
    pub fn new(
        metadata: RegimeMetadata,
        ptkp: PtkpTable,
        brackets: Vec<TaxBracket>,
        position_cost: PositionCost,
        event_withholding: EventWithholding,
        allowances: AllowanceConfig,
    ) -> EngineResult<Self> {
        ptkp.validate()?;
        let brackets = TaxBracketTable::new(brackets)?;

        validate_rate("position_cost", "rate", position_cost.rate)?;
        if position_cost.monthly_cap < 0 || position_cost.annual_cap < 0 {
            return Err(EngineError::invalid_config(
                "position_cost",
                "caps cannot be negative",
            ));
        }
        validate_rate(
            "event_withholding",
            "holiday_allowance_rate",
            event_withholding.holiday_allowance_rate,
        )?;
        validate_rate(
            "event_withholding",
            "retroactive_settlement_rate",
            event_withholding.retroactive_settlement_rate,
        )?;
        allowances.validate()?;

        Ok(Self {
            metadata,
            ptkp,
            brackets,
            position_cost,
            event_withholding,
            allowances,
        })
    }

    /// Returns the regime metadata.
    pub fn regime(&self) -> &RegimeMetadata {
        &self.metadata
    }

    /// Returns the PTKP tables.
    pub fn ptkp(&self) -> &PtkpTable {
        &self.ptkp
    }

    /// Returns the progressive bracket table.
    pub fn brackets(&self) -> &TaxBracketTable {
        &self.brackets
    }

    /// Returns the biaya jabatan parameters.
    pub fn position_cost(&self) -> &PositionCost {
        &self.position_cost
    }

    /// Returns the flat event withholding rates.
    pub fn event_withholding(&self) -> &EventWithholding {
        &self.event_withholding
    }

    /// Returns the position-level allowance configuration.
    pub fn allowances(&self) -> &AllowanceConfig {
        &self.allowances
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn rate(percent: i64) -> Decimal {
        Decimal::new(percent, 2)
    }

    pub(crate) fn reference_ptkp() -> PtkpTable {
        PtkpTable {
            single: vec![54_000_000, 58_500_000, 63_000_000, 67_500_000],
            married: vec![58_500_000, 63_000_000, 67_500_000, 72_000_000],
        }
    }

    pub(crate) fn reference_brackets() -> Vec<TaxBracket> {
        vec![
            TaxBracket {
                lower_bound: 0,
                upper_bound: Some(60_000_000),
                rate: rate(5),
            },
            TaxBracket {
                lower_bound: 60_000_000,
                upper_bound: Some(250_000_000),
                rate: rate(15),
            },
            TaxBracket {
                lower_bound: 250_000_000,
                upper_bound: Some(500_000_000),
                rate: rate(25),
            },
            TaxBracket {
                lower_bound: 500_000_000,
                upper_bound: None,
                rate: rate(30),
            },
        ]
    }

    pub(crate) fn reference_allowances() -> AllowanceConfig {
        let mut levels = BTreeMap::new();
        levels.insert(
            PositionLevel::Staff,
            InKindAllowances {
                rice: 400_000,
                meat: 500_000,
                show: 450_000,
            },
        );
        levels.insert(
            PositionLevel::Operator,
            InKindAllowances {
                rice: 350_000,
                meat: 400_000,
                show: 300_000,
            },
        );
        levels.insert(
            PositionLevel::Contract,
            InKindAllowances {
                rice: 250_000,
                meat: 300_000,
                show: 200_000,
            },
        );
        levels.insert(
            PositionLevel::General,
            InKindAllowances {
                rice: 300_000,
                meat: 350_000,
                show: 250_000,
            },
        );
        AllowanceConfig {
            staff_keywords: vec![
                "Staff".to_string(),
                "Supervisor".to_string(),
                "Manager".to_string(),
                "Kepala".to_string(),
            ],
            operator_keywords: vec![
                "Operator".to_string(),
                "Teknisi".to_string(),
                "Driver".to_string(),
            ],
            levels,
        }
    }

    /// The reference regime used by unit tests across the crate.
    pub(crate) fn reference_config() -> TaxConfig {
        TaxConfig::new(
            RegimeMetadata {
                code: "PPH21-ID".to_string(),
                name: "Pajak Penghasilan Pasal 21".to_string(),
                version: "2024-01-01".to_string(),
                legal_basis: "UU 7/2021; PMK 101/PMK.010/2016".to_string(),
            },
            reference_ptkp(),
            reference_brackets(),
            PositionCost {
                rate: rate(5),
                monthly_cap: 500_000,
                annual_cap: 6_000_000,
            },
            EventWithholding {
                holiday_allowance_rate: rate(5),
                retroactive_settlement_rate: rate(5),
            },
            reference_allowances(),
        )
        .unwrap()
    }

    fn assert_invalid(result: EngineResult<TaxBracketTable>, table: &str) {
        match result {
            Err(EngineError::InvalidConfig { table: t, .. }) => assert_eq!(t, table),
            other => panic!("Expected InvalidConfig for {}, got {:?}", table, other),
        }
    }

    #[test]
    fn test_reference_config_is_valid() {
        let config = reference_config();
        assert_eq!(config.brackets().brackets().len(), 4);
        assert_eq!(config.regime().code, "PPH21-ID");
    }

    #[test]
    fn test_ptkp_rejects_wrong_length() {
        let mut ptkp = reference_ptkp();
        ptkp.single.pop();
        assert!(ptkp.validate().is_err());
    }

    #[test]
    fn test_ptkp_rejects_non_increasing_table() {
        let mut ptkp = reference_ptkp();
        ptkp.married[2] = ptkp.married[1];
        assert!(ptkp.validate().is_err());
    }

    #[test]
    fn test_ptkp_rejects_married_base_not_matching_single_one() {
        let mut ptkp = reference_ptkp();
        ptkp.married = vec![60_000_000, 63_000_000, 67_500_000, 72_000_000];
        assert!(ptkp.validate().is_err());
    }

    #[test]
    fn test_brackets_reject_empty_table() {
        assert_invalid(TaxBracketTable::new(vec![]), "tax_bracket");
    }

    #[test]
    fn test_brackets_reject_nonzero_start() {
        let mut brackets = reference_brackets();
        brackets[0].lower_bound = 1;
        assert_invalid(TaxBracketTable::new(brackets), "tax_bracket");
    }

    #[test]
    fn test_brackets_reject_gap_between_bands() {
        let mut brackets = reference_brackets();
        brackets[1].lower_bound = 61_000_000;
        assert_invalid(TaxBracketTable::new(brackets), "tax_bracket");
    }

    #[test]
    fn test_brackets_reject_non_increasing_rates() {
        let mut brackets = reference_brackets();
        brackets[2].rate = rate(15);
        assert_invalid(TaxBracketTable::new(brackets), "tax_bracket");
    }

    #[test]
    fn test_brackets_reject_closed_top_band() {
        let mut brackets = reference_brackets();
        brackets[3].upper_bound = Some(1_000_000_000);
        assert_invalid(TaxBracketTable::new(brackets), "tax_bracket");
    }

    #[test]
    fn test_brackets_reject_open_middle_band() {
        let mut brackets = reference_brackets();
        brackets[1].upper_bound = None;
        assert_invalid(TaxBracketTable::new(brackets), "tax_bracket");
    }

    #[test]
    fn test_brackets_reject_inverted_band() {
        let brackets = vec![
            TaxBracket {
                lower_bound: 0,
                upper_bound: Some(0),
                rate: rate(5),
            },
            TaxBracket {
                lower_bound: 0,
                upper_bound: None,
                rate: rate(15),
            },
        ];
        assert_invalid(TaxBracketTable::new(brackets), "tax_bracket");
    }

    #[test]
    fn test_brackets_reject_zero_rate() {
        let mut brackets = reference_brackets();
        brackets[0].rate = Decimal::ZERO;
        assert_invalid(TaxBracketTable::new(brackets), "tax_bracket");
    }

    #[test]
    fn test_allowances_reject_missing_level() {
        let mut allowances = reference_allowances();
        allowances.levels.remove(&PositionLevel::General);
        assert!(allowances.validate().is_err());
    }

    #[test]
    fn test_allowances_reject_blank_keyword() {
        let mut allowances = reference_allowances();
        allowances.operator_keywords.push("  ".to_string());
        assert!(allowances.validate().is_err());
    }

    #[test]
    fn test_config_rejects_rate_above_one() {
        let result = TaxConfig::new(
            reference_config().regime().clone(),
            reference_ptkp(),
            reference_brackets(),
            PositionCost {
                rate: rate(5),
                monthly_cap: 500_000,
                annual_cap: 6_000_000,
            },
            EventWithholding {
                holiday_allowance_rate: rate(105),
                retroactive_settlement_rate: rate(5),
            },
            reference_allowances(),
        );
        assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
    }

    #[test]
    fn test_config_rejects_negative_position_cost_cap() {
        let build = |monthly_cap, annual_cap| {
            TaxConfig::new(
                reference_config().regime().clone(),
                reference_ptkp(),
                reference_brackets(),
                PositionCost {
                    rate: rate(5),
                    monthly_cap,
                    annual_cap,
                },
                EventWithholding {
                    holiday_allowance_rate: rate(5),
                    retroactive_settlement_rate: rate(5),
                },
                reference_allowances(),
            )
        };

        for (monthly_cap, annual_cap) in [(-1, 6_000_000), (500_000, -1)] {
            match build(monthly_cap, annual_cap) {
                Err(EngineError::InvalidConfig { table, .. }) => {
                    assert_eq!(table, "position_cost")
                }
                other => panic!("Expected InvalidConfig, got {:?}", other),
            }
        }
        assert!(build(0, 0).is_ok());
    }
}
