//! Aggregation of result records into population totals.
//!
//! Totals form a monoid under [`merge_totals`]: the empty total is the
//! identity and merging is associative, so records can be reduced in any
//! grouping (including in parallel) with the same outcome.

use rayon::prelude::*;

use crate::error::EngineResult;
use crate::models::{Breakdown, ResultRecord, Totals};

use super::rounding::checked_add;

/// Totals for a single record.
pub fn record_totals(record: &ResultRecord) -> Totals {
    Totals {
        record_count: 1,
        gross_amount: record.gross_amount,
        withheld_amount: record.withheld_amount,
        net_amount: record.net_amount,
        breakdown: record.breakdown.clone(),
    }
}

/// Merges two totals.
///
/// Breakdown components are kept only when present on both sides, so the
/// result carries exactly the components shared by every record.
pub fn merge_totals(left: Totals, right: Totals) -> EngineResult<Totals> {
    if left.record_count == 0 {
        return Ok(right);
    }
    if right.record_count == 0 {
        return Ok(left);
    }

    let mut breakdown = Breakdown::new();
    for (component, amount) in &left.breakdown {
        if let Some(other) = right.breakdown.get(component) {
            breakdown.insert(
                component.clone(),
                checked_add(*amount, *other, "breakdown total")?,
            );
        }
    }

    Ok(Totals {
        record_count: left.record_count + right.record_count,
        gross_amount: checked_add(left.gross_amount, right.gross_amount, "gross total")?,
        withheld_amount: checked_add(
            left.withheld_amount,
            right.withheld_amount,
            "withheld total",
        )?,
        net_amount: checked_add(left.net_amount, right.net_amount, "net total")?,
        breakdown,
    })
}

/// Sums records into population totals.
///
/// An empty slice yields zero totals.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::aggregate;
///
/// let totals = aggregate(&[]).unwrap();
/// assert_eq!(totals.record_count, 0);
/// assert_eq!(totals.net_amount, 0);
/// ```
pub fn aggregate(records: &[ResultRecord]) -> EngineResult<Totals> {
    records
        .par_iter()
        .map(|record| Ok(record_totals(record)))
        .try_reduce(Totals::default, merge_totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::{CompensationEvent, PayPeriod, RecordKind};

    fn record(code: &str, gross: i64, withheld: i64, components: &[(&str, i64)]) -> ResultRecord {
        let breakdown = components
            .iter()
            .map(|(name, amount)| (name.to_string(), *amount))
            .collect();
        ResultRecord::new(
            code,
            PayPeriod::new(2025, 3).unwrap(),
            RecordKind::Event(CompensationEvent::HolidayAllowance),
            gross,
            withheld,
            breakdown,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_population_yields_zero_totals() {
        let totals = aggregate(&[]).unwrap();
        assert_eq!(totals, Totals::default());
    }

    #[test]
    fn test_sums_gross_withheld_and_net() {
        let records = vec![
            record("A", 6_350_000, 317_500, &[]),
            record("B", 5_900_000, 295_000, &[]),
            record("C", 756_000, 37_800, &[]),
        ];
        let totals = aggregate(&records).unwrap();

        assert_eq!(totals.record_count, 3);
        assert_eq!(totals.gross_amount, 13_006_000);
        assert_eq!(totals.withheld_amount, 650_300);
        assert_eq!(totals.net_amount, 12_355_700);
        assert_eq!(totals.net_amount, totals.gross_amount - totals.withheld_amount);
    }

    #[test]
    fn test_keeps_only_components_present_on_every_record() {
        let records = vec![
            record("A", 100, 0, &[("base_salary", 60), ("rice_allowance", 40)]),
            record("B", 200, 0, &[("base_salary", 150), ("meat_allowance", 50)]),
            record("C", 50, 0, &[("base_salary", 50), ("rice_allowance", 0)]),
        ];
        let totals = aggregate(&records).unwrap();

        assert_eq!(totals.breakdown.len(), 1);
        assert_eq!(totals.breakdown["base_salary"], 260);
    }

    #[test]
    fn test_merge_is_associative() {
        let a = record_totals(&record("A", 10, 1, &[("x", 10), ("y", 1)]));
        let b = record_totals(&record("B", 20, 2, &[("x", 20)]));
        let c = record_totals(&record("C", 30, 3, &[("x", 30), ("y", 3)]));

        let left = merge_totals(merge_totals(a.clone(), b.clone()).unwrap(), c.clone()).unwrap();
        let right = merge_totals(a, merge_totals(b, c).unwrap()).unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn test_empty_totals_is_identity() {
        let a = record_totals(&record("A", 10, 1, &[("x", 10)]));
        assert_eq!(merge_totals(Totals::default(), a.clone()).unwrap(), a);
        assert_eq!(merge_totals(a.clone(), Totals::default()).unwrap(), a);
    }

    #[test]
    fn test_overflow_is_reported_not_wrapped() {
        let records = vec![
            record("A", i64::MAX - 1, 0, &[]),
            record("B", 10, 0, &[]),
        ];
        assert!(matches!(
            aggregate(&records),
            Err(EngineError::Overflow { .. })
        ));
    }

    #[test]
    fn test_tens_of_billions_fit() {
        let records: Vec<ResultRecord> = (0..10_000)
            .map(|i| record(&format!("E{}", i), 9_000_000, 450_000, &[]))
            .collect();
        let totals = aggregate(&records).unwrap();
        assert_eq!(totals.gross_amount, 90_000_000_000);
        assert_eq!(totals.net_amount, 85_500_000_000);
    }
}
