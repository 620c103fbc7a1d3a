//! Bucket Aggregator — reduces a normalized table along one categorical
//! dimension into the N largest groups plus one synthetic "Otras" bucket.
//!
//! Ordering is deterministic: groups descend by measure, ties break by
//! ascending label. "Otras" is appended last regardless of magnitude and
//! only appears when there are more distinct categories than `top_n`.
//! The sum of all bucket values always equals the measure over the whole
//! input (total-preserving).

use crate::normalize::{NormalizedRecord, NO_LOCALITY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label of the synthetic remainder bucket.
pub const OTHER_LABEL: &str = "Otras";

/// Shown for records whose source carries no administrative unit at all.
pub const NO_ADMIN_UNIT: &str = "Sin repartición";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Sex,
    BenefitClass,
    AdminUnit,
    Locality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    Gross,
    Benefit,
    Credits,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Count,
    Sum(NumericField),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub value: f64,
}

fn dimension_value(record: &NormalizedRecord, dimension: Dimension) -> &str {
    match dimension {
        Dimension::Sex => &record.sex,
        Dimension::BenefitClass => &record.benefit_class,
        Dimension::AdminUnit => record
            .admin_unit_label
            .as_deref()
            .or(record.admin_unit.as_deref())
            .unwrap_or(NO_ADMIN_UNIT),
        Dimension::Locality => record.locality.as_deref().unwrap_or(NO_LOCALITY),
    }
}

fn measure_value(record: &NormalizedRecord, measure: Measure) -> f64 {
    match measure {
        Measure::Count => 1.0,
        Measure::Sum(NumericField::Gross) => record.gross,
        Measure::Sum(NumericField::Benefit) => record.benefit,
        Measure::Sum(NumericField::Credits) => record.credits,
    }
}

/// Group by `dimension`, rank by `measure`, keep the first `top_n` groups
/// explicit and fold the rest into "Otras". Empty input yields an empty
/// summary.
pub fn aggregate(
    records: &[NormalizedRecord],
    dimension: Dimension,
    measure: Measure,
    top_n: usize,
) -> Vec<Bucket> {
    aggregate_with_selection(records, dimension, measure, measure, top_n)
}

/// Variant for paired charts: the top-N category set is chosen by
/// `select_by`, but the reported values come from `report` over that same
/// set. With `select_by == report` this is the plain aggregation.
pub fn aggregate_with_selection(
    records: &[NormalizedRecord],
    dimension: Dimension,
    select_by: Measure,
    report: Measure,
    top_n: usize,
) -> Vec<Bucket> {
    // BTreeMap iteration is label-ascending; the stable sort below keeps
    // that order for equal measures.
    let mut groups: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(dimension_value(record, dimension)).or_insert((0.0, 0.0));
        entry.0 += measure_value(record, select_by);
        entry.1 += measure_value(record, report);
    }

    let mut ordered: Vec<(&str, (f64, f64))> = groups.into_iter().collect();
    ordered.sort_by(|a, b| b.1 .0.total_cmp(&a.1 .0));

    let mut buckets: Vec<Bucket> = ordered
        .iter()
        .take(top_n)
        .map(|(label, (_, reported))| Bucket {
            label: (*label).to_string(),
            value: *reported,
        })
        .collect();

    if ordered.len() > top_n {
        let remainder: f64 = ordered[top_n..].iter().map(|(_, (_, r))| r).sum();
        buckets.push(Bucket {
            label: OTHER_LABEL.to_string(),
            value: remainder,
        });
    }

    buckets
}

/// Total of a bucketed summary. With the invariants above this equals the
/// measure over the full input table.
pub fn summary_total(buckets: &[Bucket]) -> f64 {
    buckets.iter().map(|b| b.value).sum()
}
