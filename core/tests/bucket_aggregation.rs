use haberes_core::{
    bucket::{self, Dimension, Measure, NumericField, OTHER_LABEL},
    normalize::NormalizedRecord,
    types::PayrollKey,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn record(control: i64, sex: &str, unit: &str, gross: f64) -> NormalizedRecord {
    NormalizedRecord {
        control,
        key: PayrollKey { plla: 1, orden: control, afiliado: control },
        sex: sex.into(),
        age: None,
        benefit: gross,
        credits: 0.0,
        gross,
        benefit_detail: None,
        benefit_class: "Jubilaciones".into(),
        admin_unit: None,
        admin_unit_label: Some(unit.into()),
        locality: None,
    }
}

fn records_for_sums(sums: &[f64]) -> Vec<NormalizedRecord> {
    sums.iter()
        .enumerate()
        .map(|(i, &sum)| record(i as i64, "Masculino", &format!("Unidad {i:02}"), sum))
        .collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// The worked example from the reports: sexes M,F,M,F,M count to
/// Masculino 3, Femenino 2, with no Otras bucket.
#[test]
fn count_by_sex_matches_reference_example() {
    let records: Vec<NormalizedRecord> = ["Masculino", "Femenino", "Masculino", "Femenino", "Masculino"]
        .iter()
        .enumerate()
        .map(|(i, sex)| record(i as i64, sex, "U", 1.0))
        .collect();

    let buckets = bucket::aggregate(&records, Dimension::Sex, Measure::Count, 3);

    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0].label, "Masculino");
    assert_eq!(buckets[0].value, 3.0);
    assert_eq!(buckets[1].label, "Femenino");
    assert_eq!(buckets[1].value, 2.0);
}

/// 12 distinct categories with top_n = 10: ten explicit buckets plus one
/// Otras equal to the sum of the two smallest groups.
#[test]
fn twelve_categories_top_ten_fold_remainder() {
    let sums = [100.0, 90.0, 80.0, 70.0, 60.0, 50.0, 40.0, 30.0, 25.0, 20.0, 10.0, 5.0];
    let records = records_for_sums(&sums);

    let buckets = bucket::aggregate(
        &records,
        Dimension::AdminUnit,
        Measure::Sum(NumericField::Gross),
        10,
    );

    assert_eq!(buckets.len(), 11, "10 explicit + Otras");
    assert_eq!(buckets[0].value, 100.0);
    assert_eq!(buckets[9].value, 20.0);
    assert_eq!(buckets[10].label, OTHER_LABEL);
    assert_eq!(buckets[10].value, 15.0, "Otras must be the two smallest groups");
}

/// Bucket totals always equal the measure over the whole input, explicit
/// buckets never exceed top_n, and Otras appears iff categories > top_n.
#[test]
fn totals_preserved_and_bucket_count_bounded() {
    let sums = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
    let records = records_for_sums(&sums);
    let input_total: f64 = sums.iter().sum();

    for top_n in 1..=10 {
        let buckets = bucket::aggregate(
            &records,
            Dimension::AdminUnit,
            Measure::Sum(NumericField::Gross),
            top_n,
        );

        let explicit = buckets.iter().filter(|b| b.label != OTHER_LABEL).count();
        assert!(explicit <= top_n, "top_n={top_n}: {explicit} explicit buckets");

        let has_other = buckets.iter().any(|b| b.label == OTHER_LABEL);
        assert_eq!(
            has_other,
            sums.len() > top_n,
            "top_n={top_n}: Otras presence is wrong"
        );

        let total = bucket::summary_total(&buckets);
        assert!(
            (total - input_total).abs() < 1e-9,
            "top_n={top_n}: summary total {total} != input total {input_total}"
        );
    }
}

/// Tied measures order by ascending label, reproducibly.
#[test]
fn ties_break_by_ascending_label() {
    let mut records = Vec::new();
    for (i, unit) in ["Zeta", "Alfa", "Media"].iter().enumerate() {
        records.push(record(i as i64, "Masculino", unit, 50.0));
    }
    records.push(record(10, "Masculino", "Grande", 100.0));

    let first = bucket::aggregate(
        &records,
        Dimension::AdminUnit,
        Measure::Sum(NumericField::Gross),
        4,
    );
    let second = bucket::aggregate(
        &records,
        Dimension::AdminUnit,
        Measure::Sum(NumericField::Gross),
        4,
    );

    let labels: Vec<&str> = first.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["Grande", "Alfa", "Media", "Zeta"]);
    assert_eq!(first, second, "aggregation must be deterministic");
}

/// Empty input yields an empty summary — no buckets, no error, no Otras.
#[test]
fn empty_input_yields_empty_summary() {
    let buckets = bucket::aggregate(&[], Dimension::AdminUnit, Measure::Count, 10);
    assert!(buckets.is_empty());
}

/// The paired-chart variant: categories chosen by gross sum, values
/// reported as counts over that same set. Count totals are preserved.
#[test]
fn selection_by_sum_reports_counts_over_same_set() {
    let mut records = Vec::new();
    // "Chica" has the most records but the smallest gross.
    for i in 0..5 {
        records.push(record(i, "Masculino", "Chica", 1.0));
    }
    // Two records, large gross.
    records.push(record(10, "Masculino", "GranGasto", 1000.0));
    records.push(record(11, "Masculino", "GranGasto", 1000.0));
    // One record, middling gross.
    records.push(record(20, "Masculino", "Media", 500.0));

    let buckets = bucket::aggregate_with_selection(
        &records,
        Dimension::AdminUnit,
        Measure::Sum(NumericField::Gross),
        Measure::Count,
        2,
    );

    // Top-2 by gross are GranGasto (2000) and Media (500); Chica folds
    // into Otras even though it has the most records.
    assert_eq!(buckets.len(), 3);
    assert_eq!(buckets[0].label, "GranGasto");
    assert_eq!(buckets[0].value, 2.0);
    assert_eq!(buckets[1].label, "Media");
    assert_eq!(buckets[1].value, 1.0);
    assert_eq!(buckets[2].label, OTHER_LABEL);
    assert_eq!(buckets[2].value, 5.0);
    assert_eq!(bucket::summary_total(&buckets), records.len() as f64);
}
