//! One settlement period, end to end: fetch → join → normalize → summarize.
//!
//! Everything here is recomputed in full per period. Nothing is persisted
//! and nothing is mutated after creation; a caller wanting several periods
//! or sources in parallel just runs independent pipelines.

use crate::{
    bucket::{self, Bucket, Dimension, Measure, NumericField},
    error::ReportResult,
    join,
    normalize::{self, FieldQuality, NormalizedRecord},
    period::Period,
    source::PayrollSource,
};
use chrono::NaiveDate;
use serde::Serialize;

/// Explicit top-group counts used by the standard charts.
const TOP_SEXES: usize = 3;
const TOP_BENEFIT_CLASSES: usize = 3;
const TOP_ADMIN_UNITS: usize = 10;
const TOP_LOCALITIES: usize = 10;

/// One source's fully normalized table plus its data-quality counters,
/// ready for tabular display or aggregation.
#[derive(Debug, Clone, Serialize)]
pub struct SourceTable {
    pub label: &'static str,
    pub records: Vec<NormalizedRecord>,
    pub quality: FieldQuality,
}

impl SourceTable {
    pub fn total_gross(&self) -> f64 {
        self.records.iter().map(|r| r.gross).sum()
    }
}

/// Run one source's full load: both queries, the join, normalization.
/// A query failure surfaces as `SourceUnavailable`; the caller decides
/// whether to omit this source's contribution or abort the report.
pub fn load_source(source: &PayrollSource, reference: NaiveDate) -> ReportResult<SourceTable> {
    let credits = source.fetch_credit_totals()?;
    let beneficiaries = source.fetch_beneficiaries()?;
    log::info!(
        "{}: {} beneficiary rows, {} credit totals for {}",
        source.kind().name(),
        beneficiaries.len(),
        credits.len(),
        source.period(),
    );

    let enriched = join::enrich(beneficiaries, credits)?;
    let (records, quality) =
        normalize::normalize(enriched, reference, source.kind().has_locality());
    if quality.unparseable_birth_dates > 0 {
        log::warn!(
            "{}: {} unparseable birth dates excluded from age statistics",
            source.kind().name(),
            quality.unparseable_birth_dates,
        );
    }

    Ok(SourceTable {
        label: source.kind().label(),
        records,
        quality,
    })
}

/// All chart-ready summaries for one period. Labels and bucket layouts
/// match the report pages one to one; rendering happens elsewhere.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodSummary {
    pub period: String,
    pub period_display: String,
    pub beneficiary_count: usize,
    pub total_gross: f64,
    pub mean_age: Option<f64>,
    /// Gross total per contributing source ("Haberes" / "Plus Unificado" /
    /// "Plus Refuerzo"). Omitted sources simply have no bucket.
    pub total_cost: Vec<Bucket>,
    pub by_sex: Vec<Bucket>,
    pub by_benefit_class: Vec<Bucket>,
    /// Top 10 administrative units by gross sum, plus Otras.
    pub by_admin_unit_gross: Vec<Bucket>,
    /// Beneficiary counts over that same top-10 unit set, plus Otras.
    pub by_admin_unit_count: Vec<Bucket>,
    pub by_locality_count: Vec<Bucket>,
}

impl PeriodSummary {
    /// Summarize one period from the main table and whichever supplementary
    /// tables are available. Sex, type, unit and locality breakdowns come
    /// from the main table; the cost breakdown spans all present sources.
    pub fn compute(
        period: &Period,
        haberes: &SourceTable,
        plus: Option<&SourceTable>,
        refuerzo: Option<&SourceTable>,
    ) -> Self {
        let mut total_cost = vec![Bucket {
            label: haberes.label.to_string(),
            value: haberes.total_gross(),
        }];
        for table in [plus, refuerzo].into_iter().flatten() {
            total_cost.push(Bucket {
                label: table.label.to_string(),
                value: table.total_gross(),
            });
        }

        let records = &haberes.records;
        Self {
            period: period.as_str().to_string(),
            period_display: period.display_name(),
            beneficiary_count: records.len(),
            total_gross: haberes.total_gross(),
            mean_age: normalize::mean_age(records),
            total_cost,
            by_sex: bucket::aggregate(records, Dimension::Sex, Measure::Count, TOP_SEXES),
            by_benefit_class: bucket::aggregate(
                records,
                Dimension::BenefitClass,
                Measure::Count,
                TOP_BENEFIT_CLASSES,
            ),
            by_admin_unit_gross: bucket::aggregate(
                records,
                Dimension::AdminUnit,
                Measure::Sum(NumericField::Gross),
                TOP_ADMIN_UNITS,
            ),
            by_admin_unit_count: bucket::aggregate_with_selection(
                records,
                Dimension::AdminUnit,
                Measure::Sum(NumericField::Gross),
                Measure::Count,
                TOP_ADMIN_UNITS,
            ),
            by_locality_count: bucket::aggregate(
                records,
                Dimension::Locality,
                Measure::Count,
                TOP_LOCALITIES,
            ),
        }
    }
}
