//! report-runner: headless summary generator for one settlement period.
//!
//! Usage:
//!   report-runner --period 2024-09 --config endpoints.json
//!   report-runner --period 2024-13 --data-dir ./data
//!
//! With --data-dir, all three sources share ./data/liquidacion.db as the
//! reference database and ./data/<period>.db as the period database.
//! Prints the period summary as pretty JSON on stdout.

use anyhow::Result;
use haberes_core::{
    config::{SourceEndpoint, SourceEndpoints},
    period::Period,
    report::{self, PeriodSummary, SourceTable},
    source::{PayrollSource, SourceKind},
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let period_arg = arg_value(&args, "--period")
        .ok_or_else(|| anyhow::anyhow!("missing --period yyyy-mm"))?;
    let period = Period::parse(&period_arg)?;

    let endpoints = match arg_value(&args, "--config") {
        Some(path) => SourceEndpoints::from_json_file(&path)?,
        None => {
            let data_dir = arg_value(&args, "--data-dir").unwrap_or_else(|| "./data".to_string());
            SourceEndpoints::shared(&format!("{data_dir}/liquidacion.db"), &data_dir)
        }
    };

    let reference = chrono::Local::now().date_naive();

    // The main source is mandatory; a supplementary source that cannot be
    // reached is omitted from the report with a warning.
    let haberes = load(SourceKind::Haberes, &endpoints.haberes, &period, reference)?;
    let plus = load_optional(SourceKind::Plus, &endpoints.plus, &period, reference);
    let refuerzo = load_optional(SourceKind::Refuerzo, &endpoints.refuerzo, &period, reference);

    let summary = PeriodSummary::compute(&period, &haberes, plus.as_ref(), refuerzo.as_ref());
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

fn load(
    kind: SourceKind,
    endpoint: &SourceEndpoint,
    period: &Period,
    reference: chrono::NaiveDate,
) -> Result<SourceTable> {
    let source = PayrollSource::open(
        kind,
        period.clone(),
        &endpoint.reference_db,
        &endpoint.period_db(period),
    )?;
    Ok(report::load_source(&source, reference)?)
}

fn load_optional(
    kind: SourceKind,
    endpoint: &SourceEndpoint,
    period: &Period,
    reference: chrono::NaiveDate,
) -> Option<SourceTable> {
    match load(kind, endpoint, period, reference) {
        Ok(table) => Some(table),
        Err(e) => {
            log::warn!("omitting source '{}': {e}", kind.name());
            None
        }
    }
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].clone())
}
