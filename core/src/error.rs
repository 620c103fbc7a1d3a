use crate::types::PayrollKey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid period '{value}': expected yyyy-mm (mm = 01-12, or 13/14 for SAC)")]
    InvalidPeriodFormat { value: String },

    #[error("Source '{source}' unavailable: {cause}")]
    SourceUnavailable {
        source: &'static str,
        #[source]
        cause: rusqlite::Error,
    },

    #[error("Duplicate credit row for key {key:?}: credit totals must arrive pre-aggregated")]
    DuplicateCreditKey { key: PayrollKey },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;
