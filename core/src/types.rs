//! Shared primitive types used across the reporting pipeline.

use serde::{Deserialize, Serialize};

/// Composite natural key of one payroll line:
/// (payroll sheet, line number, affiliate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayrollKey {
    pub plla:     i64,
    pub orden:    i64,
    pub afiliado: i64,
}

/// The per-beneficiary control identifier carried through for display.
pub type ControlId = i64;
