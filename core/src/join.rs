//! Record Joiner — merges beneficiary rows with per-beneficiary credit
//! totals into one enriched record per beneficiary.
//!
//! Left-outer join on the composite payroll key. A beneficiary with no
//! credit row gets credits = 0, never a missing value, so
//! gross = benefit + credits always holds and gross >= benefit.

use crate::{
    error::{ReportError, ReportResult},
    source::{BeneficiaryRow, CreditRow},
    types::{ControlId, PayrollKey},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// BeneficiaryRow plus the period's credit total and the derived gross.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub control: ControlId,
    pub key: PayrollKey,
    pub sex: String,
    pub benefit: f64,
    pub credits: f64,
    pub gross: f64,
    pub benefit_detail: Option<String>,
    pub benefit_type: Option<String>,
    pub admin_unit: Option<String>,
    pub admin_unit_code: Option<String>,
    pub locality: Option<String>,
    pub birth_date: Option<String>,
}

/// Join beneficiary rows with credit totals. Output length equals the
/// beneficiary input length and order is preserved — the join never
/// expands. Duplicate beneficiary rows each consult the same credit total.
///
/// The credit side is expected pre-aggregated (the reader's SUM-grouped
/// query). A duplicate key there would silently double count, so it fails
/// loudly instead.
pub fn enrich(
    beneficiaries: Vec<BeneficiaryRow>,
    credits: Vec<CreditRow>,
) -> ReportResult<Vec<EnrichedRecord>> {
    let mut credit_by_key: HashMap<PayrollKey, f64> = HashMap::with_capacity(credits.len());
    for row in credits {
        if credit_by_key.insert(row.key, row.credits).is_some() {
            return Err(ReportError::DuplicateCreditKey { key: row.key });
        }
    }

    let enriched = beneficiaries
        .into_iter()
        .map(|b| {
            let credits = credit_by_key.get(&b.key).copied().unwrap_or(0.0);
            EnrichedRecord {
                control: b.control,
                key: b.key,
                sex: b.sex,
                benefit: b.benefit,
                credits,
                gross: b.benefit + credits,
                benefit_detail: b.benefit_detail,
                benefit_type: b.benefit_type,
                admin_unit: b.admin_unit,
                admin_unit_code: b.admin_unit_code,
                locality: b.locality,
                birth_date: b.birth_date,
            }
        })
        .collect();

    Ok(enriched)
}
