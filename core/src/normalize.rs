//! Field Normalizer — display-ready categorical values and derived fields.
//!
//! Every categorical domain is a lookup with an explicit passthrough rule:
//! unknown codes come back unchanged, never as an error. Malformed optional
//! fields degrade to missing values and are counted in `FieldQuality`;
//! no row is dropped here regardless of field quality.

use crate::{
    join::EnrichedRecord,
    types::{ControlId, PayrollKey},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sentinel shown for beneficiaries without a locality on file.
pub const NO_LOCALITY: &str = "SIN LOCALIDAD";

/// Benefit-type code marking a pension (as opposed to a retirement).
pub const PENSION_CODE: &str = "pen";

/// Sex code remap: exact two-value lookup, anything else passes through.
pub fn normalize_sex(raw: &str) -> &str {
    match raw {
        "M" => "Masculino",
        "F" => "Femenino",
        other => other,
    }
}

/// Combined benefit class. Police and prison retirements are their own
/// class regardless of benefit type; otherwise the benefit-type code
/// decides. Sources without the administrative-unit detail fall through
/// to the benefit-type branch.
pub fn benefit_class(admin_unit: Option<&str>, benefit_type: Option<&str>) -> &'static str {
    match admin_unit {
        Some("Retiro Policial") | Some("Retiro Carcelario") => "Ret Pol.",
        _ if benefit_type == Some(PENSION_CODE) => "Pensiones",
        _ => "Jubilaciones",
    }
}

/// Administrative-unit code → display name. The code set is open: codes
/// not in the table pass through unchanged.
pub fn admin_unit_label(code: &str) -> &str {
    match code {
        "AGUAS" => "Aguas",
        "NO" => "Org.Desc.",
        "MG" | "AC" => "Adm. Central",
        "SP" => "Salud Pública",
        "Legisladores" => "P. Legislativo",
        "DOC" => "Docente",
        "JUPOLICIA" => "Policia",
        "MOVILIDADES" | "Cautelares" | "Certificado" | "Especial" => "Otras leyes",
        other => other,
    }
}

/// Locality cleanup: zero/empty → sentinel, the known San Luis del Palmar
/// variant → its canonical two-line label, all else passthrough.
pub fn clean_locality(raw: &str) -> &str {
    match raw {
        "" | "0" => NO_LOCALITY,
        "SAN LUIS DEL PALMAR" => "SAN LUIS\nDEL PALMAR",
        other => other,
    }
}

/// Age at `reference` as a day count divided by 365. The upstream reports
/// use this approximation, so it is the defined semantics here too.
pub fn age_years(birth_date: &str, reference: NaiveDate) -> Option<f64> {
    let parsed = NaiveDate::parse_from_str(birth_date, "%d/%m/%Y").ok()?;
    Some((reference - parsed).num_days() as f64 / 365.0)
}

/// Fully normalized, display-ready beneficiary record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub control: ControlId,
    pub key: PayrollKey,
    pub sex: String,
    /// None when the birth date was absent or unparseable; excluded from
    /// age statistics, the record itself is kept.
    pub age: Option<f64>,
    pub benefit: f64,
    pub credits: f64,
    pub gross: f64,
    pub benefit_detail: Option<String>,
    pub benefit_class: String,
    /// Administrative-unit detail, passthrough.
    pub admin_unit: Option<String>,
    /// Display name for the administrative-unit code, where the source has one.
    pub admin_unit_label: Option<String>,
    pub locality: Option<String>,
}

/// Per-batch data-quality counters. These never become errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldQuality {
    pub unparseable_birth_dates: u64,
}

/// Normalize a source's enriched records. Output has the same length and
/// order as the input.
///
/// `has_locality` says whether this source's schema carries a locality at
/// all. When it does, a beneficiary whose locality lookup came back empty
/// still displays the sentinel; sources without the column keep `None`.
pub fn normalize(
    records: Vec<EnrichedRecord>,
    reference: NaiveDate,
    has_locality: bool,
) -> (Vec<NormalizedRecord>, FieldQuality) {
    let mut quality = FieldQuality::default();

    let normalized = records
        .into_iter()
        .map(|r| {
            let age = match r.birth_date.as_deref() {
                Some(raw) => {
                    let age = age_years(raw, reference);
                    if age.is_none() {
                        quality.unparseable_birth_dates += 1;
                        log::warn!(
                            "control={}: unparseable birth date '{raw}', age marked missing",
                            r.control
                        );
                    }
                    age
                }
                None => None,
            };

            NormalizedRecord {
                control: r.control,
                key: r.key,
                sex: normalize_sex(&r.sex).to_string(),
                age,
                benefit: r.benefit,
                credits: r.credits,
                gross: r.gross,
                benefit_detail: r.benefit_detail,
                benefit_class: benefit_class(r.admin_unit.as_deref(), r.benefit_type.as_deref())
                    .to_string(),
                admin_unit: r.admin_unit,
                admin_unit_label: r
                    .admin_unit_code
                    .as_deref()
                    .map(|code| admin_unit_label(code).to_string()),
                locality: if has_locality {
                    Some(clean_locality(r.locality.as_deref().unwrap_or("")).to_string())
                } else {
                    None
                },
            }
        })
        .collect();

    (normalized, quality)
}

/// Mean age over records that have one. None when no record does.
pub fn mean_age(records: &[NormalizedRecord]) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for age in records.iter().filter_map(|r| r.age) {
        sum += age;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
