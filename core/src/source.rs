//! Period-scoped read access to one disbursement database.
//!
//! RULE: Only source.rs talks to the database.
//! Later stages consume plain record vectors and never see a connection.
//!
//! Each of the three sources (haberes, plus, refuerzo) lives on its own
//! database. The period's tables sit in a separate database file attached
//! under the period identifier as schema name, mirroring the upstream
//! `[yyyy-mm]` cross-database layout. Two read queries run per source:
//! credit totals (SUM-grouped) and beneficiary attributes.

use crate::{
    error::{ReportError, ReportResult},
    period::Period,
    types::{ControlId, PayrollKey},
};
use rusqlite::{params, Connection, OpenFlags};
use serde::{Deserialize, Serialize};

/// Which of the three disbursement databases a reader is scoped to.
/// The schema varies: plus and refuerzo carry no locality or birth date,
/// and refuerzo also lacks the administrative-unit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Haberes,
    Plus,
    Refuerzo,
}

impl SourceKind {
    /// Stable identifier used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Haberes => "haberes",
            SourceKind::Plus => "plus",
            SourceKind::Refuerzo => "refuerzo",
        }
    }

    /// Chart-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Haberes => "Haberes",
            SourceKind::Plus => "Plus Unificado",
            SourceKind::Refuerzo => "Plus Refuerzo",
        }
    }

    pub fn has_locality(&self) -> bool {
        matches!(self, SourceKind::Haberes)
    }

    pub fn has_birth_date(&self) -> bool {
        matches!(self, SourceKind::Haberes)
    }

    pub fn has_admin_unit_code(&self) -> bool {
        !matches!(self, SourceKind::Refuerzo)
    }
}

/// One beneficiary attribute row, as fetched. Optional fields are absent
/// per the source schema, not per row quality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeneficiaryRow {
    pub control: ControlId,
    pub key: PayrollKey,
    pub sex: String,
    pub benefit: f64,
    pub benefit_detail: Option<String>,
    /// Benefit-type code, e.g. "jub" / "pen".
    pub benefit_type: Option<String>,
    /// Administrative-unit detail ("repartición").
    pub admin_unit: Option<String>,
    /// Administrative-unit code; haberes and plus only.
    pub admin_unit_code: Option<String>,
    /// Haberes only.
    pub locality: Option<String>,
    /// Raw dd/mm/yyyy text; haberes only. Parsed during normalization.
    pub birth_date: Option<String>,
}

/// Pre-aggregated credit total for one payroll key within the period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CreditRow {
    pub key: PayrollKey,
    pub credits: f64,
}

#[derive(Debug)]
pub struct PayrollSource {
    conn: Connection,
    kind: SourceKind,
    period: Period,
}

impl PayrollSource {
    /// Open the reference database read-only and attach the period database.
    /// Any failure here is `SourceUnavailable` — fatal for this source's
    /// contribution, never retried at this layer.
    pub fn open(
        kind: SourceKind,
        period: Period,
        reference_db: &str,
        period_db: &str,
    ) -> ReportResult<Self> {
        let conn = Connection::open_with_flags(reference_db, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|cause| ReportError::SourceUnavailable {
                source: kind.name(),
                cause,
            })?;
        let source = Self { conn, kind, period };
        source.attach_period_db(period_db)?;
        Ok(source)
    }

    /// Wrap an already-prepared connection. Used by tests, which build the
    /// reference and period tables on an in-memory database.
    pub fn with_connection(kind: SourceKind, period: Period, conn: Connection) -> Self {
        Self { conn, kind, period }
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn period(&self) -> &Period {
        &self.period
    }

    fn attach_period_db(&self, path: &str) -> ReportResult<()> {
        // The schema name is the period string — digits and a dash only,
        // guaranteed by Period::parse, so splicing it is safe.
        let sql = format!("ATTACH DATABASE ?1 AS \"{}\"", self.period.as_str());
        self.conn
            .execute(&sql, params![path])
            .map_err(|cause| self.unavailable(cause))?;
        Ok(())
    }

    fn unavailable(&self, cause: rusqlite::Error) -> ReportError {
        ReportError::SourceUnavailable {
            source: self.kind.name(),
            cause,
        }
    }

    fn period_schema(&self) -> String {
        format!("\"{}\"", self.period.as_str())
    }

    /// Credit totals per payroll key: SUM over credit-typed transaction
    /// codes, grouped so that one row comes back per key.
    pub fn fetch_credit_totals(&self) -> ReportResult<Vec<CreditRow>> {
        let schema = self.period_schema();
        // Haberes keeps its code catalog inside the period database;
        // plus and refuerzo keep it in the reference database.
        let codes = match self.kind {
            SourceKind::Haberes => format!("{schema}.codigos"),
            _ => "codigos".to_string(),
        };
        let sql = format!(
            "SELECT l.plla, l.orden, l.afiliado, SUM(l.monto) AS creditos
             FROM {schema}.liquidacion l
             JOIN {codes} c ON c.codigo = l.codigo
             WHERE c.tipo = 'C'
             GROUP BY l.plla, l.orden, l.afiliado",
        );

        let mut stmt = self.conn.prepare(&sql).map_err(|e| self.unavailable(e))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(CreditRow {
                    key: PayrollKey {
                        plla: row.get(0)?,
                        orden: row.get(1)?,
                        afiliado: row.get(2)?,
                    },
                    credits: row.get(3)?,
                })
            })
            .map_err(|e| self.unavailable(e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| self.unavailable(e))?;
        Ok(rows)
    }

    /// One row per beneficiary paid in the period, joined with the
    /// reference catalogs for benefit type, administrative unit and
    /// (haberes only) locality.
    pub fn fetch_beneficiaries(&self) -> ReportResult<Vec<BeneficiaryRow>> {
        let schema = self.period_schema();
        // Columns absent from this source's schema select as NULL so the
        // row mapper stays fixed.
        let admin_unit_code = if self.kind.has_admin_unit_code() {
            "r.tipo_reparticion"
        } else {
            "NULL"
        };
        let locality = if self.kind.has_locality() {
            "loc.localidad"
        } else {
            "NULL"
        };
        let birth_date = if self.kind.has_birth_date() {
            "d.fnac"
        } else {
            "NULL"
        };
        let locality_join = if self.kind.has_locality() {
            "LEFT OUTER JOIN localidades loc ON loc.cod_localidad = d.cod_localidad"
        } else {
            ""
        };

        let sql = format!(
            "SELECT dl.control, dl.plla, dl.orden, dl.afiliado, d.sexo, dl.beneficio,
                    b.detalle AS beneficio_tipo, b.tipo, r.detalle AS reparticion,
                    {admin_unit_code}, {locality}, {birth_date}
             FROM datos_afiliado d
             LEFT OUTER JOIN beneficio b ON b.cod = d.cod_beneficio
             LEFT OUTER JOIN reparticion r ON r.cod = d.letra
             {locality_join}
             INNER JOIN {schema}.datos_afiliado dl ON dl.control = d.control",
        );

        let mut stmt = self.conn.prepare(&sql).map_err(|e| self.unavailable(e))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(BeneficiaryRow {
                    control: row.get(0)?,
                    key: PayrollKey {
                        plla: row.get(1)?,
                        orden: row.get(2)?,
                        afiliado: row.get(3)?,
                    },
                    sex: row.get(4)?,
                    benefit: row.get(5)?,
                    benefit_detail: row.get(6)?,
                    benefit_type: row.get(7)?,
                    admin_unit: row.get(8)?,
                    admin_unit_code: row.get(9)?,
                    locality: row.get(10)?,
                    birth_date: row.get(11)?,
                })
            })
            .map_err(|e| self.unavailable(e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| self.unavailable(e))?;
        Ok(rows)
    }
}
