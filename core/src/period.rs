//! Settlement period identifier ("liquidación").
//!
//! A period is a string of the shape `yyyy-mm`. The trailing two digits are
//! a calendar month (01-12) or one of the supplementary-payment sentinels:
//! 13 for the first SAC, 14 for the second. Shape validation happens once,
//! here, before any query is issued against the period's namespace.

use crate::error::{ReportError, ReportResult};
use serde::Serialize;
use std::fmt;

pub const FIRST_SAC: u8 = 13;
pub const SECOND_SAC: u8 = 14;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Period {
    raw: String,
    #[serde(skip)]
    year: u16,
    #[serde(skip)]
    suffix: u8,
}

impl Period {
    /// Parse and validate a period identifier.
    ///
    /// Accepts exactly four digits, a dash, two digits. Anything else is
    /// `InvalidPeriodFormat` — rejected before any source is touched.
    pub fn parse(value: &str) -> ReportResult<Self> {
        let bytes = value.as_bytes();
        let well_formed = bytes.len() == 7
            && bytes[..4].iter().all(u8::is_ascii_digit)
            && bytes[4] == b'-'
            && bytes[5..].iter().all(u8::is_ascii_digit);

        if !well_formed {
            return Err(ReportError::InvalidPeriodFormat {
                value: value.to_string(),
            });
        }

        // The digit checks above guarantee both parses succeed.
        let year: u16 = value[..4].parse().map_err(|_| ReportError::InvalidPeriodFormat {
            value: value.to_string(),
        })?;
        let suffix: u8 = value[5..].parse().map_err(|_| ReportError::InvalidPeriodFormat {
            value: value.to_string(),
        })?;

        Ok(Self {
            raw: value.to_string(),
            year,
            suffix,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    /// The raw two-digit suffix: month or SAC sentinel.
    pub fn suffix(&self) -> u8 {
        self.suffix
    }

    pub fn is_supplementary(&self) -> bool {
        self.suffix == FIRST_SAC || self.suffix == SECOND_SAC
    }

    /// Human-facing name: "09/2024", "1º SAC/2024", "2º SAC/2024".
    pub fn display_name(&self) -> String {
        match self.suffix {
            FIRST_SAC => format!("1º SAC/{}", self.year),
            SECOND_SAC => format!("2º SAC/{}", self.year),
            month => format!("{month:02}/{}", self.year),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
