//! haberes-core — multi-source pension disbursement reporting.
//!
//! One settlement period ("liquidación") is processed per source as:
//!   fetch (source) → join (join) → normalize (normalize) → aggregate (bucket)
//!
//! RULES:
//!   - Only source.rs talks to the database.
//!   - join, normalize and bucket are pure transforms over owned record
//!     vectors; they never touch a connection.
//!   - Per-record data-quality problems degrade to missing values.
//!     No stage ever drops a row.

pub mod bucket;
pub mod config;
pub mod error;
pub mod join;
pub mod normalize;
pub mod period;
pub mod report;
pub mod source;
pub mod types;
