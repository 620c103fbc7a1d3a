//! Source endpoints — one database pair per source, loaded from JSON and
//! injected where needed. No process-wide connection singletons.

use crate::{error::ReportResult, period::Period};
use serde::{Deserialize, Serialize};

/// Where one source's databases live: the reference catalog database and
/// the directory holding one `<period>.db` file per settlement period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEndpoint {
    pub reference_db: String,
    pub period_dir: String,
}

impl SourceEndpoint {
    pub fn period_db(&self, period: &Period) -> String {
        format!("{}/{}.db", self.period_dir, period.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEndpoints {
    pub haberes: SourceEndpoint,
    pub plus: SourceEndpoint,
    pub refuerzo: SourceEndpoint,
}

impl SourceEndpoints {
    pub fn from_json_file(path: &str) -> ReportResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read endpoints file '{path}': {e}"))?;
        let endpoints: SourceEndpoints = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("invalid endpoints file '{path}': {e}"))?;
        Ok(endpoints)
    }

    /// All three sources on one reference database and period directory.
    /// Development convenience; production deployments use separate servers.
    pub fn shared(reference_db: &str, period_dir: &str) -> Self {
        let endpoint = SourceEndpoint {
            reference_db: reference_db.to_string(),
            period_dir: period_dir.to_string(),
        };
        Self {
            haberes: endpoint.clone(),
            plus: endpoint.clone(),
            refuerzo: endpoint,
        }
    }
}
