//! JSON report persistence for a self-test run.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::judge::{CheckOutcome, Judgment};
use crate::outcome::{Outcome, classify_outcome};

#[derive(Debug, Serialize, Deserialize)]
pub struct SelftestReport {
    /// `unit` or `smoke`.
    pub suite: String,
    pub outcome: Outcome,
    pub started_at: String,
    pub finished_at: String,
    pub duration_secs: f64,
    pub checks: Vec<CheckOutcome>,
    /// Harness errors that prevented checks from running.
    pub errors: Vec<String>,
}

impl SelftestReport {
    pub fn new(
        suite: &str,
        result: Result<Judgment>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let (judgment, errors) = match result {
            Ok(judgment) => (Some(judgment), Vec::new()),
            Err(err) => (None, vec![format!("{err:#}")]),
        };
        let outcome = classify_outcome(judgment.as_ref());
        Self {
            suite: suite.to_string(),
            outcome,
            started_at: started_at.to_rfc3339(),
            finished_at: finished_at.to_rfc3339(),
            duration_secs: (finished_at - started_at).num_milliseconds() as f64 / 1000.0,
            checks: judgment.map(|j| j.checks).unwrap_or_default(),
            errors,
        }
    }
}

pub fn write_report(path: &Path, report: &SelftestReport) -> Result<()> {
    let contents = serde_json::to_string_pretty(report).context("serialize report")?;
    fs::write(path, format!("{contents}\n"))
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
