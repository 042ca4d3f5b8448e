//! Check execution and outcome recording.
//!
//! The unit suite writes a fixed literal through the shared primitive and
//! independently reads the file back.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use validation::io::write::write_message;

/// Collected check outcomes for one suite.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Judgment {
    pub checks: Vec<CheckOutcome>,
}

impl Judgment {
    pub fn all_passed(&self) -> bool {
        !self.checks.is_empty() && self.checks.iter().all(CheckOutcome::passed)
    }

    /// Human-readable reasons for every failed check.
    pub fn failures(&self) -> Vec<String> {
        self.checks
            .iter()
            .filter_map(CheckOutcome::failure_reason)
            .collect()
    }
}

/// Result of running a single check.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckOutcome {
    WriteSucceeded {
        path: String,
        passed: bool,
        diagnostic: Option<String>,
    },
    FirstLineMatches {
        path: String,
        expected: String,
        actual: Option<String>,
        passed: bool,
    },
    BinaryRun {
        name: String,
        cmd: Vec<String>,
        passed: bool,
        expected_exit_code: i32,
        exit_code: Option<i32>,
        timed_out: bool,
        /// Expected file content, or `None` when no file may appear.
        expected_content: Option<String>,
        actual_content: Option<String>,
        stdout: String,
        stderr: String,
        /// Bytes dropped past the output limit.
        stdout_truncated: usize,
        stderr_truncated: usize,
    },
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        match self {
            CheckOutcome::WriteSucceeded { passed, .. } => *passed,
            CheckOutcome::FirstLineMatches { passed, .. } => *passed,
            CheckOutcome::BinaryRun { passed, .. } => *passed,
        }
    }

    pub fn failure_reason(&self) -> Option<String> {
        if self.passed() {
            return None;
        }
        let reason = match self {
            CheckOutcome::WriteSucceeded { path, diagnostic, .. } => format!(
                "write to {path} failed ({})",
                diagnostic.as_deref().unwrap_or("no diagnostic")
            ),
            CheckOutcome::FirstLineMatches {
                path,
                expected,
                actual: Some(actual),
                ..
            } => format!("Content mismatch in {path}. Expected '{expected}', got '{actual}'"),
            CheckOutcome::FirstLineMatches { path, .. } => {
                format!("Could not read from {path}")
            }
            CheckOutcome::BinaryRun {
                name,
                expected_exit_code,
                exit_code,
                timed_out,
                ..
            } => {
                if *timed_out {
                    format!("{name}: timed out")
                } else {
                    format!(
                        "{name}: exit code {exit_code:?} (expected {expected_exit_code}) or unexpected file content"
                    )
                }
            }
        };
        Some(reason)
    }
}

/// Write `message` to `path`, then read the first line back and compare.
///
/// A failed write ends the suite early; there is nothing to read back.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn run_unit_checks(path: &Path, message: &str) -> Judgment {
    let display = path.display().to_string();
    let outcome = write_message(path, message);
    debug!(check = "write_succeeded", passed = outcome.succeeded, "check result");
    let mut checks = vec![CheckOutcome::WriteSucceeded {
        path: display.clone(),
        passed: outcome.succeeded,
        diagnostic: outcome.diagnostic,
    }];
    if !outcome.succeeded {
        return Judgment { checks };
    }

    let actual = read_first_line(path).ok();
    let passed = actual.as_deref() == Some(message);
    debug!(check = "first_line_matches", passed, "check result");
    checks.push(CheckOutcome::FirstLineMatches {
        path: display,
        expected: message.to_string(),
        actual,
        passed,
    });
    Judgment { checks }
}

/// First line of `path` without its terminator.
pub fn read_first_line(path: &Path) -> Result<String> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut line = String::new();
    let read = BufReader::new(file)
        .read_line(&mut line)
        .with_context(|| format!("read {}", path.display()))?;
    if read == 0 {
        anyhow::bail!("{} is empty", path.display());
    }
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}
