//! CLI command implementations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info};
use validation::exit_codes;

use crate::judge::{Judgment, run_unit_checks};
use crate::outcome::Outcome;
use crate::report::{SelftestReport, write_report};
use crate::smoke::{CommandLimits, run_smoke_cases, standard_cases};

/// Exit code for a failed or errored suite.
pub const FAILED: i32 = 1;

/// Write the literal to `file`, read it back, and report pass/fail.
pub fn run_unit(file: &Path, message: &str, report: Option<&Path>) -> Result<i32> {
    println!("Running unit tests...");
    let started_at = Utc::now();
    let judgment = run_unit_checks(file, message);
    let finished_at = Utc::now();
    finish("unit", Ok(judgment), started_at, finished_at, report, "Unit tests PASSED")
}

/// Drive the CLI and interactive binaries through the standard scenarios.
pub fn run_smoke(
    cli: &Path,
    ui: &Path,
    workdir: &Path,
    timeout_secs: u64,
    report: Option<&Path>,
) -> Result<i32> {
    println!("Running smoke tests in {}...", workdir.display());
    info!(cli = %cli.display(), ui = %ui.display(), "starting smoke suite");
    let started_at = Utc::now();
    let cases = standard_cases(cli, ui);
    let judgment = run_smoke_cases(
        &cases,
        workdir,
        CommandLimits::with_timeout_secs(timeout_secs),
    );
    let finished_at = Utc::now();
    finish("smoke", judgment, started_at, finished_at, report, "Smoke tests PASSED")
}

fn finish(
    suite: &str,
    judgment: Result<Judgment>,
    started_at: chrono::DateTime<Utc>,
    finished_at: chrono::DateTime<Utc>,
    report_path: Option<&Path>,
    passed_line: &str,
) -> Result<i32> {
    let failures = judgment
        .as_ref()
        .map(Judgment::failures)
        .unwrap_or_default();
    let report = SelftestReport::new(suite, judgment, started_at, finished_at);
    debug!(suite, outcome = ?report.outcome, "suite finished");

    for error in &report.errors {
        eprintln!("ERROR: {error}");
    }
    for reason in &failures {
        eprintln!("FAILED: {reason}");
    }
    if let Some(path) = report_path {
        write_report(path, &report).context("write selftest report")?;
    }

    if report.outcome == Outcome::Pass {
        println!("{passed_line}");
        Ok(exit_codes::OK)
    } else {
        Ok(FAILED)
    }
}

/// Path of a sibling binary next to the running executable.
pub fn sibling_binary(name: &str) -> Result<PathBuf> {
    let exe = std::env::current_exe().context("locate current executable")?;
    Ok(exe.with_file_name(format!("{name}{}", std::env::consts::EXE_SUFFIX)))
}

/// Fresh scratch directory for a smoke run.
pub fn default_workdir() -> PathBuf {
    let stamp = Utc::now().format("%Y%m%d_%H%M%S");
    std::env::temp_dir().join(format!("selftest-{stamp}-{}", std::process::id()))
}
