//! End-to-end smoke checks against the front-end binaries.
//!
//! Each case runs one binary as a child process in a scratch directory, then
//! judges its exit code and the file it left behind.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, instrument, warn};
use validation::exit_codes;
use wait_timeout::ChildExt;

use crate::judge::{CheckOutcome, Judgment};

/// Limits for child process execution.
#[derive(Debug, Clone, Copy)]
pub struct CommandLimits {
    /// Maximum time before killing the child.
    pub timeout: Duration,
    /// Maximum bytes kept from stdout/stderr.
    pub output_limit_bytes: usize,
}

impl CommandLimits {
    pub fn with_timeout_secs(secs: u64) -> Self {
        Self {
            timeout: Duration::from_secs(secs),
            output_limit_bytes: 50_000,
        }
    }
}

/// One child-process scenario.
#[derive(Debug, Clone)]
pub struct SmokeCase {
    pub name: String,
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Bytes fed to stdin; stdin is closed afterwards.
    pub stdin: String,
    /// File the case inspects, relative to the work dir.
    pub output: PathBuf,
    pub expected_exit_code: i32,
    /// Expected file content, or `None` when the file must not exist.
    pub expected_content: Option<String>,
}

/// The standard scenarios for the CLI and interactive binaries.
pub fn standard_cases(cli: &Path, ui: &Path) -> Vec<SmokeCase> {
    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }
    vec![
        SmokeCase {
            name: "cli_writes_message".to_string(),
            program: cli.to_path_buf(),
            args: args(&["--output", "cli.txt", "--message", "cli smoke"]),
            stdin: String::new(),
            output: PathBuf::from("cli.txt"),
            expected_exit_code: exit_codes::OK,
            expected_content: Some("cli smoke\n".to_string()),
        },
        SmokeCase {
            name: "cli_missing_directory_fails".to_string(),
            program: cli.to_path_buf(),
            args: args(&["--output", "no-such-dir/cli.txt", "--message", "lost"]),
            stdin: String::new(),
            output: PathBuf::from("no-such-dir/cli.txt"),
            expected_exit_code: exit_codes::WRITE_FAILED,
            expected_content: None,
        },
        SmokeCase {
            name: "ui_timeout_skips_window".to_string(),
            program: ui.to_path_buf(),
            args: args(&[
                "--output",
                "ui_timeout.txt",
                "--message",
                "ui timeout",
                "--timeout",
                "1",
            ]),
            stdin: "ignored edit\n\n".to_string(),
            output: PathBuf::from("ui_timeout.txt"),
            expected_exit_code: exit_codes::OK,
            expected_content: Some("ui timeout\n".to_string()),
        },
        SmokeCase {
            name: "ui_edit_then_trigger".to_string(),
            program: ui.to_path_buf(),
            args: args(&["--output", "ui_edit.txt"]),
            stdin: "edited in window\n\n".to_string(),
            output: PathBuf::from("ui_edit.txt"),
            expected_exit_code: exit_codes::OK,
            expected_content: Some("edited in window\n".to_string()),
        },
    ]
}

/// Run every case in `workdir` and collect outcomes.
#[instrument(skip_all, fields(case_count = cases.len(), workdir = %workdir.display()))]
pub fn run_smoke_cases(
    cases: &[SmokeCase],
    workdir: &Path,
    limits: CommandLimits,
) -> Result<Judgment> {
    fs::create_dir_all(workdir).with_context(|| format!("create {}", workdir.display()))?;
    let mut checks = Vec::with_capacity(cases.len());
    for case in cases {
        checks.push(run_case(case, workdir, limits)?);
    }
    Ok(Judgment { checks })
}

fn run_case(case: &SmokeCase, workdir: &Path, limits: CommandLimits) -> Result<CheckOutcome> {
    let target = workdir.join(&case.output);
    if target.exists() {
        fs::remove_file(&target).with_context(|| format!("remove stale {}", target.display()))?;
    }

    let mut child = Command::new(&case.program)
        .args(&case.args)
        .current_dir(workdir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawn {}", case.program.display()))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;
    let limit = limits.output_limit_bytes;
    let stdout_handle = thread::spawn(move || read_stream_limited(stdout, limit));
    let stderr_handle = thread::spawn(move || read_stream_limited(stderr, limit));

    if let Some(mut stdin) = child.stdin.take() {
        // Children that exit without reading close the pipe early.
        if let Err(err) = stdin.write_all(case.stdin.as_bytes()) {
            debug!(case = %case.name, error = %err, "stdin not consumed");
        }
    }

    let mut timed_out = false;
    let status = match child.wait_timeout(limits.timeout).context("wait for child")? {
        Some(status) => status,
        None => {
            timed_out = true;
            child.kill().context("kill child")?;
            child.wait().context("wait after kill")?
        }
    };

    let (stdout, stdout_truncated) = join_output(stdout_handle).context("join stdout")?;
    let (stderr, stderr_truncated) = join_output(stderr_handle).context("join stderr")?;
    if stdout_truncated > 0 || stderr_truncated > 0 {
        warn!(case = %case.name, stdout_truncated, stderr_truncated, "output truncated");
    }

    let exit_code = status.code();
    let actual_content = fs::read_to_string(&target).ok();
    let passed = !timed_out
        && exit_code == Some(case.expected_exit_code)
        && actual_content == case.expected_content;
    if timed_out {
        warn!(case = %case.name, "smoke case timed out");
    } else {
        debug!(case = %case.name, ?exit_code, passed, "check result");
    }

    let mut cmd = vec![case.program.display().to_string()];
    cmd.extend(case.args.iter().cloned());
    Ok(CheckOutcome::BinaryRun {
        name: case.name.clone(),
        cmd,
        passed,
        expected_exit_code: case.expected_exit_code,
        exit_code,
        timed_out,
        expected_content: case.expected_content.clone(),
        actual_content,
        stdout: String::from_utf8_lossy(&stdout).to_string(),
        stderr: String::from_utf8_lossy(&stderr).to_string(),
        stdout_truncated,
        stderr_truncated,
    })
}

fn join_output(handle: thread::JoinHandle<Result<(Vec<u8>, usize)>>) -> Result<(Vec<u8>, usize)> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("output reader thread panicked")),
    }
}

/// Drain `reader` to EOF, keeping at most `limit` bytes.
///
/// Returns the kept bytes and the count of bytes dropped.
fn read_stream_limited<R: Read>(mut reader: R, limit: usize) -> Result<(Vec<u8>, usize)> {
    let mut buf = Vec::new();
    let mut truncated = 0usize;
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader.read(&mut chunk).context("read output")?;
        if n == 0 {
            break;
        }
        let keep = n.min(limit.saturating_sub(buf.len()));
        buf.extend_from_slice(&chunk[..keep]);
        truncated += n - keep;
    }

    Ok((buf, truncated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sh_case(
        name: &str,
        script: &str,
        expected_exit_code: i32,
        expected: Option<&str>,
    ) -> SmokeCase {
        SmokeCase {
            name: name.to_string(),
            program: PathBuf::from("sh"),
            args: vec!["-c".to_string(), script.to_string()],
            stdin: String::new(),
            output: PathBuf::from("out.txt"),
            expected_exit_code,
            expected_content: expected.map(str::to_string),
        }
    }

    #[test]
    fn matching_exit_and_content_passes() {
        let temp = tempdir().expect("tempdir");
        let cases = vec![sh_case("ok", "printf 'hi\\n' > out.txt", 0, Some("hi\n"))];

        let judgment = run_smoke_cases(&cases, temp.path(), CommandLimits::with_timeout_secs(5))
            .expect("smoke");

        assert!(judgment.all_passed());
    }

    #[test]
    fn wrong_exit_code_fails() {
        let temp = tempdir().expect("tempdir");
        let cases = vec![sh_case("bad exit", "exit 1", 0, None)];

        let judgment = run_smoke_cases(&cases, temp.path(), CommandLimits::with_timeout_secs(5))
            .expect("smoke");

        assert!(!judgment.all_passed());
        match &judgment.checks[0] {
            CheckOutcome::BinaryRun { exit_code, .. } => assert_eq!(*exit_code, Some(1)),
            _ => panic!("expected binary_run"),
        }
    }

    #[test]
    fn unexpected_file_fails() {
        let temp = tempdir().expect("tempdir");
        let cases = vec![sh_case("stray file", "printf 'x\\n' > out.txt; exit 1", 1, None)];

        let judgment = run_smoke_cases(&cases, temp.path(), CommandLimits::with_timeout_secs(5))
            .expect("smoke");

        assert!(!judgment.all_passed());
    }

    #[test]
    fn stale_output_is_removed_before_run() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join("out.txt"), "stale\n").expect("seed");
        let cases = vec![sh_case("no write", "exit 0", 0, None)];

        let judgment = run_smoke_cases(&cases, temp.path(), CommandLimits::with_timeout_secs(5))
            .expect("smoke");

        assert!(judgment.all_passed());
    }

    #[test]
    fn slow_child_times_out() {
        let temp = tempdir().expect("tempdir");
        let cases = vec![sh_case("slow", "sleep 5", 0, None)];

        let judgment = run_smoke_cases(&cases, temp.path(), CommandLimits::with_timeout_secs(1))
            .expect("smoke");

        match &judgment.checks[0] {
            CheckOutcome::BinaryRun {
                timed_out, passed, ..
            } => {
                assert!(*timed_out);
                assert!(!*passed);
            }
            _ => panic!("expected binary_run"),
        }
    }

    #[test]
    fn large_output_is_drained_and_truncated() {
        let temp = tempdir().expect("tempdir");
        let cases = vec![sh_case(
            "chatty",
            "head -c 300000 /dev/zero; head -c 300000 /dev/zero >&2; printf 'done\\n' > out.txt",
            0,
            Some("done\n"),
        )];

        let judgment = run_smoke_cases(&cases, temp.path(), CommandLimits::with_timeout_secs(10))
            .expect("smoke");

        match &judgment.checks[0] {
            CheckOutcome::BinaryRun {
                passed,
                timed_out,
                stdout,
                stdout_truncated,
                stderr_truncated,
                ..
            } => {
                assert!(!*timed_out);
                assert!(*passed);
                assert_eq!(stdout.len(), 50_000);
                assert_eq!(*stdout_truncated, 250_000);
                assert_eq!(*stderr_truncated, 250_000);
            }
            _ => panic!("expected binary_run"),
        }
    }

    #[test]
    fn reader_keeps_limit_and_counts_the_rest() {
        let (kept, dropped) = read_stream_limited(&[7u8; 20_000][..], 10_000).expect("read");
        assert_eq!(kept.len(), 10_000);
        assert_eq!(dropped, 10_000);
    }

    #[test]
    fn standard_cases_cover_both_binaries() {
        let cases = standard_cases(Path::new("/bin/cli"), Path::new("/bin/ui"));
        assert!(cases.iter().any(|c| c.program == Path::new("/bin/cli")));
        assert!(cases.iter().any(|c| c.program == Path::new("/bin/ui")));
        assert!(
            cases
                .iter()
                .any(|c| c.expected_exit_code == exit_codes::WRITE_FAILED
                    && c.expected_content.is_none())
        );
    }
}
