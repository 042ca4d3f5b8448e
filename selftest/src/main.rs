//! Self-test driver for the message-write harness.

mod cli;
mod judge;
mod outcome;
mod report;
mod smoke;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use validation::{exit_codes, logging};

#[derive(Parser)]
#[command(
    name = "selftest",
    version,
    about = "Self-test driver for the message-write harness"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a fixed literal through the shared primitive and read it back.
    Unit {
        /// File to write and read back.
        #[arg(long, default_value = "test_output.txt")]
        file: PathBuf,
        /// Literal message to write.
        #[arg(long, default_value = "WBAB-TEST-SUCCESS")]
        message: String,
        /// Write a JSON report here.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Run the CLI and interactive binaries end to end.
    Smoke {
        /// `validation-cli` binary (defaults to the one next to this executable).
        #[arg(long)]
        cli: Option<PathBuf>,
        /// `validation-ui` binary (defaults to the one next to this executable).
        #[arg(long)]
        ui: Option<PathBuf>,
        /// Scratch directory for written files (defaults to a fresh temp dir).
        #[arg(long)]
        workdir: Option<PathBuf>,
        /// Per-binary wall-clock limit in seconds.
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
        /// Write a JSON report here.
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Unit {
            file,
            message,
            report,
        } => cli::run_unit(&file, &message, report.as_deref()),
        Command::Smoke {
            cli: cli_bin,
            ui: ui_bin,
            workdir,
            timeout_secs,
            report,
        } => {
            let cli_bin = match cli_bin {
                Some(path) => path,
                None => cli::sibling_binary("validation-cli")?,
            };
            let ui_bin = match ui_bin {
                Some(path) => path,
                None => cli::sibling_binary("validation-ui")?,
            };
            let workdir = workdir.unwrap_or_else(cli::default_workdir);
            cli::run_smoke(&cli_bin, &ui_bin, &workdir, timeout_secs, report.as_deref())
        }
    }
}
