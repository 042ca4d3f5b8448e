//! Command-line front end for the message-write harness.
//!
//! Resolves `--message` / `--output` from the process arguments (unknown flags
//! are ignored), writes once, and exits 0 on success or 1 on failure.

use anyhow::Result;
use tracing::debug;
use validation::core::args::{Settings, resolve_settings};
use validation::exit_codes;
use validation::io::console::Console;
use validation::io::write::write_request;
use validation::logging;
use validation::settings::{CLI_DEFAULTS, CLI_FLAGS, process_tokens};

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
    let settings = resolve_settings(process_tokens(), &CLI_DEFAULTS, CLI_FLAGS);
    debug!(?settings, "resolved settings");
    write_once(&settings, &mut Console::stdout())
}

fn write_once<W: std::io::Write>(settings: &Settings, console: &mut Console<W>) -> Result<i32> {
    let output = settings.output.display();
    console.line(format_args!("INFO: CLI attempting to write to {output}"))?;
    let outcome = write_request(&settings.request());
    if outcome.succeeded {
        console.line(format_args!(
            "SUCCESS: Wrote '{}'",
            String::from_utf8_lossy(&settings.message)
        ))?;
        Ok(exit_codes::OK)
    } else {
        console.line(format_args!("FAILURE: Could not write to {output}"))?;
        Ok(exit_codes::WRITE_FAILED)
    }
}
