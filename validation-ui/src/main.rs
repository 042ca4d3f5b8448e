//! Interactive front end for the message-write harness.
//!
//! With `--timeout <n>` (n > 0) the message is written immediately and no
//! window is shown. Otherwise a terminal window lets the user edit the
//! message; the control or closing the window writes it. Either way the
//! process terminates right after the single write attempt.

mod window;

use std::io;

use tracing::debug;
use validation::core::args::resolve_settings;
use validation::exit_codes;
use validation::io::console::Console;
use validation::io::session::run_interactive;
use validation::logging;
use validation::settings::{INTERACTIVE_DEFAULTS, INTERACTIVE_FLAGS, process_tokens};

use crate::window::TerminalWindow;

fn main() {
    logging::init();

    let settings = resolve_settings(process_tokens(), &INTERACTIVE_DEFAULTS, INTERACTIVE_FLAGS);
    debug!(?settings, "resolved settings");

    let mut console = Console::stdout();
    let result = run_interactive(settings, &mut console, |field| {
        TerminalWindow::create(io::stdin().lock(), io::stdout(), field)
    });
    match result {
        Ok(outcome) => {
            debug!(succeeded = outcome.succeeded, "write attempted");
            if let Err(err) = console.line("INFO: Terminating process.") {
                debug!(error = %err, "console unavailable");
            }
            terminate()
        }
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

/// End the process immediately after the write attempt, whatever its outcome.
fn terminate() -> ! {
    std::process::exit(exit_codes::OK)
}
