//! Built-in defaults and recognized flags for each front end.
//!
//! There is no configuration file; these constants are the whole
//! configuration surface besides command-line flags.

use std::ffi::OsString;

use crate::core::args::{Defaults, Flag};

/// Defaults for `validation-cli`.
pub const CLI_DEFAULTS: Defaults = Defaults {
    message: "Hello World (CLI Default)",
    output: "validation_output.txt",
    timeout_secs: 0,
};

/// `validation-cli` accepts `--message` and `--output`.
pub const CLI_FLAGS: &[Flag] = &[Flag::Message, Flag::Output];

/// Defaults for `validation-ui`.
pub const INTERACTIVE_DEFAULTS: Defaults = Defaults {
    message: "Hello World (GUI Default)",
    output: "C:/validation_gui_output.txt",
    timeout_secs: 0,
};

/// `validation-ui` additionally accepts `--timeout`.
pub const INTERACTIVE_FLAGS: &[Flag] = &[Flag::Message, Flag::Output, Flag::Timeout];

/// Process arguments after the program name, exactly as the OS passed them.
pub fn process_tokens() -> Vec<OsString> {
    std::env::args_os().skip(1).collect()
}
