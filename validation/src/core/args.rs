//! Tolerant argument resolution shared by every front end.
//!
//! Tokens are scanned left to right. A recognized flag consumes exactly one
//! following token as its value, later occurrences overwrite earlier ones, and
//! anything else is skipped without complaint. Values are taken as raw OS
//! strings, so messages and paths pass through without re-encoding.

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use crate::core::request::WriteRequest;

/// Options a front end may recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Message,
    Output,
    Timeout,
}

impl Flag {
    pub fn name(self) -> &'static str {
        match self {
            Flag::Message => "--message",
            Flag::Output => "--output",
            Flag::Timeout => "--timeout",
        }
    }

    fn from_token(token: &OsStr, recognized: &[Flag]) -> Option<Flag> {
        recognized
            .iter()
            .copied()
            .find(|flag| OsStr::new(flag.name()) == token)
    }
}

/// Per front-end fallback values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Defaults {
    pub message: &'static str,
    pub output: &'static str,
    pub timeout_secs: u64,
}

/// The resolved `{message, output, timeout}` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Raw message bytes.
    pub message: Vec<u8>,
    pub output: PathBuf,
    pub timeout_secs: u64,
}

impl Settings {
    pub fn from_defaults(defaults: &Defaults) -> Self {
        Self {
            message: defaults.message.as_bytes().to_vec(),
            output: PathBuf::from(defaults.output),
            timeout_secs: defaults.timeout_secs,
        }
    }

    /// Request for writing the resolved message to the resolved output.
    pub fn request(&self) -> WriteRequest {
        self.request_with(&self.message)
    }

    /// Request for writing `message` to the resolved output.
    pub fn request_with(&self, message: &[u8]) -> WriteRequest {
        WriteRequest::new(self.output.clone(), message)
    }
}

/// Overlay `tokens` onto `defaults`, honoring only the flags in `recognized`.
///
/// Never fails. No validation of the output path happens here.
pub fn resolve_settings<I, S>(tokens: I, defaults: &Defaults, recognized: &[Flag]) -> Settings
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut settings = Settings::from_defaults(defaults);
    let mut tokens = tokens.into_iter().map(Into::into);
    while let Some(token) = tokens.next() {
        let Some(flag) = Flag::from_token(&token, recognized) else {
            continue;
        };
        // A trailing flag with nothing after it is ignored.
        let Some(value) = tokens.next() else {
            break;
        };
        match flag {
            Flag::Message => settings.message = value.into_encoded_bytes(),
            Flag::Output => settings.output = PathBuf::from(value),
            Flag::Timeout => settings.timeout_secs = parse_timeout(value.as_encoded_bytes()),
        }
    }
    settings
}

/// Best-effort integer parse in the spirit of C `atoi`.
///
/// Leading whitespace and one sign are accepted, then the longest run of
/// ASCII digits. No digits, a negative number, or overflow all yield 0.
pub fn parse_timeout(raw: &[u8]) -> u64 {
    let trimmed = raw.trim_ascii_start();
    let (negative, rest) = match trimmed.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some((b'+', rest)) => (false, rest),
        _ => (false, trimmed),
    };
    let digits = rest
        .iter()
        .take_while(|byte| byte.is_ascii_digit())
        .try_fold(0u64, |acc, byte| {
            acc.checked_mul(10)?.checked_add(u64::from(byte - b'0'))
        });
    match digits {
        Some(value) if !negative => value,
        _ => 0,
    }
}
