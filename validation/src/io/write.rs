//! Message write primitive.
//!
//! Persists a single message to a file, replacing whatever was there before.
//! The primitive never returns an error: every failure is folded into a
//! [`WriteOutcome`] so front ends can report it and pick an exit code.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, instrument, warn};

pub use crate::core::request::WriteRequest;

/// Result of one write attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub succeeded: bool,
    /// Platform error chain when the write failed. Wording is not stable.
    pub diagnostic: Option<String>,
}

impl WriteOutcome {
    pub fn success() -> Self {
        Self {
            succeeded: true,
            diagnostic: None,
        }
    }

    pub fn failure(diagnostic: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            diagnostic: Some(diagnostic.into()),
        }
    }

    /// Convert into a `Result` for callers that propagate with `?`.
    pub fn into_result(self) -> Result<()> {
        if self.succeeded {
            return Ok(());
        }
        Err(anyhow!(
            "write failed: {}",
            self.diagnostic.as_deref().unwrap_or("unknown error")
        ))
    }
}

/// Write `request.message` plus one trailing newline to `request.path`.
pub fn write_request(request: &WriteRequest) -> WriteOutcome {
    write_message(&request.path, &request.message)
}

/// Overwrite `path` with `message` followed by exactly one `\n`.
///
/// The bytes are written as given. Existing content is truncated. The file
/// handle is dropped before this returns on every path.
#[instrument(skip_all, fields(path = %path.display(), bytes = message.as_ref().len() + 1))]
pub fn write_message(path: &Path, message: impl AsRef<[u8]>) -> WriteOutcome {
    match try_write(path, message.as_ref()) {
        Ok(()) => {
            debug!("message written");
            WriteOutcome::success()
        }
        Err(err) => {
            let diagnostic = format!("{err:#}");
            warn!(error = %diagnostic, "message write failed");
            WriteOutcome::failure(diagnostic)
        }
    }
}

fn try_write(path: &Path, message: &[u8]) -> Result<()> {
    if path.as_os_str().is_empty() {
        bail!("output path is empty");
    }
    let mut file = File::create(path).with_context(|| format!("open {}", path.display()))?;
    file.write_all(message)
        .and_then(|()| file.write_all(b"\n"))
        .with_context(|| format!("write {}", path.display()))?;
    file.flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}
