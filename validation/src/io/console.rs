//! Human-readable status lines on standard output.
//!
//! This is product output, separate from `tracing` diagnostics (see
//! [`crate::logging`]). Every line is flushed immediately so the status
//! survives an abrupt process exit.

use std::fmt::Display;
use std::io::{self, Stdout, Write};

use anyhow::{Context, Result};

pub struct Console<W: Write> {
    out: W,
}

impl Console<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write one line and flush.
    pub fn line(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.out, "{text}").context("write console line")?;
        self.out.flush().context("flush console")
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
