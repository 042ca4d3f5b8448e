//! Line-oriented terminal window.
//!
//! Draws a title, an editable field, and a `[Write & Exit]` control, then
//! turns each input line into one event:
//!
//! - a non-empty line replaces the field text,
//! - a line holding only [`CLEAR`] empties the field,
//! - an empty line activates the control,
//! - end of input closes the window.
//!
//! Lines are read as raw bytes and reach the field without re-encoding.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::debug;
use validation::core::interactive::Event;
use validation::io::session::EventSource;

pub const TITLE: &str = "Validation GUI";

/// Line that sets the field to the empty message.
pub const CLEAR: &[u8] = b"\\";

pub struct TerminalWindow<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> TerminalWindow<R, W> {
    /// Draw the window with `field` pre-filled.
    pub fn create(input: R, out: W, field: &[u8]) -> Result<Self> {
        let mut window = Self { input, out };
        window.draw(field).context("draw window")?;
        Ok(window)
    }

    fn draw(&mut self, field: &[u8]) -> Result<()> {
        writeln!(self.out, "+--- {TITLE} ---")?;
        writeln!(
            self.out,
            "| Type a line to replace the message, press Enter on an empty line for [Write & Exit]."
        )?;
        writeln!(self.out, "| A line with a single \\ clears the message.")?;
        writeln!(self.out, "| End of input (Ctrl-D) closes the window.")?;
        self.draw_field(field)
    }

    fn draw_field(&mut self, field: &[u8]) -> Result<()> {
        writeln!(self.out, "| Message: [{}]", String::from_utf8_lossy(field))?;
        self.out.flush()?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> EventSource for TerminalWindow<R, W> {
    fn next_event(&mut self) -> Result<Event> {
        let mut line = Vec::new();
        let read = self
            .input
            .read_until(b'\n', &mut line)
            .context("read window input")?;
        if read == 0 {
            debug!("input closed");
            return Ok(Event::Close);
        }
        let text = line.strip_suffix(b"\n").unwrap_or(&line);
        let text = text.strip_suffix(b"\r").unwrap_or(text);
        if text.is_empty() {
            return Ok(Event::Trigger);
        }
        if text == CLEAR {
            return Ok(Event::Edit(Vec::new()));
        }
        Ok(Event::Edit(text.to_vec()))
    }

    fn field_changed(&mut self, text: &[u8]) -> Result<()> {
        self.draw_field(text).context("redraw field")
    }
}
