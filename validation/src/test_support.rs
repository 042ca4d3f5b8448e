//! Test-only helpers for driving sessions and scratch output paths.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::core::interactive::Event;
use crate::io::session::EventSource;

/// Event source that replays a fixed script, then closes.
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    events: VecDeque<Event>,
    /// Field bytes reported back after each edit, in order.
    pub redraws: Vec<Vec<u8>>,
}

impl ScriptedEvents {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events: events.into(),
            redraws: Vec::new(),
        }
    }
}

impl EventSource for ScriptedEvents {
    fn next_event(&mut self) -> Result<Event> {
        Ok(self.events.pop_front().unwrap_or(Event::Close))
    }

    fn field_changed(&mut self, text: &[u8]) -> Result<()> {
        self.redraws.push(text.to_vec());
        Ok(())
    }
}

/// Temporary directory with helpers for output paths.
pub struct ScratchDir {
    temp: TempDir,
}

impl ScratchDir {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create scratch dir")?;
        Ok(Self { temp })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Path to `name` inside the scratch dir (not created).
    pub fn file(&self, name: &str) -> PathBuf {
        self.temp.path().join(name)
    }

    /// Path whose parent directory does not exist, so writes must fail.
    pub fn unwritable(&self, name: &str) -> PathBuf {
        self.temp.path().join("does-not-exist").join(name)
    }

    /// Read `name` back as UTF-8.
    pub fn read(&self, name: &str) -> Result<String> {
        let path = self.file(name);
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))
    }

    /// Read `name` back as raw bytes.
    pub fn read_bytes(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.file(name);
        fs::read(&path).with_context(|| format!("read {}", path.display()))
    }
}
