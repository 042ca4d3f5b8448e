//! The data handed to the write primitive.

use std::path::PathBuf;

/// A single message destined for a single path.
///
/// The message is raw bytes and is written without any re-encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    pub path: PathBuf,
    pub message: Vec<u8>,
}

impl WriteRequest {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}
