//! Deterministic, pure logic shared by every front end.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data and return deterministic outputs suitable for tests.

pub mod args;
pub mod interactive;
pub mod request;
