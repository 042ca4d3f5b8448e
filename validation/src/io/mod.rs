//! I/O helpers for the front ends.

pub mod console;
pub mod session;
pub mod write;
