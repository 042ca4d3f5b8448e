//! Message-write validation harness.
//!
//! One shared primitive persists a single message to a file; three front ends
//! (CLI, interactive, self-test) prove it end to end. The crate keeps a strict
//! split between pure logic and side effects:
//!
//! - **[`core`]**: Argument resolution and the interactive state machine.
//!   No I/O, fully testable in isolation.
//! - **[`io`]**: The write primitive, console status lines, and the
//!   interactive session loop.
//!
//! [`settings`] holds each front end's defaults; [`exit_codes`] the stable
//! process exit codes.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
