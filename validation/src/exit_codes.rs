//! Stable exit codes for the front-end binaries.

/// The write (or self-test) succeeded.
pub const OK: i32 = 0;
/// The write primitive reported a failure.
pub const WRITE_FAILED: i32 = 1;
/// The front end could not run at all (window creation, console I/O, bad
/// self-test invocation).
pub const INVALID: i32 = 1;
