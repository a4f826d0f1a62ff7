//! Stable exit codes for the `shpack` CLI.

/// Compile succeeded (or `--help`/`--version` was printed).
pub const OK: i32 = 0;
/// Invalid arguments, destination collision, or any other failure.
pub const INVALID: i32 = 1;
/// Path does not exist.
pub const NOT_FOUND: i32 = 10;
/// Path exists but is not readable.
pub const NOT_READABLE: i32 = 11;
/// Path is not a regular file, or not a directory when one was required.
pub const WRONG_KIND: i32 = 12;
/// Path is an empty file.
pub const EMPTY: i32 = 13;
/// Path is not writable.
pub const NOT_WRITABLE: i32 = 14;
/// Path is not executable.
pub const NOT_EXECUTABLE: i32 = 15;
