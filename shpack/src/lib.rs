//! Shell script bundler.
//!
//! Compiles a script that pulls in other scripts through import annotations
//! into one self-contained script with every referenced file inlined. The
//! crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (line classification, output
//!   markers, visited-set bookkeeping). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (source loading, path checks,
//!   scratch files, config).
//!
//! [`expand`] drives the recursive inclusion over a [`io::source::SourceLoader`],
//! and [`compile`] wires it to the filesystem for the CLI.

pub mod compile;
pub mod core;
pub mod exit_codes;
pub mod expand;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
