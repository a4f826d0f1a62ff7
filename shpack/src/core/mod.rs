//! Deterministic, pure logic shared by the compiler.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! lines and paths and return deterministic outputs suitable for tests.

pub mod classifier;
pub mod markers;
pub mod visited;
