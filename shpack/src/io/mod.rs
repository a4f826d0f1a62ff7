//! I/O helpers for compiler commands.

pub mod config;
pub mod scratch;
pub mod source;
pub mod validator;
