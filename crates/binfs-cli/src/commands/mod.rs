//! Command implementations for the binfs CLI.
//!
//! Each module exposes a `run` entry point used by the binary, plus the
//! plain functions behind it so the work can be tested without a process.

pub mod completions;
pub mod generate;
pub mod inspect;
