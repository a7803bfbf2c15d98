//! binfs CLI library.
//!
//! Command implementations and output formatting behind the `binfs` binary,
//! exposed as a library so they can be tested without spawning a process.

pub mod cli;
pub mod commands;
pub mod formatters;
