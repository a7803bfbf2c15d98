//! Shell completion generation command.
//!
//! Generates completion scripts for bash, zsh, fish, elvish and `PowerShell`.

use crate::cli::ExitCode;
use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use std::io::{self, Write};
use tracing::info;

/// Writes the completion script for `shell` to `out`.
pub fn write_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, out);
}

/// Prints the completion script for `shell` to stdout.
///
/// # Examples
///
/// ```no_run
/// use binfs_cli::commands::completions;
/// use clap::Command;
/// use clap_complete::Shell;
///
/// let mut cmd = Command::new("binfs");
/// assert!(completions::run(Shell::Bash, &mut cmd).is_ok());
/// ```
pub fn run(shell: Shell, cmd: &mut Command) -> Result<ExitCode> {
    info!(%shell, "generating completions");
    write_completions(shell, cmd, &mut io::stdout());
    Ok(ExitCode::SUCCESS)
}
