//! binfs command-line driver.
//!
//! Embeds a directory into Rust source and inspects directories through the
//! same in-memory filesystem the generated code builds.
//!
//! # Examples
//!
//! ```bash
//! # Emit src/assets.rs exposing `pub fn assets() -> binfs::Result<binfs::FileSystem>`
//! binfs generate --dir ./public --out src/assets.rs --fn-name assets
//!
//! # Page through a directory two entries at a time
//! binfs inspect --dir ./public /css --limit 2
//! ```

use anyhow::Result;
use binfs_cli::cli::{ExitCode, OutputFormat};
use binfs_cli::commands::{self, generate::GenerateOptions};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Embed directories as Rust source and serve them from memory.
#[derive(Parser, Debug)]
#[command(name = "binfs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    format: String,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a Rust module that rebuilds a directory in memory.
    Generate {
        /// Directory to embed
        #[arg(short, long, env = "BINFS_DIR", default_value = ".")]
        dir: PathBuf,

        /// Output file, `-` for stdout
        #[arg(short, long, env = "BINFS_OUT", default_value = "binfs.rs")]
        out: String,

        /// Name of the generated loader function
        #[arg(long, default_value = "load")]
        fn_name: String,

        /// Path of the binfs crate as seen from the generated module
        #[arg(long, default_value = "binfs")]
        crate_path: String,

        /// Emit `fn` instead of `pub fn`
        #[arg(long)]
        private: bool,
    },

    /// Load a directory into memory and show one entry.
    Inspect {
        /// Directory to load
        #[arg(short, long, env = "BINFS_DIR", default_value = ".")]
        dir: PathBuf,

        /// Path inside the loaded tree
        #[arg(default_value = "/")]
        path: String,

        /// List directories in batches of this size
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let output_format = cli
        .format
        .parse::<OutputFormat>()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let exit_code = execute_command(cli.command, output_format)?;

    std::process::exit(exit_code.as_i32());
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn execute_command(command: Commands, output_format: OutputFormat) -> Result<ExitCode> {
    match command {
        Commands::Generate {
            dir,
            out,
            fn_name,
            crate_path,
            private,
        } => {
            let options = GenerateOptions {
                dir,
                out,
                fn_name,
                crate_path,
                private,
            };
            commands::generate::run(&options, output_format)
        }
        Commands::Inspect { dir, path, limit } => {
            commands::inspect::run(&dir, &path, limit, output_format)
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd)
        }
    }
}
