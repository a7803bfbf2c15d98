//! `binfs generate`: embed a directory as a Rust loader module.

use crate::cli::{ExitCode, OutputFormat};
use crate::formatters::format_output;
use anyhow::{Context, Result};
use binfs_codegen::{CodegenError, Generator, GeneratorConfig, Snapshot, Visibility};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Output target meaning stdout.
pub const STDOUT: &str = "-";

/// Arguments of the `generate` command.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Directory to embed
    pub dir: PathBuf,
    /// Output file, or [`STDOUT`]
    pub out: String,
    /// Loader function name
    pub fn_name: String,
    /// Path of the runtime crate in generated code
    pub crate_path: String,
    /// Emit a private loader instead of `pub fn`
    pub private: bool,
}

impl GenerateOptions {
    /// Maps the command-line arguments onto a generator configuration.
    #[must_use]
    pub fn config(&self) -> GeneratorConfig {
        let visibility = if self.private {
            Visibility::Private
        } else {
            Visibility::Public
        };
        GeneratorConfig::default()
            .with_fn_name(&self.fn_name)
            .with_crate_path(&self.crate_path)
            .with_visibility(visibility)
    }
}

/// Summary printed after the module is written to a file.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateReport {
    /// Embedded directory
    pub source_dir: String,
    /// File the module was written to
    pub output: String,
    /// Loader function name
    pub fn_name: String,
    /// Number of embedded entries
    pub entries: usize,
    /// Uncompressed content size
    pub content_bytes: u64,
    /// Size of the generated source
    pub source_bytes: usize,
}

/// Captures `dir` and renders the loader module.
///
/// # Errors
///
/// Returns the underlying [`CodegenError`] if the directory cannot be
/// captured or the module cannot be rendered.
pub fn render(
    dir: &Path,
    config: GeneratorConfig,
) -> std::result::Result<(Snapshot, String), CodegenError> {
    let generator = Generator::new(config)?;
    let snapshot = Snapshot::capture(dir)?;
    let source = generator.generate(&snapshot)?;
    Ok((snapshot, source))
}

/// Runs the `generate` command.
///
/// Invalid names and a source path that is not a directory exit with
/// [`ExitCode::INVALID_INPUT`].
pub fn run(options: &GenerateOptions, output_format: OutputFormat) -> Result<ExitCode> {
    info!(dir = %options.dir.display(), out = %options.out, "generating loader module");

    let (snapshot, source) = match render(&options.dir, options.config()) {
        Ok(rendered) => rendered,
        Err(e @ (CodegenError::InvalidIdentifier { .. } | CodegenError::NotADirectory { .. })) => {
            eprintln!("{e}");
            return Ok(ExitCode::INVALID_INPUT);
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!("failed to generate from {}", options.dir.display())
            });
        }
    };

    if options.out == STDOUT {
        io::stdout()
            .write_all(source.as_bytes())
            .context("failed to write generated module to stdout")?;
        return Ok(ExitCode::SUCCESS);
    }

    fs::write(&options.out, &source)
        .with_context(|| format!("failed to write generated module to {}", options.out))?;

    let report = GenerateReport {
        source_dir: options.dir.display().to_string(),
        output: options.out.clone(),
        fn_name: options.fn_name.clone(),
        entries: snapshot.len(),
        content_bytes: snapshot.total_bytes(),
        source_bytes: source.len(),
    };
    info!(
        entries = report.entries,
        output = %report.output,
        "wrote loader module"
    );
    println!("{}", format_output(&report, output_format)?);

    Ok(ExitCode::SUCCESS)
}
