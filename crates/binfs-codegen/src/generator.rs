//! Rust source generation from a [`Snapshot`].
//!
//! The emitted module holds one function that replays every captured entry
//! into a [`binfs::FileSystemBuilder`] and returns the built filesystem:
//!
//! ```text
//! pub fn load() -> binfs::Result<binfs::FileSystem> {
//!     let mut builder = binfs::FileSystemBuilder::new();
//!     builder.add(binfs::EncodedEntry { path: "/", name: ".", .. });
//!     ...
//!     builder.build()
//! }
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use binfs_codegen::{Generator, GeneratorConfig, Snapshot};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let snapshot = Snapshot::capture("./public")?;
//! let generator = Generator::new(GeneratorConfig::default().with_fn_name("assets"))?;
//! std::fs::write("src/assets.rs", generator.generate(&snapshot)?)?;
//! # Ok(())
//! # }
//! ```

use crate::error::{CodegenError, Result};
use crate::snapshot::Snapshot;
use crate::template_engine::{MODULE_TEMPLATE, TemplateEngine};
use binfs::OwnedEncodedEntry;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// Visibility of the generated loader function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// `pub fn`
    #[default]
    Public,
    /// `pub(crate) fn`
    Crate,
    /// `fn`
    Private,
}

impl Visibility {
    const fn prefix(self) -> &'static str {
        match self {
            Self::Public => "pub ",
            Self::Crate => "pub(crate) ",
            Self::Private => "",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Public => "pub",
            Self::Crate => "pub(crate)",
            Self::Private => "private",
        })
    }
}

/// Settings for the generated module.
///
/// # Examples
///
/// ```
/// use binfs_codegen::{GeneratorConfig, Visibility};
///
/// let config = GeneratorConfig::default()
///     .with_fn_name("assets")
///     .with_visibility(Visibility::Crate);
/// assert_eq!(config.fn_name(), "assets");
/// assert_eq!(config.crate_path(), "binfs");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    fn_name: String,
    crate_path: String,
    visibility: Visibility,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            fn_name: "load".to_string(),
            crate_path: "binfs".to_string(),
            visibility: Visibility::default(),
        }
    }
}

impl GeneratorConfig {
    /// Sets the loader function name.
    #[must_use]
    pub fn with_fn_name(mut self, name: impl Into<String>) -> Self {
        self.fn_name = name.into();
        self
    }

    /// Sets the path through which generated code reaches the runtime
    /// crate, e.g. `::binfs` or `crate::vendored::binfs`.
    #[must_use]
    pub fn with_crate_path(mut self, path: impl Into<String>) -> Self {
        self.crate_path = path.into();
        self
    }

    /// Sets the loader function's visibility.
    #[must_use]
    pub const fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Loader function name.
    #[must_use]
    pub fn fn_name(&self) -> &str {
        &self.fn_name
    }

    /// Runtime crate path.
    #[must_use]
    pub fn crate_path(&self) -> &str {
        &self.crate_path
    }

    /// Loader visibility.
    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Checks that the function name is an identifier and the crate path
    /// is a Rust path.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::InvalidIdentifier`] naming the bad value.
    pub fn validate(&self) -> Result<()> {
        syn::parse_str::<syn::Ident>(&self.fn_name).map_err(|e| {
            CodegenError::InvalidIdentifier {
                kind: "function name",
                value: self.fn_name.clone(),
                reason: e.to_string(),
            }
        })?;
        syn::parse_str::<syn::Path>(&self.crate_path).map_err(|e| {
            CodegenError::InvalidIdentifier {
                kind: "crate path",
                value: self.crate_path.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ModuleContext<'a> {
    source_dir: String,
    entry_count: usize,
    total_bytes: u64,
    visibility: &'static str,
    fn_name: &'a str,
    crate_path: &'a str,
    entries: Vec<RecordContext>,
}

/// One record with every string field already a Rust literal.
#[derive(Debug, Serialize)]
struct RecordContext {
    path: String,
    name: String,
    size: u64,
    mode: String,
    mod_time: String,
    is_dir: bool,
    content: String,
}

impl From<&OwnedEncodedEntry> for RecordContext {
    fn from(record: &OwnedEncodedEntry) -> Self {
        Self {
            path: string_literal(&record.path),
            name: string_literal(&record.name),
            size: record.size,
            mode: format!("0o{:o}", record.mode),
            mod_time: string_literal(&record.mod_time),
            is_dir: record.is_dir,
            content: string_literal(&record.content),
        }
    }
}

/// Quotes `value` as a Rust string literal.
fn string_literal(value: &str) -> String {
    format!("{value:?}")
}

/// Renders loader modules.
#[derive(Debug)]
pub struct Generator<'a> {
    engine: TemplateEngine<'a>,
    config: GeneratorConfig,
}

impl Generator<'_> {
    /// Creates a generator after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the built-in
    /// template fails to register.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let engine = TemplateEngine::new()?;
        Ok(Self { engine, config })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Renders the loader module for `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry cannot be encoded, rendering fails, or
    /// the result does not parse as Rust.
    pub fn generate(&self, snapshot: &Snapshot) -> Result<String> {
        let records = snapshot.encode()?;
        let source_dir = snapshot.root().display().to_string();
        self.generate_records(&source_dir, &records)
    }

    /// Renders the loader module for pre-encoded records.
    ///
    /// `source_dir` only appears in the generated header comment.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the result does not parse as
    /// Rust.
    pub fn generate_records(
        &self,
        source_dir: &str,
        records: &[OwnedEncodedEntry],
    ) -> Result<String> {
        let context = ModuleContext {
            source_dir: source_dir.escape_debug().to_string(),
            entry_count: records.len(),
            total_bytes: records.iter().filter(|r| !r.is_dir).map(|r| r.size).sum(),
            visibility: self.config.visibility.prefix(),
            fn_name: &self.config.fn_name,
            crate_path: &self.config.crate_path,
            entries: records.iter().map(RecordContext::from).collect(),
        };

        let source = self.engine.render(MODULE_TEMPLATE, &context)?;
        debug!(bytes = source.len(), "rendered loader module");

        syn::parse_file(&source).map_err(|e| CodegenError::InvalidOutput {
            message: e.to_string(),
        })?;

        info!(
            entries = context.entry_count,
            fn_name = %self.config.fn_name,
            "generated loader module"
        );
        Ok(source)
    }
}
