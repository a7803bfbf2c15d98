//! Build-time side of binfs.
//!
//! Captures a directory with [`Snapshot::capture`] and renders a Rust module
//! with [`Generator`] whose loader function rebuilds the tree as a
//! [`binfs::FileSystem`] at runtime.
//!
//! # Examples
//!
//! ```no_run
//! use binfs_codegen::{Generator, GeneratorConfig, Snapshot};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let snapshot = Snapshot::capture("assets")?;
//! let source = Generator::new(GeneratorConfig::default())?.generate(&snapshot)?;
//! std::fs::write("src/assets.rs", source)?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod error;
pub mod generator;
pub mod snapshot;
pub mod template_engine;

pub use error::{CodegenError, Result};
pub use generator::{Generator, GeneratorConfig, Visibility};
pub use snapshot::Snapshot;
pub use template_engine::TemplateEngine;
