//! Code generation from the validated AST.
//!
//! Each target is a pure function from definitions to source text:
//! - [`typescript`] - interfaces and union types
//! - [`go`] - structs with `encoding/json` tags
//! - [`between`] - Between source, re-parseable by the front-end

pub mod between;
pub mod go;
pub mod typescript;

use std::path::{Path, PathBuf};

use between_core::Compiled;
use thiserror::Error;

pub use go::GoOptions;

/// Target language, picked from the output file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    TypeScript,
    Go,
    Between,
}

impl OutputFormat {
    pub fn from_extension(ext: &str) -> Option<OutputFormat> {
        match ext {
            "ts" => Some(OutputFormat::TypeScript),
            "go" => Some(OutputFormat::Go),
            "bt" => Some(OutputFormat::Between),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<OutputFormat, CodegenError> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(OutputFormat::from_extension)
            .ok_or_else(|| CodegenError::UnsupportedOutput(path.to_path_buf()))
    }
}

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("unsupported output file {}: expected a .ts, .go or .bt extension", .0.display())]
    UnsupportedOutput(PathBuf),
}

/// Render a compiled document in the requested format.
pub fn generate(compiled: &Compiled, format: OutputFormat, go_options: &GoOptions) -> String {
    tracing::debug!(
        ?format,
        definitions = compiled.definitions.len(),
        "Generating output"
    );
    match format {
        OutputFormat::TypeScript => typescript::render(&compiled.definitions),
        OutputFormat::Go => go::render(&compiled.definitions, &compiled.used_primitives, go_options),
        OutputFormat::Between => between::render(&compiled.definitions),
    }
}

/// Quote `text` as a string literal. JSON escaping is valid in both
/// TypeScript and Go.
pub(crate) fn quote(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}
