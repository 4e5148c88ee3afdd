//! between: code generation for the Between IDL
//!
//! The language front-end (lexer, parser, translator) lives in
//! `between-core`; this package turns a compiled document into TypeScript,
//! Go or Between source and provides the `between` command-line tool.

pub mod codegen;

pub use between_core::{analyze, compile, Analysis, BetweenError, Compiled};
pub use codegen::{generate, CodegenError, GoOptions, OutputFormat};
