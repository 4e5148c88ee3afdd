//! between-core: lexer, parser and type resolver for the Between IDL
//!
//! This crate contains the pure language logic with NO I/O:
//! - Position-tracking lexer
//! - Recursive-descent parser with panic-mode error recovery
//! - Syntax tree (token-preserving) and validated AST
//! - Two-phase symbol table and translator
//! - Error taxonomy and protocol-agnostic diagnostics
//!
//! The language server lives in `between-lsp`; code generators and the CLI
//! live in the `between` package.

pub mod ast;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod location;
pub mod parser;
pub mod pipeline;
pub mod syntax;
pub mod token;
pub mod translate;

// Re-export commonly used types
pub use ast::Primitive;
pub use diagnostics::Diagnostic;
pub use error::{BetweenError, LexError, ParseError, SemanticError};
pub use lexer::{lex, LexResult};
pub use location::{Location, Point};
pub use parser::{parse, ParseResult};
pub use pipeline::{analyze, compile, Analysis, Compiled};
pub use token::{Token, TokenKind};
pub use translate::{translate, Translation};
