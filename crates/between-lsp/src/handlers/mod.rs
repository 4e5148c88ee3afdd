//! LSP request handlers.

pub mod diagnostics;
pub mod semantic_tokens;
