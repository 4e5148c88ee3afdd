//! Document state tracking.

use between_core::{analyze, syntax, BetweenError};
use lsp_types::Diagnostic;

use crate::handlers::diagnostics::diagnostics_for;

/// State of an analyzed document. Rebuilt from scratch on every change.
#[derive(Debug)]
pub struct DocumentState {
    /// Full document text
    pub text: String,
    /// Syntax tree, possibly partial
    pub syntax: Vec<syntax::Definition>,
    /// Every error found, in pipeline order
    pub errors: Vec<BetweenError>,
    /// `errors` projected for publishing
    pub diagnostics: Vec<Diagnostic>,
}

impl DocumentState {
    /// Run lex → parse → translate over `text`.
    pub fn analyze(text: String) -> Self {
        let analysis = analyze(&text);
        let diagnostics = diagnostics_for(&analysis.errors);
        tracing::debug!(
            definitions = analysis.syntax.len(),
            errors = analysis.errors.len(),
            "Analyzed document"
        );
        Self {
            text,
            syntax: analysis.syntax,
            errors: analysis.errors,
            diagnostics,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
