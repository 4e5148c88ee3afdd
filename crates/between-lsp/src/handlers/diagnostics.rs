//! Diagnostics projection for the Between Language Server.
//!
//! Lexical, syntactic and semantic errors all become LSP diagnostics at the
//! span of the offending token. Errors with no source location are dropped.

use between_core::diagnostics as core;
use between_core::{BetweenError, Location};
use lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range};

pub const SOURCE: &str = "between-lsp";

/// Convert a source location into an LSP range.
pub fn range_from_location(location: Location) -> Range {
    Range {
        start: Position {
            line: location.start.row,
            character: location.start.col,
        },
        end: Position {
            line: location.end.row,
            character: location.end.col,
        },
    }
}

pub fn to_lsp(diagnostic: &core::Diagnostic) -> Diagnostic {
    Diagnostic {
        range: range_from_location(diagnostic.location),
        severity: Some(DiagnosticSeverity::ERROR),
        code: Some(NumberOrString::String(diagnostic.code.clone())),
        source: Some(SOURCE.to_string()),
        message: diagnostic.message.clone(),
        ..Default::default()
    }
}

/// Diagnostics for a list of errors, in the same order.
pub fn diagnostics_for(errors: &[BetweenError]) -> Vec<Diagnostic> {
    core::project(errors).iter().map(to_lsp).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use between_core::analyze;

    #[test]
    fn test_semantic_error_range() {
        let analysis = analyze("prod User {\n  friend Friend,\n}");
        let diags = diagnostics_for(&analysis.errors);
        assert_eq!(diags.len(), 1);
        let diag = &diags[0];
        assert_eq!(diag.message, "Unknown type Friend");
        assert_eq!(diag.severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(diag.code, Some(NumberOrString::String("B306".to_string())));
        assert_eq!(diag.source.as_deref(), Some(SOURCE));
        assert_eq!(
            diag.range,
            Range {
                start: Position { line: 1, character: 9 },
                end: Position { line: 1, character: 15 },
            }
        );
    }

    #[test]
    fn test_lex_and_parse_errors_are_both_reported() {
        let analysis = analyze("prod # {");
        let diags = diagnostics_for(&analysis.errors);
        let messages: Vec<_> = diags.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["unexpected character '#'", "expected identifier, got `{`", "expected `}`, got end of file"]
        );
    }

    #[test]
    fn test_clean_document_has_no_diagnostics() {
        let analysis = analyze("sumstr Color { Red, Green, }");
        assert!(diagnostics_for(&analysis.errors).is_empty());
    }
}
