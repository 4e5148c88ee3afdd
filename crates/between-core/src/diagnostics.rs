//! Protocol-agnostic diagnostics.
//!
//! Every error kind flattens into one [`Diagnostic`] shape that the language
//! server and the CLI both render. Errors without a source location cannot be
//! placed in a document and are dropped by [`Diagnostic::from_error`].

use serde::{Deserialize, Serialize};

use crate::error::BetweenError;
use crate::location::Location;

/// A located error message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable code, `B1xx` lexical, `B2xx` syntactic, `B3xx` semantic.
    pub code: String,
    pub message: String,
    pub location: Location,
}

impl Diagnostic {
    pub fn error(code: impl Into<String>, message: impl Into<String>, location: Location) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            location,
        }
    }

    /// Project an error, or `None` if it has no place in the source.
    pub fn from_error(error: &BetweenError) -> Option<Self> {
        let location = error.location()?;
        let code = error.code()?;
        Some(Self::error(code, error.to_string(), location))
    }
}

/// Project a list of errors, preserving order.
pub fn project(errors: &[BetweenError]) -> Vec<Diagnostic> {
    errors.iter().filter_map(Diagnostic::from_error).collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LexError;
    use crate::location::Point;

    #[test]
    fn test_from_located_error() {
        let location = Location::new(3, 4, Point::new(0, 3), Point::new(0, 4));
        let error = BetweenError::from(LexError::UnexpectedChar { ch: '#', location });
        let diag = Diagnostic::from_error(&error).unwrap();
        assert_eq!(diag.code, "B101");
        assert_eq!(diag.message, "unexpected character '#'");
        assert_eq!(diag.location, location);
    }

    #[test]
    fn test_unlocated_errors_are_dropped() {
        let errors = vec![
            BetweenError::from(std::io::Error::new(std::io::ErrorKind::Other, "boom")),
            BetweenError::from(LexError::UnterminatedLiteral {
                location: Location::default(),
            }),
        ];
        let diags = project(&errors);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, "B104");
    }
}
