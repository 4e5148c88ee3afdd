//! Error taxonomy for the Between front-end.
//!
//! Every stage collects its errors instead of stopping at the first one:
//! - [`LexError`]: bad characters, unterminated literals, malformed `[]`
//! - [`ParseError`]: unexpected token (carrying the expected set) or list
//!   nesting past the depth limit
//! - [`SemanticError`]: duplicates, unknown types, nullable sum variants
//!
//! [`BetweenError`] is the umbrella type stored per document and surfaced as
//! diagnostics. All variants except `Io` carry a source [`Location`].

use thiserror::Error;

use crate::location::Location;
use crate::token::{Token, TokenKind};

// =============================================================================
// LEXICAL ERRORS
// =============================================================================

/// Recoverable scanning error; the lexer keeps going after recording it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unexpected character '{ch}'")]
    UnexpectedChar { ch: char, location: Location },

    #[error("unexpected character '{found}', expected ']'")]
    MalformedList { found: char, location: Location },

    #[error("unexpected end of file, expected ']'")]
    UnclosedList { location: Location },

    #[error("unterminated string literal")]
    UnterminatedLiteral { location: Location },
}

impl LexError {
    pub fn location(&self) -> Location {
        match self {
            LexError::UnexpectedChar { location, .. }
            | LexError::MalformedList { location, .. }
            | LexError::UnclosedList { location }
            | LexError::UnterminatedLiteral { location } => *location,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            LexError::UnexpectedChar { .. } => "B101",
            LexError::MalformedList { .. } => "B102",
            LexError::UnclosedList { .. } => "B103",
            LexError::UnterminatedLiteral { .. } => "B104",
        }
    }
}

// =============================================================================
// SYNTAX ERRORS
// =============================================================================

/// Syntax error; the parser resynchronises and keeps going after each one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A token did not match what the grammar allows at this point.
    #[error("expected {}, got {actual}", join_expected(.expected))]
    Unexpected {
        expected: Vec<TokenKind>,
        actual: Token,
    },

    /// More `[]` prefixes than the type tree may hold.
    #[error("list type nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize, location: Location },
}

impl ParseError {
    pub fn new(expected: &[TokenKind], actual: Token) -> Self {
        ParseError::Unexpected {
            expected: expected.to_vec(),
            actual,
        }
    }

    /// Token kinds that would have been accepted; empty for nesting errors.
    pub fn expected(&self) -> &[TokenKind] {
        match self {
            ParseError::Unexpected { expected, .. } => expected,
            ParseError::NestingTooDeep { .. } => &[],
        }
    }

    pub fn location(&self) -> Location {
        match self {
            ParseError::Unexpected { actual, .. } => actual.location,
            ParseError::NestingTooDeep { location, .. } => *location,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ParseError::Unexpected { actual, .. } if actual.kind == TokenKind::Eof => "B202",
            ParseError::Unexpected { .. } => "B201",
            ParseError::NestingTooDeep { .. } => "B203",
        }
    }
}

fn join_expected(expected: &[TokenKind]) -> String {
    expected
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(" or ")
}

// =============================================================================
// SEMANTIC ERRORS
// =============================================================================

/// Error found while resolving a syntactically valid document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SemanticError {
    #[error("Duplicated identifier: {name}")]
    DuplicateIdentifier { name: String, location: Location },

    #[error("Cannot redefine primitive type: {name}")]
    PrimitiveRedefinition { name: String, location: Location },

    #[error("Duplicated field: {name}")]
    DuplicateField { name: String, location: Location },

    /// A shorthand field whose derived (lower-cased) name collides.
    #[error("The name of this field derives to: {name}, and it is duplicated")]
    DuplicateDerivedField { name: String, location: Location },

    #[error("Duplicated sumstr variant: {name}")]
    DuplicateVariant { name: String, location: Location },

    #[error("Unknown type {name}")]
    UnknownType { name: String, location: Location },

    #[error("Sum variant {name} cannot be optional, sum variants cannot be optional")]
    NullableSumVariant { name: String, location: Location },
}

impl SemanticError {
    pub fn location(&self) -> Location {
        match self {
            SemanticError::DuplicateIdentifier { location, .. }
            | SemanticError::PrimitiveRedefinition { location, .. }
            | SemanticError::DuplicateField { location, .. }
            | SemanticError::DuplicateDerivedField { location, .. }
            | SemanticError::DuplicateVariant { location, .. }
            | SemanticError::UnknownType { location, .. }
            | SemanticError::NullableSumVariant { location, .. } => *location,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            SemanticError::DuplicateIdentifier { .. } => "B301",
            SemanticError::PrimitiveRedefinition { .. } => "B302",
            SemanticError::DuplicateField { .. } => "B303",
            SemanticError::DuplicateDerivedField { .. } => "B304",
            SemanticError::DuplicateVariant { .. } => "B305",
            SemanticError::UnknownType { .. } => "B306",
            SemanticError::NullableSumVariant { .. } => "B307",
        }
    }
}

// =============================================================================
// UMBRELLA
// =============================================================================

/// Any error produced while processing a Between document.
#[derive(Debug, Error)]
pub enum BetweenError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BetweenError {
    /// Source location, if the error is tied to one.
    pub fn location(&self) -> Option<Location> {
        match self {
            BetweenError::Lex(e) => Some(e.location()),
            BetweenError::Parse(e) => Some(e.location()),
            BetweenError::Semantic(e) => Some(e.location()),
            BetweenError::Io(_) => None,
        }
    }

    pub fn code(&self) -> Option<&'static str> {
        match self {
            BetweenError::Lex(e) => Some(e.code()),
            BetweenError::Parse(e) => Some(e.code()),
            BetweenError::Semantic(e) => Some(e.code()),
            BetweenError::Io(_) => None,
        }
    }

    pub fn is_semantic(&self) -> bool {
        matches!(self, BetweenError::Semantic(_))
    }
}
