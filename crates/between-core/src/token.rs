//! Token types produced by the lexer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::location::Location;

/// Every token kind in Between.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // === Keywords ===
    Prod,
    Sum,
    SumStr,

    // === Values ===
    Ident,
    Literal,

    // === Structure ===
    LBrace,
    RBrace,
    /// `[]`, always lexed as one token.
    List,
    Comma,
    Question,

    // === Meta ===
    Eof,
}

impl TokenKind {
    /// Look up a scanned identifier in the keyword table.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        match text {
            "prod" => Some(TokenKind::Prod),
            "sum" => Some(TokenKind::Sum),
            "sumstr" => Some(TokenKind::SumStr),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Prod => write!(f, "`prod`"),
            TokenKind::Sum => write!(f, "`sum`"),
            TokenKind::SumStr => write!(f, "`sumstr`"),
            TokenKind::Ident => write!(f, "identifier"),
            TokenKind::Literal => write!(f, "string literal"),
            TokenKind::LBrace => write!(f, "`{{`"),
            TokenKind::RBrace => write!(f, "`}}`"),
            TokenKind::List => write!(f, "`[]`"),
            TokenKind::Comma => write!(f, "`,`"),
            TokenKind::Question => write!(f, "`?`"),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

/// A single token.
///
/// Tokens fabricated by the parser to stand in for a missing one have
/// `error` set and a zero-width location at the point of failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Identifier name or literal contents (without quotes).
    pub value: Option<String>,
    pub location: Location,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl Token {
    pub fn new(kind: TokenKind, location: Location) -> Self {
        Self {
            kind,
            value: None,
            location,
            error: false,
        }
    }

    pub fn with_value(kind: TokenKind, value: impl Into<String>, location: Location) -> Self {
        Self {
            kind,
            value: Some(value.into()),
            location,
            error: false,
        }
    }

    /// Placeholder for a token the parser expected but did not find.
    pub fn missing(kind: TokenKind, location: Location) -> Self {
        Self {
            kind,
            value: None,
            location,
            error: true,
        }
    }

    /// The token's text value, empty for valueless tokens.
    pub fn text(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, &self.value) {
            (TokenKind::Ident, Some(v)) => write!(f, "identifier `{v}`"),
            (TokenKind::Literal, Some(v)) => write!(f, "string literal \"{v}\""),
            (kind, _) => kind.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_table() {
        assert_eq!(TokenKind::keyword("prod"), Some(TokenKind::Prod));
        assert_eq!(TokenKind::keyword("sum"), Some(TokenKind::Sum));
        assert_eq!(TokenKind::keyword("sumstr"), Some(TokenKind::SumStr));
        assert_eq!(TokenKind::keyword("Prod"), None);
        assert_eq!(TokenKind::keyword("strsum"), None);
    }

    #[test]
    fn test_token_display() {
        let loc = Location::default();
        assert_eq!(
            Token::with_value(TokenKind::Ident, "User", loc).to_string(),
            "identifier `User`"
        );
        assert_eq!(Token::new(TokenKind::LBrace, loc).to_string(), "`{`");
        assert_eq!(Token::new(TokenKind::Eof, loc).to_string(), "end of file");
    }
}
