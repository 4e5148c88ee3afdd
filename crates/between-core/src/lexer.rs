//! Position-tracking lexer.
//!
//! Scans the source one code point at a time, tracking the byte offset and
//! the zero-based row/column. A newline bumps the row and resets the column.
//! Errors are collected and scanning continues, so one bad character never
//! hides the rest of the file. A single EOF token always terminates the
//! stream.

use crate::error::LexError;
use crate::location::{Location, Point};
use crate::token::{Token, TokenKind};

/// Result of lexing a source file.
#[derive(Debug, Clone, PartialEq)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

/// Tokenize `source`.
pub fn lex(source: &str) -> LexResult {
    Lexer::new(source).tokenize()
}

/// The Between lexer.
pub struct Lexer<'src> {
    source: &'src str,
    pos: usize,
    point: Point,
    start_pos: usize,
    start_point: Point,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            point: Point::default(),
            start_pos: 0,
            start_point: Point::default(),
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source, returning tokens and errors.
    pub fn tokenize(mut self) -> LexResult {
        loop {
            self.mark_start();
            let Some(ch) = self.advance() else {
                break;
            };

            match ch {
                ' ' | '\t' | '\r' | '\n' => {}
                ',' => self.emit(TokenKind::Comma),
                '{' => self.emit(TokenKind::LBrace),
                '}' => self.emit(TokenKind::RBrace),
                '?' => self.emit(TokenKind::Question),
                '[' => self.lex_list(),
                '"' => self.lex_literal(),
                c if c.is_ascii_alphabetic() => self.lex_word(),
                other => {
                    let location = self.current_location();
                    self.errors.push(LexError::UnexpectedChar { ch: other, location });
                }
            }
        }

        self.mark_start();
        self.emit(TokenKind::Eof);

        tracing::trace!(
            tokens = self.tokens.len(),
            errors = self.errors.len(),
            "lexed source"
        );

        LexResult {
            tokens: self.tokens,
            errors: self.errors,
        }
    }

    // === Character navigation ===

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        self.point = next_point(self.point, ch);
        Some(ch)
    }

    fn mark_start(&mut self) {
        self.start_pos = self.pos;
        self.start_point = self.point;
    }

    fn current_location(&self) -> Location {
        Location::new(self.start_pos, self.pos, self.start_point, self.point)
    }

    /// Location of the next, not yet consumed, character.
    fn peek_location(&self, ch: char) -> Location {
        Location::new(
            self.pos,
            self.pos + ch.len_utf8(),
            self.point,
            next_point(self.point, ch),
        )
    }

    // === Token production ===

    fn emit(&mut self, kind: TokenKind) {
        let location = self.current_location();
        self.tokens.push(Token::new(kind, location));
    }

    fn emit_with_value(&mut self, kind: TokenKind, value: &str) {
        let location = self.current_location();
        self.tokens.push(Token::with_value(kind, value, location));
    }

    /// `[` must be immediately followed by `]`. The offending character is
    /// left in place so it is scanned as the start of the next token.
    fn lex_list(&mut self) {
        match self.peek() {
            Some(']') => {
                self.advance();
                self.emit(TokenKind::List);
            }
            Some(found) => {
                let location = self.peek_location(found);
                self.errors.push(LexError::MalformedList { found, location });
            }
            None => {
                let location = Location::empty_at(self.pos, self.point);
                self.errors.push(LexError::UnclosedList { location });
            }
        }
    }

    fn lex_literal(&mut self) {
        let content_start = self.pos;
        while let Some(ch) = self.peek() {
            if ch == '"' {
                break;
            }
            self.advance();
        }
        let content_end = self.pos;

        if self.advance().is_none() {
            let location = self.current_location();
            self.errors.push(LexError::UnterminatedLiteral { location });
        }

        let value = &self.source[content_start..content_end];
        self.emit_with_value(TokenKind::Literal, value);
    }

    fn lex_word(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric()) {
            self.advance();
        }
        let text = &self.source[self.start_pos..self.pos];
        match TokenKind::keyword(text) {
            Some(kind) => self.emit(kind),
            None => self.emit_with_value(TokenKind::Ident, text),
        }
    }
}

fn next_point(point: Point, ch: char) -> Point {
    if ch == '\n' {
        Point::new(point.row + 1, 0)
    } else {
        Point::new(point.row, point.col + 1)
    }
}
