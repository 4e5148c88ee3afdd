//! Recursive-descent parser with panic-mode recovery.
//!
//! ```text
//! definitions := definition*
//! definition  := product | sum | sumstr
//! product     := 'prod' ID '{' field* '}'
//! sum         := 'sum'  ID '{' field* '}'
//! sumstr      := 'sumstr' ID '{' variant* '}'
//! field       := ID LITERAL? type ','
//!              | ID '?'? ','
//! type        := ID '?'? | '[]' '?'? type
//! variant     := ID LITERAL? ','
//! ```
//!
//! On a mismatch the parser records one error, then skips tokens until it
//! reaches one in the follow set of the failing production (see
//! [`recovery`]). The resulting tree is always returned, possibly partial,
//! with placeholder tokens marked `error` where something was missing.

pub mod recovery;

use crate::error::ParseError;
use crate::location::Location;
use crate::syntax::{
    Definition, Field, FieldFull, FieldShort, List, Product, Sum, SumStr, SumStrVariant, Type,
    TypeIdent,
};
use crate::token::{Token, TokenKind};

use recovery::*;

/// Result of parsing a token stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub definitions: Vec<Definition>,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse a token stream produced by [`crate::lexer::lex`].
///
/// The stream does not have to end in EOF; one is implied after the last
/// token.
pub fn parse(tokens: &[Token]) -> ParseResult {
    let mut parser = Parser::new(tokens);
    let definitions = parser.parse_definitions();

    tracing::debug!(
        definitions = definitions.len(),
        errors = parser.errors.len(),
        "parsed definitions"
    );

    ParseResult {
        definitions,
        errors: parser.errors,
    }
}

struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    eof: Token,
    errors: Vec<ParseError>,
    /// Set once recovery has run into the end of input; later failures are
    /// consequences of the same problem and stay silent.
    eof_reported: bool,
    /// Token index of the most recent report.
    last_error_pos: Option<usize>,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        let end = tokens
            .last()
            .map(|t| Location::empty_at(t.location.byte_end, t.location.end))
            .unwrap_or_default();
        Self {
            tokens,
            pos: 0,
            eof: Token::new(TokenKind::Eof, end),
            errors: Vec::new(),
            eof_reported: false,
            last_error_pos: None,
        }
    }

    // =========================================================================
    // TOKEN CURSOR
    // =========================================================================

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn peek_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn bump(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    /// Consume a token of `kind`, or report and resynchronise on `follow`.
    /// Recovery that lands on `kind` takes it; otherwise a placeholder is
    /// returned.
    fn expect(&mut self, kind: TokenKind, follow: &[TokenKind]) -> Token {
        if self.peek_kind() == kind {
            return self.bump();
        }
        let at = self.current().location.start_only();
        self.error_until(&[kind], follow);
        if self.peek_kind() == kind {
            return self.bump();
        }
        Token::missing(kind, at)
    }

    /// Consume the current token if it is `kind`.
    fn accept(&mut self, kind: TokenKind) -> Option<Token> {
        (self.peek_kind() == kind).then(|| self.bump())
    }

    // =========================================================================
    // RECOVERY
    // =========================================================================

    fn report(&mut self, expected: &[TokenKind]) {
        let actual = self.current().clone();
        tracing::trace!(%actual, "syntax error");
        self.push_error(ParseError::new(expected, actual));
    }

    /// Record `error` unless this position (or the end of input) already has one.
    fn push_error(&mut self, error: ParseError) {
        if self.eof_reported || self.last_error_pos == Some(self.pos) {
            return;
        }
        self.last_error_pos = Some(self.pos);
        self.errors.push(error);
    }

    /// Discard tokens until one in `follow` (or EOF) is current.
    fn skip_until(&mut self, follow: &[TokenKind]) {
        loop {
            let kind = self.peek_kind();
            if follow.contains(&kind) {
                return;
            }
            if kind == TokenKind::Eof {
                self.eof_reported = true;
                return;
            }
            self.pos += 1;
        }
    }

    /// Report that one of `expected` was wanted here, then discard tokens
    /// until one in `follow` (or EOF) is current.
    fn error_until(&mut self, expected: &[TokenKind], follow: &[TokenKind]) {
        self.report(expected);
        self.skip_until(follow);
    }

    // =========================================================================
    // DEFINITIONS
    // =========================================================================

    fn parse_definitions(&mut self) -> Vec<Definition> {
        let mut definitions = Vec::new();
        loop {
            match self.peek_kind() {
                TokenKind::Eof => return definitions,
                TokenKind::Prod => definitions.push(Definition::Product(self.parse_product())),
                TokenKind::Sum => definitions.push(Definition::Sum(self.parse_sum())),
                TokenKind::SumStr => definitions.push(Definition::SumStr(self.parse_sum_str())),
                _ => self.error_until(DEFINITION_FIRST, DEFINITION_FOLLOW),
            }
        }
    }

    /// `keyword ID '{'`, shared by all three definition forms.
    fn parse_header(&mut self) -> (Token, Token, Token) {
        let keyword = self.bump();
        let id = self.expect(TokenKind::Ident, KEYWORD_FOLLOW);
        let left_brace = self.expect(TokenKind::LBrace, BODY_FOLLOW);
        (keyword, id, left_brace)
    }

    fn parse_product(&mut self) -> Product {
        let (keyword, id, left_brace) = self.parse_header();
        let fields = self.parse_fields();
        let right_brace = self.expect(TokenKind::RBrace, DEFINITION_FOLLOW);
        Product {
            keyword,
            id,
            left_brace,
            fields,
            right_brace,
        }
    }

    fn parse_sum(&mut self) -> Sum {
        let (keyword, id, left_brace) = self.parse_header();
        let variants = self.parse_fields();
        let right_brace = self.expect(TokenKind::RBrace, DEFINITION_FOLLOW);
        Sum {
            keyword,
            id,
            left_brace,
            variants,
            right_brace,
        }
    }

    fn parse_sum_str(&mut self) -> SumStr {
        let (keyword, id, left_brace) = self.parse_header();
        let mut variants = Vec::new();
        loop {
            match self.peek_kind() {
                TokenKind::Ident => variants.push(self.parse_variant()),
                kind if closes_body(kind) => break,
                _ => self.error_until(MEMBER_OR_CLOSE, MEMBER_FOLLOW),
            }
        }
        let right_brace = self.expect(TokenKind::RBrace, DEFINITION_FOLLOW);
        SumStr {
            keyword,
            id,
            left_brace,
            variants,
            right_brace,
        }
    }

    // =========================================================================
    // MEMBERS
    // =========================================================================

    fn parse_fields(&mut self) -> Vec<Field> {
        let mut fields = Vec::new();
        loop {
            match self.peek_kind() {
                TokenKind::Ident => fields.push(self.parse_field()),
                kind if closes_body(kind) => return fields,
                _ => self.error_until(MEMBER_OR_CLOSE, MEMBER_FOLLOW),
            }
        }
    }

    fn parse_field(&mut self) -> Field {
        let id = self.bump();
        match self.peek_kind() {
            TokenKind::Ident | TokenKind::List | TokenKind::Literal => {
                let json_name = self.accept(TokenKind::Literal);
                let ty = self.parse_type();
                let separator = self.expect(TokenKind::Comma, MEMBER_FOLLOW);
                Field::Full(FieldFull {
                    id,
                    json_name,
                    ty,
                    separator,
                })
            }
            TokenKind::Question | TokenKind::Comma => {
                let nullable = self.accept(TokenKind::Question);
                let separator = self.expect(TokenKind::Comma, MEMBER_FOLLOW);
                Field::Short(FieldShort {
                    id,
                    nullable,
                    separator,
                })
            }
            _ => {
                let at = self.current().location.start_only();
                self.error_until(FIELD_TAIL_FIRST, MEMBER_FOLLOW);
                Field::Full(FieldFull {
                    id,
                    json_name: None,
                    ty: Type::Ident(TypeIdent {
                        id: Token::missing(TokenKind::Ident, at),
                        nullable: None,
                    }),
                    separator: Token::missing(TokenKind::Comma, at),
                })
            }
        }
    }

    fn parse_variant(&mut self) -> SumStrVariant {
        let id = self.bump();
        let json_name = self.accept(TokenKind::Literal);
        if json_name.is_none() && !VARIANT_TAIL_FIRST.contains(&self.peek_kind()) {
            let at = self.current().location.start_only();
            self.error_until(VARIANT_TAIL_FIRST, MEMBER_FOLLOW);
            return SumStrVariant {
                id,
                json_name,
                separator: Token::missing(TokenKind::Comma, at),
            };
        }
        let separator = self.expect(TokenKind::Comma, MEMBER_FOLLOW);
        SumStrVariant {
            id,
            json_name,
            separator,
        }
    }

    // =========================================================================
    // TYPES
    // =========================================================================

    /// Parse `'[]' '?'? type | ID '?'?`.
    ///
    /// List prefixes are collected in a loop and folded afterwards. The
    /// finished tree is still walked recursively downstream, so nesting past
    /// [`MAX_TYPE_DEPTH`] is a syntax error and the rest of the type is skipped.
    fn parse_type(&mut self) -> Type {
        let mut lists = Vec::new();
        while self.peek_kind() == TokenKind::List {
            if lists.len() == MAX_TYPE_DEPTH {
                let location = self.current().location;
                self.push_error(ParseError::NestingTooDeep {
                    limit: MAX_TYPE_DEPTH,
                    location,
                });
                self.skip_until(TYPE_FOLLOW);
                let element = Type::Ident(TypeIdent {
                    id: Token::missing(TokenKind::Ident, location.start_only()),
                    nullable: None,
                });
                return fold_lists(lists, element);
            }
            let brackets = self.bump();
            let nullable = self.accept(TokenKind::Question);
            lists.push((brackets, nullable));
        }

        let element = match self.peek_kind() {
            TokenKind::Ident => {
                let id = self.bump();
                let nullable = self.accept(TokenKind::Question);
                Type::Ident(TypeIdent { id, nullable })
            }
            _ => {
                let at = self.current().location.start_only();
                self.error_until(TYPE_FIRST, TYPE_FOLLOW);
                Type::Ident(TypeIdent {
                    id: Token::missing(TokenKind::Ident, at),
                    nullable: None,
                })
            }
        };
        fold_lists(lists, element)
    }
}

/// Wrap `element` in the collected `[]` prefixes, innermost last.
fn fold_lists(lists: Vec<(Token, Option<Token>)>, element: Type) -> Type {
    lists
        .into_iter()
        .rev()
        .fold(element, |ty, (brackets, nullable)| {
            Type::List(List {
                brackets,
                nullable,
                element: Box::new(ty),
            })
        })
}
