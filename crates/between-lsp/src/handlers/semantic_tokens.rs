//! Semantic tokens from the syntax tree.
//!
//! A pre-order walk emits one token per significant source token, in
//! document order, delta-encoded against the previous one. The walk uses the
//! syntax tree rather than the validated AST, so highlighting keeps working
//! for documents with semantic errors or a partial parse.

use between_core::syntax::{Definition, Field, SumStrVariant, Type};
use between_core::{Location, Point, Token};
use lsp_types::{SemanticToken, SemanticTokenType, SemanticTokensLegend};

/// Token classes, in legend order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum TokenClass {
    Class = 0,
    Keyword = 1,
    Property = 2,
    String = 3,
    EnumMember = 4,
}

pub fn legend() -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: vec![
            SemanticTokenType::CLASS,
            SemanticTokenType::KEYWORD,
            SemanticTokenType::PROPERTY,
            SemanticTokenType::STRING,
            SemanticTokenType::ENUM_MEMBER,
        ],
        token_modifiers: vec![],
    }
}

/// Encode the tokens of a (possibly partial) syntax tree.
pub fn semantic_tokens(definitions: &[Definition]) -> Vec<SemanticToken> {
    let mut encoder = Encoder::default();
    for definition in definitions {
        encoder.definition(definition);
    }
    encoder.tokens
}

#[derive(Default)]
struct Encoder {
    last: Point,
    tokens: Vec<SemanticToken>,
}

impl Encoder {
    fn push(&mut self, token: &Token, class: TokenClass) {
        // Placeholders from error recovery have no source text.
        if token.error {
            return;
        }
        let start = token.location.start;
        if start < self.last {
            tracing::trace!(%token, "skipping out-of-order token");
            return;
        }
        let delta_line = start.row - self.last.row;
        let delta_start = if delta_line == 0 {
            start.col - self.last.col
        } else {
            start.col
        };
        self.tokens.push(SemanticToken {
            delta_line,
            delta_start,
            length: first_row_len(token),
            token_type: class as u32,
            token_modifiers_bitset: 0,
        });
        self.last = start;
    }

    fn definition(&mut self, definition: &Definition) {
        self.push(definition.keyword(), TokenClass::Keyword);
        self.push(definition.id(), TokenClass::Class);
        match definition {
            Definition::Product(p) => p.fields.iter().for_each(|f| self.field(f)),
            Definition::Sum(s) => s.variants.iter().for_each(|f| self.field(f)),
            Definition::SumStr(s) => s.variants.iter().for_each(|v| self.variant(v)),
        }
    }

    fn field(&mut self, field: &Field) {
        match field {
            Field::Full(full) => {
                self.push(&full.id, TokenClass::Property);
                if let Some(json_name) = &full.json_name {
                    self.push(json_name, TokenClass::String);
                }
                self.ty(&full.ty);
            }
            Field::Short(short) => self.push(&short.id, TokenClass::Class),
        }
    }

    fn ty(&mut self, ty: &Type) {
        let mut ty = ty;
        loop {
            match ty {
                Type::Ident(ident) => return self.push(&ident.id, TokenClass::Class),
                Type::List(list) => ty = &list.element,
            }
        }
    }

    fn variant(&mut self, variant: &SumStrVariant) {
        self.push(&variant.id, TokenClass::EnumMember);
        if let Some(json_name) = &variant.json_name {
            self.push(json_name, TokenClass::String);
        }
    }
}

/// Length in columns, clipped at the end of the token's first row. Only an
/// unterminated literal can span rows.
fn first_row_len(token: &Token) -> u32 {
    let Location { start, end, .. } = token.location;
    if start.row == end.row {
        return end.col - start.col;
    }
    let first_row = token.text().split('\n').next().unwrap_or_default();
    1 + first_row.trim_end_matches('\r').chars().count() as u32
}

/// Flatten to the wire form, five integers per token.
pub fn flatten(tokens: &[SemanticToken]) -> Vec<u32> {
    tokens
        .iter()
        .flat_map(|t| {
            [
                t.delta_line,
                t.delta_start,
                t.length,
                t.token_type,
                t.token_modifiers_bitset,
            ]
        })
        .collect()
}
