//! Syntax tree.
//!
//! Keeps every significant token so diagnostics and highlighting can point
//! back at the source. A tree may be partial: tokens the parser had to
//! invent during error recovery have their `error` flag set.

use serde::{Deserialize, Serialize};

use crate::token::Token;

/// A top-level definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Definition {
    Product(Product),
    Sum(Sum),
    SumStr(SumStr),
}

impl Definition {
    pub fn keyword(&self) -> &Token {
        match self {
            Definition::Product(p) => &p.keyword,
            Definition::Sum(s) => &s.keyword,
            Definition::SumStr(s) => &s.keyword,
        }
    }

    /// The defined type name.
    pub fn id(&self) -> &Token {
        match self {
            Definition::Product(p) => &p.id,
            Definition::Sum(s) => &s.id,
            Definition::SumStr(s) => &s.id,
        }
    }
}

/// `prod Id { field* }`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub keyword: Token,
    pub id: Token,
    pub left_brace: Token,
    pub fields: Vec<Field>,
    pub right_brace: Token,
}

/// `sum Id { field* }`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sum {
    pub keyword: Token,
    pub id: Token,
    pub left_brace: Token,
    pub variants: Vec<Field>,
    pub right_brace: Token,
}

/// `sumstr Id { variant* }`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumStr {
    pub keyword: Token,
    pub id: Token,
    pub left_brace: Token,
    pub variants: Vec<SumStrVariant>,
    pub right_brace: Token,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    Full(FieldFull),
    Short(FieldShort),
}

impl Field {
    pub fn id(&self) -> &Token {
        match self {
            Field::Full(f) => &f.id,
            Field::Short(f) => &f.id,
        }
    }
}

/// `id "json"? Type ,`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFull {
    pub id: Token,
    pub json_name: Option<Token>,
    pub ty: Type,
    pub separator: Token,
}

/// `Id ?? ,` where the identifier is both the referenced type and, with its
/// first letter lower-cased, the field name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldShort {
    pub id: Token,
    pub nullable: Option<Token>,
    pub separator: Token,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    Ident(TypeIdent),
    List(List),
}

impl Type {
    /// Whether the outermost type is marked `?`.
    pub fn is_nullable(&self) -> bool {
        match self {
            Type::Ident(t) => t.nullable.is_some(),
            Type::List(l) => l.nullable.is_some(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeIdent {
    pub id: Token,
    pub nullable: Option<Token>,
}

/// `[] ?? Type`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub brackets: Token,
    pub nullable: Option<Token>,
    pub element: Box<Type>,
}

/// `Id "json"? ,`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumStrVariant {
    pub id: Token,
    pub json_name: Option<Token>,
    pub separator: Token,
}
