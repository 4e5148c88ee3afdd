//! Validated AST.
//!
//! Produced by [`crate::translate`] once a syntax tree has resolved cleanly.
//! Tokens and locations are gone; names are plain strings and nullability is
//! a flag. Code generators consume this shape.
//!
//! ```text
//! Source → Lexer → Tokens → Parser → Syntax tree
//!                                        ↓
//!                             Translate (symbol table)
//!                                        ↓
//!                            Validated AST → Generators
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// PRIMITIVES
// =============================================================================

/// Built-in types every document can reference without defining them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Primitive {
    Float,
    Str,
    Bool,
    Int,
    Any,
    Object,
    Date,
}

impl Primitive {
    pub const ALL: [Primitive; 7] = [
        Primitive::Float,
        Primitive::Str,
        Primitive::Bool,
        Primitive::Int,
        Primitive::Any,
        Primitive::Object,
        Primitive::Date,
    ];

    pub fn from_name(name: &str) -> Option<Primitive> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Primitive::Float => "Float",
            Primitive::Str => "Str",
            Primitive::Bool => "Bool",
            Primitive::Int => "Int",
            Primitive::Any => "Any",
            Primitive::Object => "Object",
            Primitive::Date => "Date",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// DEFINITIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Definition {
    Product(Product),
    Sum(Sum),
    SumStr(SumStr),
}

impl Definition {
    pub fn id(&self) -> &str {
        match self {
            Definition::Product(p) => &p.id,
            Definition::Sum(s) => &s.id,
            Definition::SumStr(s) => &s.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub fields: Vec<Field>,
}

/// Tagged union. Variants are fields whose types are never nullable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sum {
    pub id: String,
    pub variants: Vec<Field>,
}

/// String enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumStr {
    pub id: String,
    pub variants: Vec<SumStrVariant>,
}

/// A named member. Shorthand fields arrive here already expanded: the name is
/// the lower-cased type name and the type is the identifier as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_name: Option<String>,
    pub ty: Type,
}

impl Field {
    /// Name on the wire: the rename literal if present, else the field name.
    pub fn wire_name(&self) -> &str {
        self.json_name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Type {
    Ident(TypeIdent),
    List(List),
}

impl Type {
    pub fn is_nullable(&self) -> bool {
        match self {
            Type::Ident(t) => t.nullable,
            Type::List(l) => l.nullable,
        }
    }

    /// Innermost referenced type name.
    pub fn base_name(&self) -> &str {
        let mut ty = self;
        loop {
            match ty {
                Type::Ident(t) => return &t.id,
                Type::List(l) => ty = &l.element,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeIdent {
    pub id: String,
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub nullable: bool,
    pub element: Box<Type>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumStrVariant {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_name: Option<String>,
}

impl SumStrVariant {
    pub fn wire_name(&self) -> &str {
        self.json_name.as_deref().unwrap_or(&self.id)
    }
}
