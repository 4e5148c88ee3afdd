//! Syntax tree → validated AST.
//!
//! Two passes over the definitions:
//! 1. **Registration**: every definition name goes into the symbol table.
//!    Clashes (with each other or with a primitive) are reported; the first
//!    binding wins.
//! 2. **Resolution**: each definition is lowered. Type references are checked
//!    against the frozen table, member names are checked for uniqueness
//!    within their definition, and sum variants are checked for nullability.
//!
//! Semantic errors never stop translation; the full AST is always produced
//! alongside every error found.

pub mod symbols;

use std::collections::{BTreeSet, HashSet};

use crate::ast::{self, Primitive};
use crate::error::SemanticError;
use crate::syntax;
use crate::token::Token;

pub use symbols::{SymbolKind, SymbolTable, SymbolTableBuilder};

/// Output of [`translate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub definitions: Vec<ast::Definition>,
    /// Primitives referenced anywhere, for generators that import on demand.
    pub used_primitives: BTreeSet<Primitive>,
    pub errors: Vec<SemanticError>,
}

impl Translation {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Resolve and validate a syntax tree.
///
/// Intended for trees that parsed without errors; placeholder tokens left by
/// recovery resolve as empty names.
pub fn translate(definitions: &[syntax::Definition]) -> Translation {
    let mut errors = Vec::new();
    let symbols = register(definitions, &mut errors);

    let mut translator = Translator {
        symbols,
        used_primitives: BTreeSet::new(),
        errors,
    };
    let definitions = definitions
        .iter()
        .map(|d| translator.definition(d))
        .collect();

    tracing::debug!(
        errors = translator.errors.len(),
        primitives = translator.used_primitives.len(),
        "translated definitions"
    );

    Translation {
        definitions,
        used_primitives: translator.used_primitives,
        errors: translator.errors,
    }
}

// =============================================================================
// REGISTRATION
// =============================================================================

fn register(definitions: &[syntax::Definition], errors: &mut Vec<SemanticError>) -> SymbolTable {
    let mut builder = SymbolTableBuilder::seeded();
    for definition in definitions {
        let kind = match definition {
            syntax::Definition::Product(_) => SymbolKind::Product,
            syntax::Definition::Sum(_) => SymbolKind::Sum,
            syntax::Definition::SumStr(_) => SymbolKind::SumString,
        };
        let id = definition.id();
        let name = id.text();
        match builder.register(name, kind) {
            Ok(()) => {}
            Err(SymbolKind::Primitive(_)) => errors.push(SemanticError::PrimitiveRedefinition {
                name: name.to_string(),
                location: id.location,
            }),
            Err(_) => errors.push(SemanticError::DuplicateIdentifier {
                name: name.to_string(),
                location: id.location,
            }),
        }
    }
    builder.finish()
}

// =============================================================================
// RESOLUTION
// =============================================================================

struct Translator {
    symbols: SymbolTable,
    used_primitives: BTreeSet<Primitive>,
    errors: Vec<SemanticError>,
}

impl Translator {
    fn definition(&mut self, definition: &syntax::Definition) -> ast::Definition {
        match definition {
            syntax::Definition::Product(p) => ast::Definition::Product(self.product(p)),
            syntax::Definition::Sum(s) => ast::Definition::Sum(self.sum(s)),
            syntax::Definition::SumStr(s) => ast::Definition::SumStr(self.sum_str(s)),
        }
    }

    fn product(&mut self, product: &syntax::Product) -> ast::Product {
        let mut seen = HashSet::new();
        let fields = product
            .fields
            .iter()
            .map(|f| self.field(f, &mut seen))
            .collect();
        ast::Product {
            id: product.id.text().to_string(),
            fields,
        }
    }

    fn sum(&mut self, sum: &syntax::Sum) -> ast::Sum {
        let mut seen = HashSet::new();
        let mut variants = Vec::with_capacity(sum.variants.len());
        for variant in &sum.variants {
            let field = self.field(variant, &mut seen);
            if field.ty.is_nullable() {
                self.errors.push(SemanticError::NullableSumVariant {
                    name: field.id.clone(),
                    location: variant.id().location,
                });
            }
            variants.push(field);
        }
        ast::Sum {
            id: sum.id.text().to_string(),
            variants,
        }
    }

    fn sum_str(&mut self, sum_str: &syntax::SumStr) -> ast::SumStr {
        let mut seen = HashSet::new();
        let mut variants = Vec::with_capacity(sum_str.variants.len());
        for variant in &sum_str.variants {
            let id = variant.id.text();
            if !seen.insert(id) {
                self.errors.push(SemanticError::DuplicateVariant {
                    name: id.to_string(),
                    location: variant.id.location,
                });
            }
            variants.push(ast::SumStrVariant {
                id: id.to_string(),
                json_name: variant.json_name.as_ref().map(|t| t.text().to_string()),
            });
        }
        ast::SumStr {
            id: sum_str.id.text().to_string(),
            variants,
        }
    }

    fn field(&mut self, field: &syntax::Field, seen: &mut HashSet<String>) -> ast::Field {
        match field {
            syntax::Field::Full(full) => {
                let id = full.id.text().to_string();
                if !seen.insert(id.clone()) {
                    self.errors.push(SemanticError::DuplicateField {
                        name: id.clone(),
                        location: full.id.location,
                    });
                }
                ast::Field {
                    id,
                    json_name: full.json_name.as_ref().map(|t| t.text().to_string()),
                    ty: self.ty(&full.ty),
                }
            }
            syntax::Field::Short(short) => {
                let id = lower_first(short.id.text());
                if !seen.insert(id.clone()) {
                    self.errors.push(SemanticError::DuplicateDerivedField {
                        name: id.clone(),
                        location: short.id.location,
                    });
                }
                ast::Field {
                    id,
                    json_name: None,
                    ty: ast::Type::Ident(ast::TypeIdent {
                        id: self.resolve(&short.id),
                        nullable: short.nullable.is_some(),
                    }),
                }
            }
        }
    }

    fn ty(&mut self, ty: &syntax::Type) -> ast::Type {
        match ty {
            syntax::Type::Ident(ident) => ast::Type::Ident(ast::TypeIdent {
                id: self.resolve(&ident.id),
                nullable: ident.nullable.is_some(),
            }),
            syntax::Type::List(list) => ast::Type::List(ast::List {
                nullable: list.nullable.is_some(),
                element: Box::new(self.ty(&list.element)),
            }),
        }
    }

    /// Check a type reference, recording primitives as used. Unknown names
    /// are reported and passed through unchanged.
    fn resolve(&mut self, id: &Token) -> String {
        let name = id.text();
        match self.symbols.get(name) {
            Some(SymbolKind::Primitive(primitive)) => {
                self.used_primitives.insert(primitive);
            }
            Some(_) => {}
            None => self.errors.push(SemanticError::UnknownType {
                name: name.to_string(),
                location: id.location,
            }),
        }
        name.to_string()
    }
}

/// Field name derived from a shorthand field: the type name with its first
/// letter lower-cased.
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn translate_source(source: &str) -> Translation {
        let lexed = lex(source);
        assert!(lexed.errors.is_empty(), "lex errors: {:?}", lexed.errors);
        let parsed = parse(&lexed.tokens);
        assert!(parsed.errors.is_empty(), "parse errors: {:?}", parsed.errors);
        translate(&parsed.definitions)
    }

    fn messages(translation: &Translation) -> Vec<String> {
        translation.errors.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_lower_first() {
        assert_eq!(lower_first("UserData"), "userData");
        assert_eq!(lower_first("URL"), "uRL");
        assert_eq!(lower_first("x"), "x");
        assert_eq!(lower_first(""), "");
    }

    #[test]
    fn test_product_translates_cleanly() {
        let translation = translate_source("prod User { name Str, age Int?, }");
        assert!(translation.is_ok());
        assert_eq!(
            translation.definitions,
            vec![ast::Definition::Product(ast::Product {
                id: "User".to_string(),
                fields: vec![
                    ast::Field {
                        id: "name".to_string(),
                        json_name: None,
                        ty: ast::Type::Ident(ast::TypeIdent {
                            id: "Str".to_string(),
                            nullable: false,
                        }),
                    },
                    ast::Field {
                        id: "age".to_string(),
                        json_name: None,
                        ty: ast::Type::Ident(ast::TypeIdent {
                            id: "Int".to_string(),
                            nullable: true,
                        }),
                    },
                ],
            })]
        );
        assert_eq!(
            translation.used_primitives,
            BTreeSet::from([Primitive::Str, Primitive::Int])
        );
    }

    #[test]
    fn test_forward_references_resolve() {
        let translation = translate_source(
            "sum Data { adminData AdminData, userData UserData, }
             prod AdminData { level Int, }
             prod UserData { name Str, }",
        );
        assert!(translation.is_ok(), "{:?}", translation.errors);
    }

    #[test]
    fn test_unknown_type_points_at_reference() {
        let source = "sum Data { adminData AdminData, userData UserData, } prod UserData { }";
        let translation = translate_source(source);
        assert_eq!(messages(&translation), vec!["Unknown type AdminData"]);
        let location = translation.errors[0].location();
        assert_eq!(location.slice(source), Some("AdminData"));
    }

    #[test]
    fn test_duplicate_sumstr_variant() {
        let source = "sumstr Status { Active, Active, }";
        let translation = translate_source(source);
        assert_eq!(messages(&translation), vec!["Duplicated sumstr variant: Active"]);
        assert_eq!(translation.errors[0].location().byte_start, 24);
    }

    #[test]
    fn test_duplicate_identifier_keeps_first() {
        let source = "prod User { } sumstr User { A, } prod Account { owner User, }";
        let translation = translate_source(source);
        assert_eq!(messages(&translation), vec!["Duplicated identifier: User"]);
        assert_eq!(translation.errors[0].location().byte_start, 21);
        assert_eq!(translation.definitions.len(), 3);
    }

    #[test]
    fn test_primitive_redefinition() {
        let translation = translate_source("prod Str { }");
        assert_eq!(messages(&translation), vec!["Cannot redefine primitive type: Str"]);
    }

    #[test]
    fn test_duplicate_fields() {
        let translation = translate_source("prod A { name Str, name Int, }");
        assert_eq!(messages(&translation), vec!["Duplicated field: name"]);

        let translation = translate_source("prod B { } prod A { b Str, B, }");
        assert_eq!(
            messages(&translation),
            vec!["The name of this field derives to: b, and it is duplicated"]
        );
    }

    #[test]
    fn test_shorthand_checks_type_and_name_independently() {
        let translation = translate_source("prod A { Missing?, }");
        assert_eq!(messages(&translation), vec!["Unknown type Missing"]);
        let ast::Definition::Product(a) = &translation.definitions[0] else {
            panic!("expected product");
        };
        assert_eq!(a.fields[0].id, "missing");
        assert_eq!(a.fields[0].ty.base_name(), "Missing");
        assert!(a.fields[0].ty.is_nullable());
    }

    #[test]
    fn test_shorthand_primitive_is_recorded() {
        let translation = translate_source("prod Event { Date, }");
        assert!(translation.is_ok());
        assert!(translation.used_primitives.contains(&Primitive::Date));
    }

    #[test]
    fn test_nullable_sum_variant() {
        let translation = translate_source("sum S { a Str?, b []?Int, c []Int?, }");
        assert_eq!(
            messages(&translation),
            vec![
                "Sum variant a cannot be optional, sum variants cannot be optional",
                "Sum variant b cannot be optional, sum variants cannot be optional",
            ]
        );
    }

    #[test]
    fn test_errors_accumulate_across_definitions() {
        let translation = translate_source(
            "prod A { x Nope, x Str, } sumstr S { V, V, } sum U { Int?, }",
        );
        assert_eq!(translation.errors.len(), 4);
        assert_eq!(translation.definitions.len(), 3);
    }
}
