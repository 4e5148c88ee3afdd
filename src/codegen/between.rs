//! Between source printer.
//!
//! Output re-parses to the same AST. Fields print in full form except where
//! the field name is a keyword, which only shorthand can produce.

use between_core::ast::{Definition, Field, SumStrVariant, Type};
use between_core::TokenKind;

pub fn render(definitions: &[Definition]) -> String {
    definitions
        .iter()
        .map(|definition| match definition {
            Definition::Product(p) => block("prod", &p.id, p.fields.iter().map(field)),
            Definition::Sum(s) => block("sum", &s.id, s.variants.iter().map(field)),
            Definition::SumStr(s) => block("sumstr", &s.id, s.variants.iter().map(variant)),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn block(keyword: &str, id: &str, members: impl Iterator<Item = String>) -> String {
    let mut out = format!("{keyword} {id} {{\n");
    for member in members {
        out.push_str(&format!("  {member},\n"));
    }
    out.push_str("}\n");
    out
}

fn field(f: &Field) -> String {
    if TokenKind::keyword(&f.id).is_some() {
        if let (None, Type::Ident(ident)) = (&f.json_name, &f.ty) {
            return format!("{}{}", ident.id, if ident.nullable { "?" } else { "" });
        }
    }
    match &f.json_name {
        Some(json_name) => format!("{} \"{}\" {}", f.id, json_name, ty(&f.ty)),
        None => format!("{} {}", f.id, ty(&f.ty)),
    }
}

fn variant(v: &SumStrVariant) -> String {
    match &v.json_name {
        Some(json_name) => format!("{} \"{}\"", v.id, json_name),
        None => v.id.clone(),
    }
}

fn ty(t: &Type) -> String {
    let mut out = String::new();
    let mut t = t;
    loop {
        match t {
            Type::List(list) => {
                out.push_str("[]");
                if list.nullable {
                    out.push('?');
                }
                t = &list.element;
            }
            Type::Ident(ident) => {
                out.push_str(&ident.id);
                if ident.nullable {
                    out.push('?');
                }
                return out;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use between_core::compile;
    use pretty_assertions::assert_eq;

    fn bt(source: &str) -> String {
        render(&compile(source).expect("source compiles").definitions)
    }

    #[test]
    fn test_prints_full_form() {
        assert_eq!(
            bt("prod User { name Str, Address?, tags \"t\" []?[]Str?, }\nprod Address { }"),
            "prod User {\n  name Str,\n  address Address?,\n  tags \"t\" []?[]Str?,\n}\n\nprod Address {\n}\n"
        );
    }

    #[test]
    fn test_sum_and_sumstr() {
        assert_eq!(
            bt("sum S { a Int, } sumstr C { Red \"red\", Green, }"),
            "sum S {\n  a Int,\n}\n\nsumstr C {\n  Red \"red\",\n  Green,\n}\n"
        );
    }

    #[test]
    fn test_keyword_field_names_stay_shorthand() {
        let source = "prod Sum { }\nprod A { Sum?, }";
        assert_eq!(bt(source), "prod Sum {\n}\n\nprod A {\n  Sum?,\n}\n");
        assert_eq!(
            compile(&bt(source)).ok().map(|c| c.definitions),
            compile(source).ok().map(|c| c.definitions)
        );
    }
}
