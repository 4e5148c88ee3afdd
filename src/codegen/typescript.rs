//! TypeScript declarations.

use between_core::ast::{Definition, Field, Product, Sum, SumStr, Type};
use between_core::Primitive;

use super::quote;

pub fn render(definitions: &[Definition]) -> String {
    definitions
        .iter()
        .map(|definition| match definition {
            Definition::Product(p) => product(p),
            Definition::Sum(s) => sum(s),
            Definition::SumStr(s) => sum_str(s),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn product(p: &Product) -> String {
    if p.fields.is_empty() {
        return format!("export interface {} {{}}\n", p.id);
    }
    let mut out = format!("export interface {} {{\n", p.id);
    for field in &p.fields {
        out.push_str(&format!("  {};\n", member(field)));
    }
    out.push_str("}\n");
    out
}

fn sum(s: &Sum) -> String {
    if s.variants.is_empty() {
        return format!("export type {} = never;\n", s.id);
    }
    let mut out = format!("export type {} =", s.id);
    for variant in &s.variants {
        out.push_str(&format!("\n  | {{ {} }}", member(variant)));
    }
    out.push_str(";\n");
    out
}

fn sum_str(s: &SumStr) -> String {
    let variants = s
        .variants
        .iter()
        .map(|v| quote(v.wire_name()))
        .collect::<Vec<_>>();
    if variants.is_empty() {
        return format!("export type {} = never;\n", s.id);
    }
    format!("export type {} = {};\n", s.id, variants.join(" | "))
}

/// `name: T` or `name?: T`. Renamed members use the quoted wire name.
fn member(field: &Field) -> String {
    let name = match &field.json_name {
        Some(json_name) => quote(json_name),
        None => field.id.clone(),
    };
    let optional = if field.ty.is_nullable() { "?" } else { "" };
    format!("{name}{optional}: {}", ty(&field.ty, true))
}

/// Top-level nullability is carried by `?` on the member; nested nullable
/// types become explicit unions with `undefined`.
fn ty(t: &Type, top_level: bool) -> String {
    let (rendered, nullable) = match t {
        Type::List(list) => (format!("{}[]", ty(&list.element, false)), list.nullable),
        Type::Ident(ident) => (
            Primitive::from_name(&ident.id)
                .map(primitive)
                .unwrap_or(ident.id.as_str())
                .to_string(),
            ident.nullable,
        ),
    };
    if nullable && !top_level {
        format!("({rendered} | undefined)")
    } else {
        rendered
    }
}

fn primitive(p: Primitive) -> &'static str {
    match p {
        Primitive::Float | Primitive::Int => "number",
        Primitive::Str | Primitive::Date => "string",
        Primitive::Bool => "boolean",
        Primitive::Any => "unknown",
        Primitive::Object => "Record<string, unknown>",
    }
}
