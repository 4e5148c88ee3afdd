//! Go declarations for `encoding/json`.
//!
//! Products become structs, sums become structs of optional pointers (exactly
//! one is expected to be set), and string sums become a named string type
//! with one constant per variant.

use std::collections::BTreeSet;

use between_core::ast::{Definition, Field, Product, Sum, SumStr, Type};
use between_core::Primitive;

use super::quote;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoOptions {
    pub package_name: String,
}

impl GoOptions {
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
        }
    }
}

pub fn render(
    definitions: &[Definition],
    used_primitives: &BTreeSet<Primitive>,
    options: &GoOptions,
) -> String {
    let mut out = format!("package {}\n", options.package_name);
    if used_primitives.contains(&Primitive::Date) {
        out.push_str("\nimport \"time\"\n");
    }
    for definition in definitions {
        out.push('\n');
        out.push_str(&match definition {
            Definition::Product(p) => product(p),
            Definition::Sum(s) => sum(s),
            Definition::SumStr(s) => sum_str(s),
        });
    }
    out
}

fn product(p: &Product) -> String {
    struct_decl(&p.id, &p.fields, false)
}

fn sum(s: &Sum) -> String {
    struct_decl(&s.id, &s.variants, true)
}

fn struct_decl(id: &str, fields: &[Field], force_pointer: bool) -> String {
    if fields.is_empty() {
        return format!("type {id} struct{{}}\n");
    }
    let mut out = format!("type {id} struct {{\n");
    for field in fields {
        out.push_str(&format!("\t{}\n", member(field, force_pointer)));
    }
    out.push_str("}\n");
    out
}

fn sum_str(s: &SumStr) -> String {
    let mut out = format!("type {} string\n", s.id);
    if !s.variants.is_empty() {
        out.push('\n');
    }
    for variant in &s.variants {
        out.push_str(&format!(
            "const {}_{} {} = {}\n",
            s.id,
            variant.id,
            s.id,
            quote(variant.wire_name())
        ));
    }
    out
}

fn member(field: &Field, force_pointer: bool) -> String {
    let optional = force_pointer || field.ty.is_nullable();
    let omitempty = if optional { ",omitempty" } else { "" };
    format!(
        "{} {} `json:{}`",
        capitalize_head(&field.id),
        ty(&field.ty, force_pointer),
        quote(&format!("{}{omitempty}", field.wire_name()))
    )
}

fn ty(t: &Type, force_pointer: bool) -> String {
    let pointer = if force_pointer || t.is_nullable() { "*" } else { "" };
    match t {
        Type::List(list) => format!("{pointer}[]{}", ty(&list.element, false)),
        Type::Ident(ident) => {
            let name = Primitive::from_name(&ident.id)
                .map(primitive)
                .unwrap_or(ident.id.as_str());
            format!("{pointer}{name}")
        }
    }
}

fn primitive(p: Primitive) -> &'static str {
    match p {
        Primitive::Float => "float32",
        Primitive::Str => "string",
        Primitive::Bool => "bool",
        Primitive::Int => "int",
        Primitive::Any => "any",
        Primitive::Object => "map[string]any",
        Primitive::Date => "time.Time",
    }
}

/// Exported Go name: first character upper-cased.
fn capitalize_head(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(head) => head.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
