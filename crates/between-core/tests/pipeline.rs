//! End-to-end behaviour of lex → parse → translate.

use std::collections::HashSet;

use between_core::ast::{self, Primitive};
use between_core::diagnostics::project;
use between_core::syntax;
use between_core::translate::lower_first;
use between_core::{analyze, lex, parse, BetweenError, SemanticError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn semantic(errors: &[BetweenError]) -> Vec<&SemanticError> {
    errors
        .iter()
        .filter_map(|e| match e {
            BetweenError::Semantic(s) => Some(s),
            _ => None,
        })
        .collect()
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[test]
fn scenario_product_with_nullable_field() {
    let analysis = analyze("prod User { name Str, age Int?, }");
    assert!(analysis.is_ok(), "{:?}", analysis.errors);

    let ast = analysis.ast.expect("translated");
    assert_eq!(ast.len(), 1);
    let ast::Definition::Product(user) = &ast[0] else {
        panic!("expected product");
    };
    assert_eq!(user.fields.len(), 2);
    assert_eq!(user.fields[1].id, "age");
    assert!(user.fields[1].ty.is_nullable());
    assert!(!user.fields[0].ty.is_nullable());

    let syntax::Definition::Product(user) = &analysis.syntax[0] else {
        panic!("expected product");
    };
    assert!(user.fields.iter().all(|f| matches!(f, syntax::Field::Full(_))));
}

#[test]
fn scenario_sum_references() {
    let defined = analyze(
        "sum Data { adminData AdminData, userData UserData, }
         prod AdminData { } prod UserData { }",
    );
    assert!(defined.is_ok(), "{:?}", defined.errors);

    let source = "sum Data { adminData AdminData, userData UserData, }\nprod UserData { }";
    let missing = analyze(source);
    let errors = semantic(&missing.errors);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "Unknown type AdminData");
    assert_eq!(errors[0].location().slice(source), Some("AdminData"));
    assert_eq!(errors[0].location().start.col, 21);
}

#[test]
fn scenario_duplicate_variant() {
    let analysis = analyze("sumstr Status { Active, Active, }");
    let errors = semantic(&analysis.errors);
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], SemanticError::DuplicateVariant { name, .. } if name == "Active"));
    assert_eq!(errors[0].location().start.col, 24);
}

#[test]
fn scenario_duplicate_identifier() {
    let analysis = analyze("prod User { name Str, }\nprod User { id Int, }\nprod Ref { u User, }");
    let errors = semantic(&analysis.errors);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "Duplicated identifier: User");
    assert_eq!(errors[0].location().start.row, 1);
}

#[test]
fn partial_tree_survives_syntax_errors() {
    let analysis = analyze("prod A { x Int, }\nprod {\nsumstr S { V, }");
    assert!(analysis.ast.is_none());
    assert!(!analysis.errors.is_empty());
    let ids: Vec<_> = analysis.syntax.iter().map(|d| d.id().text().to_string()).collect();
    assert_eq!(ids, vec!["A", "", "S"]);
}

#[test]
fn deeply_nested_list_is_rejected_not_overflowed() {
    let source = format!("prod A {{ x {}Int, }}\nprod B {{ }}", "[]".repeat(200_000));
    let analysis = analyze(&source);

    assert!(analysis.ast.is_none());
    assert_eq!(analysis.errors.len(), 1);
    assert_eq!(analysis.errors[0].code(), Some("B203"));
    let ids: Vec<_> = analysis.syntax.iter().map(|d| d.id().text().to_string()).collect();
    assert_eq!(ids, vec!["A", "B"]);
}

#[test]
fn date_usage_is_tracked() {
    let analysis = analyze("prod Event { at Date, tags []Str?, }");
    assert!(analysis.is_ok());
    assert_eq!(
        analysis.used_primitives.into_iter().collect::<Vec<_>>(),
        vec![Primitive::Str, Primitive::Date]
    );
}

// =============================================================================
// PROPERTIES
// =============================================================================

const DEF_NAMES: &[&str] = &["A", "B", "C", "Str"];
const TYPE_NAMES: &[&str] = &["Int", "Str", "Date", "A", "B", "C", "D"];
const FIELD_NAMES: &[&str] = &["x", "y", "a", "str"];
const VARIANT_NAMES: &[&str] = &["P", "Q", "R"];
const PRIMITIVES: &[&str] = &["Float", "Str", "Bool", "Int", "Any", "Object", "Date"];

#[derive(Debug, Clone)]
enum Member {
    Full {
        name: &'static str,
        ty: &'static str,
        /// `Some(nullable)` wraps the type in a list.
        list: Option<bool>,
        nullable: bool,
    },
    Short {
        ty: &'static str,
        nullable: bool,
    },
}

impl Member {
    fn name(&self) -> String {
        match self {
            Member::Full { name, .. } => name.to_string(),
            Member::Short { ty, .. } => lower_first(ty),
        }
    }

    fn ty(&self) -> &'static str {
        match self {
            Member::Full { ty, .. } | Member::Short { ty, .. } => *ty,
        }
    }

    fn outer_nullable(&self) -> bool {
        match self {
            Member::Full { list, nullable, .. } => list.unwrap_or(*nullable),
            Member::Short { nullable, .. } => *nullable,
        }
    }

    fn render(&self) -> String {
        let q = |b: bool| if b { "?" } else { "" };
        match self {
            Member::Full {
                name,
                ty,
                list,
                nullable,
            } => {
                let prefix = list.map(|n| format!("[]{}", q(n))).unwrap_or_default();
                format!("{name} {prefix}{ty}{}, ", q(*nullable))
            }
            Member::Short { ty, nullable } => format!("{ty}{}, ", q(*nullable)),
        }
    }
}

#[derive(Debug, Clone)]
struct Def {
    kind: u8,
    name: &'static str,
    members: Vec<Member>,
    variants: Vec<&'static str>,
}

impl Def {
    fn render(&self) -> String {
        let body: String = match self.kind {
            2 => self.variants.iter().map(|v| format!("{v}, ")).collect(),
            _ => self.members.iter().map(Member::render).collect(),
        };
        let keyword = ["prod", "sum", "sumstr"][self.kind as usize];
        format!("{keyword} {} {{ {body}}}\n", self.name)
    }
}

fn arb_member() -> impl Strategy<Value = Member> {
    prop_oneof![
        (
            prop::sample::select(FIELD_NAMES),
            prop::sample::select(TYPE_NAMES),
            prop::option::of(any::<bool>()),
            any::<bool>(),
        )
            .prop_map(|(name, ty, list, nullable)| Member::Full {
                name,
                ty,
                list,
                nullable,
            }),
        (prop::sample::select(TYPE_NAMES), any::<bool>())
            .prop_map(|(ty, nullable)| Member::Short { ty, nullable }),
    ]
}

fn arb_definition() -> impl Strategy<Value = Def> {
    (
        0u8..3,
        prop::sample::select(DEF_NAMES),
        prop::collection::vec(arb_member(), 0..4),
        prop::collection::vec(prop::sample::select(VARIANT_NAMES), 0..4),
    )
        .prop_map(|(kind, name, members, variants)| Def {
            kind,
            name,
            members,
            variants,
        })
}

/// Whether a generated document should translate without errors, decided
/// without looking at the translator.
fn expected_valid(defs: &[Def]) -> bool {
    let mut defined = HashSet::new();
    for def in defs {
        if PRIMITIVES.contains(&def.name) || !defined.insert(def.name) {
            return false;
        }
    }
    let known = |ty: &str| PRIMITIVES.contains(&ty) || defined.contains(ty);

    defs.iter().all(|def| {
        if def.kind == 2 {
            let mut seen = HashSet::new();
            return def.variants.iter().all(|v| seen.insert(*v));
        }
        let mut seen = HashSet::new();
        def.members.iter().all(|m| {
            seen.insert(m.name())
                && known(m.ty())
                && !(def.kind == 1 && m.outer_nullable())
        })
    })
}

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z{}\\[\\],?\" \n#é]{0,80}"
}

proptest! {
    #[test]
    fn clean_parse_translates_cleanly_iff_well_formed(defs in prop::collection::vec(arb_definition(), 0..4)) {
        let source: String = defs.iter().map(Def::render).collect();
        let lexed = lex(&source);
        let parsed = parse(&lexed.tokens);
        prop_assert!(lexed.errors.is_empty());
        prop_assert!(parsed.errors.is_empty(), "{:?}\n{}", parsed.errors, source);

        let analysis = analyze(&source);
        prop_assert_eq!(analysis.is_ok(), expected_valid(&defs), "{}", source);
    }

    #[test]
    fn analysis_is_idempotent(source in arb_text()) {
        let first = analyze(&source);
        let second = analyze(&source);
        prop_assert_eq!(lex(&source), lex(&source));
        prop_assert_eq!(&first.syntax, &second.syntax);
        prop_assert_eq!(&first.ast, &second.ast);
        prop_assert_eq!(project(&first.errors), project(&second.errors));
    }

    #[test]
    fn parse_errors_are_bounded(source in arb_text()) {
        let lexed = lex(&source);
        let parsed = parse(&lexed.tokens);
        prop_assert!(parsed.errors.len() <= lexed.tokens.len());
        for error in &parsed.errors {
            prop_assert!(error.location().byte_end <= source.len());
        }
    }

    #[test]
    fn parser_survives_arbitrary_token_streams(
        kinds in prop::collection::vec(0usize..11, 0..60)
    ) {
        use between_core::{Location, Token, TokenKind};
        const KINDS: [TokenKind; 11] = [
            TokenKind::Prod, TokenKind::Sum, TokenKind::SumStr, TokenKind::Ident,
            TokenKind::Literal, TokenKind::LBrace, TokenKind::RBrace, TokenKind::List,
            TokenKind::Comma, TokenKind::Question, TokenKind::Eof,
        ];
        let tokens: Vec<Token> = kinds
            .iter()
            .map(|&i| Token::with_value(KINDS[i], "x", Location::default()))
            .collect();
        let parsed = parse(&tokens);
        prop_assert!(parsed.errors.len() <= tokens.len() + 1);
    }
}
