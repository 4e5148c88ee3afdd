//! Whole-document entry points: lex → parse → translate.
//!
//! Translation only runs when lexing and parsing were clean, so semantic
//! errors are never reported against a tree that recovery had to patch up.

use std::collections::BTreeSet;

use crate::ast::{self, Primitive};
use crate::error::BetweenError;
use crate::lexer::lex;
use crate::parser::parse;
use crate::syntax;
use crate::translate::translate;

/// Everything known about one version of a document.
#[derive(Debug)]
pub struct Analysis {
    /// Syntax tree, possibly partial.
    pub syntax: Vec<syntax::Definition>,
    /// Validated AST; `None` when translation was skipped.
    pub ast: Option<Vec<ast::Definition>>,
    pub used_primitives: BTreeSet<Primitive>,
    /// Lexical, then syntactic, then semantic errors.
    pub errors: Vec<BetweenError>,
}

impl Analysis {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Run the full pipeline over `source`, collecting every error.
pub fn analyze(source: &str) -> Analysis {
    let lexed = lex(source);
    let parsed = parse(&lexed.tokens);

    let mut errors: Vec<BetweenError> = lexed.errors.into_iter().map(Into::into).collect();
    errors.extend(parsed.errors.into_iter().map(Into::into));

    if !errors.is_empty() {
        tracing::debug!(errors = errors.len(), "skipping translation");
        return Analysis {
            syntax: parsed.definitions,
            ast: None,
            used_primitives: BTreeSet::new(),
            errors,
        };
    }

    let translation = translate(&parsed.definitions);
    errors.extend(translation.errors.into_iter().map(Into::into));

    Analysis {
        syntax: parsed.definitions,
        ast: Some(translation.definitions),
        used_primitives: translation.used_primitives,
        errors,
    }
}

/// A document that passed every check.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub definitions: Vec<ast::Definition>,
    pub used_primitives: BTreeSet<Primitive>,
}

/// Run the pipeline and insist on a clean result.
pub fn compile(source: &str) -> Result<Compiled, Vec<BetweenError>> {
    let analysis = analyze(source);
    match analysis.ast {
        Some(definitions) if analysis.errors.is_empty() => Ok(Compiled {
            definitions,
            used_primitives: analysis.used_primitives,
        }),
        _ => Err(analysis.errors),
    }
}
