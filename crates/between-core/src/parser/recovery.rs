//! First and follow sets used by panic-mode recovery.
//!
//! Each production that can fail names the tokens it resynchronises on.
//! Definition keywords appear in every body-level set so that a missing `}`
//! never swallows the next definition.

use crate::token::TokenKind::{self, *};

/// Tokens that can start a definition.
pub const DEFINITION_FIRST: &[TokenKind] = &[Prod, Sum, SumStr];

/// Where parsing may resume after a broken definition.
pub const DEFINITION_FOLLOW: &[TokenKind] = &[Prod, Sum, SumStr, Eof];

/// After the definition keyword: the name, or `{` when the name is missing.
pub const KEYWORD_FOLLOW: &[TokenKind] = &[Ident, LBrace, Prod, Sum, SumStr];

/// After `{`: a member or the closing brace.
pub const BODY_FOLLOW: &[TokenKind] = &[Ident, RBrace, Prod, Sum, SumStr];

/// What a body may contain at any member boundary.
pub const MEMBER_OR_CLOSE: &[TokenKind] = &[Ident, RBrace];

/// Resume point after a broken field or variant: the next member, the
/// enclosing `}`, or the next definition.
pub const MEMBER_FOLLOW: &[TokenKind] = &[Ident, RBrace, Prod, Sum, SumStr];

/// Tokens that may follow a field's leading identifier. `Ident`, `List` and
/// `Literal` select the full form, `Question` and `Comma` the shorthand.
pub const FIELD_TAIL_FIRST: &[TokenKind] = &[Ident, List, Literal, Question, Comma];

/// Tokens that may follow a sumstr variant's identifier.
pub const VARIANT_TAIL_FIRST: &[TokenKind] = &[Literal, Comma];

/// Tokens that can start a type.
pub const TYPE_FIRST: &[TokenKind] = &[Ident, List];

/// Resume point after a broken type.
pub const TYPE_FOLLOW: &[TokenKind] = &[Comma, RBrace, Prod, Sum, SumStr];

/// Deepest run of `[]` prefixes a single type may carry.
pub const MAX_TYPE_DEPTH: usize = 128;

/// Whether `kind` ends the member list of a body.
pub fn closes_body(kind: TokenKind) -> bool {
    matches!(kind, RBrace | Eof) || DEFINITION_FIRST.contains(&kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_sets_always_contain_resume_points() {
        for set in [DEFINITION_FOLLOW, KEYWORD_FOLLOW, BODY_FOLLOW, MEMBER_FOLLOW, TYPE_FOLLOW] {
            for keyword in DEFINITION_FIRST {
                assert!(set.contains(keyword), "{set:?} misses {keyword:?}");
            }
        }
    }

    #[test]
    fn test_member_follow_covers_first_and_close() {
        for kind in MEMBER_OR_CLOSE {
            assert!(MEMBER_FOLLOW.contains(kind));
        }
    }

    #[test]
    fn test_closes_body() {
        assert!(closes_body(RBrace));
        assert!(closes_body(Eof));
        assert!(closes_body(SumStr));
        assert!(!closes_body(Ident));
        assert!(!closes_body(Comma));
    }
}
