#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;

#[test]
fn test_parse_prints_tree() {
    let out = parse_expr("a.b + 1").unwrap();
    assert!(out.contains('+'));
    assert!(out.contains('b'));
}

#[test]
fn test_parse_renders_syntax_error() {
    let out = parse_expr("(1 + 2").unwrap_err();
    assert!(out.contains("E1003"), "{out}");
}

#[test]
fn test_lex_lists_tokens() {
    let out = lex_expr("x == 1");
    assert!(out.lines().count() >= 4, "{out}");
}

#[test]
fn test_explain_known_and_unknown_codes() {
    assert!(explain_error("e2005").unwrap().starts_with("E2005"));
    assert!(explain_error("E4242").is_err());
}
