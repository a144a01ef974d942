#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;

fn kinds(source: &str) -> (Vec<TokenKind>, StringInterner) {
    let interner = StringInterner::new();
    let output = lex(source, &interner);
    assert!(output.errors.is_empty(), "{:?}", output.errors);
    (output.tokens.kinds(), interner)
}

#[test]
fn test_member_access_and_arithmetic() {
    let (tokens, interner) = kinds("a.b + 1");
    let a = interner.intern("a");
    let b = interner.intern("b");
    assert_eq!(
        tokens,
        vec![
            TokenKind::Ident(a),
            TokenKind::Dot,
            TokenKind::Ident(b),
            TokenKind::Plus,
            TokenKind::Int(1),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_numeric_literals() {
    let (tokens, _) = kinds("42 42L 1.5 1e3 2d 1.5f");
    assert_eq!(
        tokens,
        vec![
            TokenKind::Int(42),
            TokenKind::Long(42),
            TokenKind::Double(1.5f64.to_bits()),
            TokenKind::Double(1000.0f64.to_bits()),
            TokenKind::Double(2.0f64.to_bits()),
            TokenKind::Float(1.5f32.to_bits()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_keywords_are_not_identifiers() {
    let (tokens, interner) = kinds("this true false null thisOne");
    assert_eq!(
        tokens[..4].to_vec(),
        vec![TokenKind::This, TokenKind::True, TokenKind::False, TokenKind::Null]
    );
    assert_eq!(tokens[4], TokenKind::Ident(interner.intern("thisOne")));
}

#[test]
fn test_operators_longest_match() {
    let (tokens, _) = kinds("a<<b<=c&&d||e!=f");
    let ops: Vec<TokenKind> = tokens
        .into_iter()
        .filter(|k| !matches!(k, TokenKind::Ident(_) | TokenKind::Eof))
        .collect();
    assert_eq!(
        ops,
        vec![
            TokenKind::Shl,
            TokenKind::LtEq,
            TokenKind::AmpAmp,
            TokenKind::PipePipe,
            TokenKind::NotEq,
        ]
    );
}

#[test]
fn test_string_and_char_literals() {
    let (tokens, interner) = kinds(r#""hi\n" 'x' '\''"#);
    assert_eq!(tokens[0], TokenKind::Str(interner.intern("hi\n")));
    assert_eq!(tokens[1], TokenKind::Char('x'));
    assert_eq!(tokens[2], TokenKind::Char('\''));
}

#[test]
fn test_template_is_raw() {
    let (tokens, interner) = kinds("`Hello {name}!`");
    assert_eq!(tokens[0], TokenKind::Template(interner.intern("Hello {name}!")));
}

#[test]
fn test_offset_shifts_spans() {
    let interner = StringInterner::new();
    let output = lex_with_offset("x + 1", 10, &interner);
    let spans: Vec<Span> = output.tokens.iter().map(|t| t.span).collect();
    assert_eq!(
        spans,
        vec![
            Span::new(10, 11),
            Span::new(12, 13),
            Span::new(14, 15),
            Span::new(15, 15),
        ]
    );
}

#[test]
fn test_errors_do_not_stop_lexing() {
    let interner = StringInterner::new();
    let output = lex("a # \"open", &interner);
    assert_eq!(
        output.tokens.kinds()[1..].to_vec(),
        vec![TokenKind::Error, TokenKind::Error, TokenKind::Eof]
    );
    let codes: Vec<&str> = output.errors.iter().map(|e| e.code().as_str()).collect();
    assert_eq!(codes, vec!["E0002", "E0001"]);
    assert_eq!(output.errors[0].span, Span::new(2, 3));
}

#[test]
fn test_bad_literals() {
    let interner = StringInterner::new();
    let output = lex("99999999999999999999 'ab' \"\\q\" `open", &interner);
    let kinds: Vec<LexErrorKind> = output.errors.into_iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            LexErrorKind::NumberOutOfRange,
            LexErrorKind::BadCharLiteral,
            LexErrorKind::InvalidEscape,
            LexErrorKind::UnterminatedTemplate,
        ]
    );
}

#[test]
fn test_error_diagnostic() {
    let interner = StringInterner::new();
    let output = lex("#", &interner);
    let diag = output.errors[0].to_diagnostic();
    assert_eq!(diag.code, bind_diagnostic::ErrorCode::E0002);
    assert_eq!(diag.primary_span(), Some(Span::new(0, 1)));
}
