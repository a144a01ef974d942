use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_builder_and_primary_span() {
    let diag = Diagnostic::error(ErrorCode::E2004)
        .with_message("no member `c` on `Person`")
        .with_secondary_label(Span::new(0, 1), "receiver has type `Person`")
        .with_label(Span::new(2, 3), "unknown member")
        .with_note("properties are looked up as cProperty(), getC(), isC() or a field");

    assert!(diag.is_error());
    assert_eq!(diag.primary_span(), Some(Span::new(2, 3)));
    assert_eq!(diag.labels.len(), 2);
}

#[test]
fn test_shifted_moves_every_label() {
    let diag = unclosed_delimiter(Span::new(0, 1), Span::new(5, 5), '(').shifted(100);
    let spans: Vec<Span> = diag.labels.iter().map(|l| l.span).collect();
    assert_eq!(spans, vec![Span::new(105, 105), Span::new(100, 101)]);
}

#[test]
fn test_display() {
    let diag = expected_expression(Span::new(3, 4), ")");
    assert_eq!(
        diag.to_string(),
        "error [E1002]: expected expression, found `)`\n  --> 3..4: expected expression here"
    );
}

#[test]
fn test_unclosed_delimiter_expects_matching_close() {
    let diag = unclosed_delimiter(Span::new(0, 1), Span::new(4, 4), '[');
    assert_eq!(diag.labels[0].message, "expected `]`");
    assert!(!diag.labels[1].is_primary);
}
