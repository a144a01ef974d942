use super::*;
use bind_lexer::LexErrorKind;

#[test]
fn test_codes() {
    let found = TokenKind::RParen;
    let cases = [
        (ParseErrorKind::UnexpectedToken { expected: "`)`", found }, "E1001"),
        (ParseErrorKind::ExpectedExpression { found }, "E1002"),
        (
            ParseErrorKind::UnclosedDelimiter {
                open: Span::new(0, 1),
                delimiter: '(',
            },
            "E1003",
        ),
        (ParseErrorKind::ExpectedMember { found }, "E1004"),
        (ParseErrorKind::IntegerOutOfRange, "E0003"),
        (ParseErrorKind::MalformedTemplate { reason: "unmatched `}`" }, "E1005"),
    ];
    for (kind, code) in cases {
        let err = ParseError::new(kind, Span::new(2, 3));
        assert_eq!(err.code().as_str(), code);
        assert_eq!(err.to_diagnostic().code.as_str(), code);
    }
}

#[test]
fn test_lex_error_keeps_its_code() {
    let err: ParseError = LexError::new(Span::new(4, 5), LexErrorKind::InvalidCharacter('#')).into();
    assert_eq!(err.span, Span::new(4, 5));
    assert_eq!(err.code().as_str(), "E0002");
}
