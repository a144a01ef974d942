//! Parse error types.
//!
//! Every variant is a `SyntaxError` in the sense of the binding language:
//! lexical failures (`E0xxx`) and grammar failures (`E1xxx`).

use bind_diagnostic::{
    expected_expression, unclosed_delimiter, unexpected_token, Diagnostic, ErrorCode,
};
use bind_ir::{Span, TokenKind};
use bind_lexer::LexError;

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum ParseErrorKind {
    Lex(LexError),
    UnexpectedToken {
        expected: &'static str,
        found: TokenKind,
    },
    ExpectedExpression {
        found: TokenKind,
    },
    /// Reached the end while `delimiter`, opened at `open`, was still open.
    UnclosedDelimiter {
        open: Span,
        delimiter: char,
    },
    ExpectedMember {
        found: TokenKind,
    },
    /// Integer literal outside the 32-bit (or 64-bit for `L`) range.
    IntegerOutOfRange,
    MalformedTemplate {
        reason: &'static str,
    },
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        ParseError { kind, span }
    }

    pub fn code(&self) -> ErrorCode {
        match &self.kind {
            ParseErrorKind::Lex(err) => err.code(),
            ParseErrorKind::UnexpectedToken { .. } => ErrorCode::E1001,
            ParseErrorKind::ExpectedExpression { .. } => ErrorCode::E1002,
            ParseErrorKind::UnclosedDelimiter { .. } => ErrorCode::E1003,
            ParseErrorKind::ExpectedMember { .. } => ErrorCode::E1004,
            ParseErrorKind::IntegerOutOfRange => ErrorCode::E0003,
            ParseErrorKind::MalformedTemplate { .. } => ErrorCode::E1005,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match &self.kind {
            ParseErrorKind::Lex(err) => err.to_diagnostic(),
            ParseErrorKind::UnexpectedToken { expected, found } => {
                unexpected_token(self.span, expected, found.display_name())
            }
            ParseErrorKind::ExpectedExpression { found } => {
                expected_expression(self.span, found.display_name())
            }
            ParseErrorKind::UnclosedDelimiter { open, delimiter } => {
                unclosed_delimiter(*open, self.span, *delimiter)
            }
            ParseErrorKind::ExpectedMember { found } => Diagnostic::error(ErrorCode::E1004)
                .with_message(format!(
                    "expected member name after `.`, found `{}`",
                    found.display_name()
                ))
                .with_label(self.span, "expected a name"),
            ParseErrorKind::IntegerOutOfRange => Diagnostic::error(ErrorCode::E0003)
                .with_message("integer literal out of range")
                .with_label(self.span, "does not fit in `int`")
                .with_suggestion("add an `L` suffix for a long literal"),
            ParseErrorKind::MalformedTemplate { reason } => Diagnostic::error(ErrorCode::E1005)
                .with_message(format!("malformed template: {reason}"))
                .with_label(self.span, *reason)
                .with_note("write `{{` and `}}` for literal braces"),
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        let span = err.span;
        ParseError::new(ParseErrorKind::Lex(err), span)
    }
}

#[cfg(test)]
mod tests;
