//! Lexical errors.

use bind_diagnostic::{Diagnostic, ErrorCode};
use bind_ir::Span;

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexError {
    pub span: Span,
    pub kind: LexErrorKind,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum LexErrorKind {
    UnterminatedString,
    UnterminatedChar,
    UnterminatedTemplate,
    InvalidCharacter(char),
    InvalidEscape,
    /// Character literal with zero or several characters.
    BadCharLiteral,
    /// Numeric literal that does not fit its type.
    NumberOutOfRange,
}

impl LexError {
    pub fn new(span: Span, kind: LexErrorKind) -> Self {
        LexError { span, kind }
    }

    pub fn code(&self) -> ErrorCode {
        match self.kind {
            LexErrorKind::UnterminatedString => ErrorCode::E0001,
            LexErrorKind::InvalidCharacter(_) => ErrorCode::E0002,
            LexErrorKind::NumberOutOfRange => ErrorCode::E0003,
            LexErrorKind::UnterminatedChar | LexErrorKind::BadCharLiteral => ErrorCode::E0004,
            LexErrorKind::InvalidEscape => ErrorCode::E0005,
            LexErrorKind::UnterminatedTemplate => ErrorCode::E0006,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code());
        match &self.kind {
            LexErrorKind::UnterminatedString => diag
                .with_message("unterminated string literal")
                .with_label(self.span, "missing closing `\"`"),
            LexErrorKind::UnterminatedChar => diag
                .with_message("unterminated character literal")
                .with_label(self.span, "missing closing `'`"),
            LexErrorKind::UnterminatedTemplate => diag
                .with_message("unterminated template literal")
                .with_label(self.span, "missing closing backtick"),
            LexErrorKind::InvalidCharacter(c) => diag
                .with_message(format!("invalid character `{}`", c.escape_debug()))
                .with_label(self.span, "not valid in a binding expression"),
            LexErrorKind::InvalidEscape => diag
                .with_message("invalid escape sequence")
                .with_label(self.span, "unknown escape")
                .with_note("supported escapes: \\n \\t \\r \\0 \\\\ \\\" \\' \\u{..}"),
            LexErrorKind::BadCharLiteral => diag
                .with_message("character literal must contain exactly one character")
                .with_label(self.span, "here")
                .with_suggestion("use double quotes for a string"),
            LexErrorKind::NumberOutOfRange => diag
                .with_message("numeric literal out of range")
                .with_label(self.span, "does not fit the literal's type")
                .with_suggestion("add an `L` suffix for a long literal"),
        }
    }
}
