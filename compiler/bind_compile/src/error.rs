//! Errors from compiling one binding expression.

use bind_diagnostic::{Diagnostic, ErrorCode};
use bind_ir::Span;
use bind_parse::ParseError;
use bind_types::TypeError;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CompileError {
    Syntax(ParseError),
    Type(TypeError),
    /// A live expression feeding a target that is not observable.
    LiveBindingOnPlainTarget { span: Span, target: String },
    /// A bidirectional request the expression or target cannot honor.
    Bidirectional { span: Span, reason: &'static str },
    /// Resolution data missing for a node the checker accepted.
    Internal { span: Span, message: String },
}

impl CompileError {
    pub fn span(&self) -> Span {
        match self {
            CompileError::Syntax(err) => err.span,
            CompileError::Type(err) => err.span,
            CompileError::LiveBindingOnPlainTarget { span, .. }
            | CompileError::Bidirectional { span, .. }
            | CompileError::Internal { span, .. } => *span,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CompileError::Syntax(err) => err.code(),
            CompileError::Type(err) => err.code(),
            CompileError::LiveBindingOnPlainTarget { .. } => ErrorCode::E3001,
            CompileError::Bidirectional { .. } => ErrorCode::E3002,
            CompileError::Internal { .. } => ErrorCode::E9001,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            CompileError::Syntax(err) => err.to_diagnostic(),
            CompileError::Type(err) => err.to_diagnostic(),
            CompileError::LiveBindingOnPlainTarget { span, target } => {
                Diagnostic::error(ErrorCode::E3001)
                    .with_message(format!(
                        "expression depends on observable values but the target `{target}` is not observable"
                    ))
                    .with_label(*span, "this expression changes over time")
                    .with_note("only an observable target can host a live binding")
            }
            CompileError::Bidirectional { span, reason } => Diagnostic::error(ErrorCode::E3002)
                .with_message(format!("invalid bidirectional binding: {reason}"))
                .with_label(*span, *reason)
                .with_suggestion("bind bidirectionally to a single writable property path"),
            CompileError::Internal { span, message } => Diagnostic::error(ErrorCode::E9001)
                .with_message(format!("internal compiler error: {message}"))
                .with_label(*span, "while compiling this expression"),
        }
    }
}

impl From<ParseError> for CompileError {
    fn from(err: ParseError) -> Self {
        CompileError::Syntax(err)
    }
}

impl From<TypeError> for CompileError {
    fn from(err: TypeError) -> Self {
        CompileError::Type(err)
    }
}
