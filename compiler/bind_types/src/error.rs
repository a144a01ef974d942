//! Resolution and typing errors (`E2xxx`).

use std::fmt;

use bind_diagnostic::{Diagnostic, ErrorCode};
use bind_ir::Span;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeError {
    pub kind: TypeErrorKind,
    pub span: Span,
}

/// Where a type mismatch was detected.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MismatchContext {
    Argument(usize),
    Target,
    Condition,
    Index,
    Element,
}

impl fmt::Display for MismatchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchContext::Argument(i) => write!(f, "argument {}", i + 1),
            MismatchContext::Target => f.write_str("binding target"),
            MismatchContext::Condition => f.write_str("condition"),
            MismatchContext::Index => f.write_str("index"),
            MismatchContext::Element => f.write_str("collection element"),
        }
    }
}

/// Types and members are pre-rendered with class names so the error is
/// self-contained.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeErrorKind {
    TypeMismatch {
        expected: String,
        found: String,
        context: MismatchContext,
    },
    /// Operator not defined for the operand types.
    InvalidOperator {
        op: &'static str,
        operands: String,
    },
    UnresolvedIdentifier {
        name: String,
        suggestion: Option<String>,
    },
    UnresolvedMember {
        receiver: String,
        member: String,
        suggestion: Option<String>,
        /// Visible overloads of that name, when some exist.
        candidates: Vec<String>,
    },
    AmbiguousOverload {
        member: String,
        candidates: Vec<String>,
    },
    /// A write through a read-only access path.
    ReadOnly { path: String },
}

impl TypeError {
    pub fn new(kind: TypeErrorKind, span: Span) -> Self {
        TypeError { kind, span }
    }

    pub fn code(&self) -> ErrorCode {
        match &self.kind {
            TypeErrorKind::TypeMismatch { .. } => ErrorCode::E2001,
            TypeErrorKind::InvalidOperator { .. } => ErrorCode::E2002,
            TypeErrorKind::UnresolvedIdentifier { .. } => ErrorCode::E2003,
            TypeErrorKind::UnresolvedMember { .. } => ErrorCode::E2004,
            TypeErrorKind::AmbiguousOverload { .. } => ErrorCode::E2005,
            TypeErrorKind::ReadOnly { .. } => ErrorCode::E2006,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code());
        match &self.kind {
            TypeErrorKind::TypeMismatch {
                expected,
                found,
                context,
            } => diag
                .with_message(format!(
                    "type mismatch in {context}: expected `{expected}`, found `{found}`"
                ))
                .with_label(self.span, format!("expected `{expected}`")),
            TypeErrorKind::InvalidOperator { op, operands } => diag
                .with_message(format!("operator `{op}` cannot be applied to {operands}"))
                .with_label(self.span, "unsupported operand types"),
            TypeErrorKind::UnresolvedIdentifier { name, suggestion } => {
                let diag = diag
                    .with_message(format!("cannot find `{name}` in this scope"))
                    .with_label(self.span, "not found in this scope");
                match suggestion {
                    Some(s) => diag.with_suggestion(format!("did you mean `{s}`?")),
                    None => diag,
                }
            }
            TypeErrorKind::UnresolvedMember {
                receiver,
                member,
                suggestion,
                candidates,
            } => {
                let mut diag = diag
                    .with_message(format!("no member `{member}` on `{receiver}`"))
                    .with_label(self.span, "unknown member");
                if !candidates.is_empty() {
                    diag = diag.with_note(format!("candidates: {}", candidates.join(", ")));
                }
                match suggestion {
                    Some(s) => diag.with_suggestion(format!("did you mean `{s}`?")),
                    None => diag,
                }
            }
            TypeErrorKind::AmbiguousOverload { member, candidates } => diag
                .with_message(format!("call to `{member}` is ambiguous"))
                .with_label(self.span, "more than one overload applies")
                .with_note(format!("candidates: {}", candidates.join(", ")))
                .with_suggestion("convert the arguments to the exact parameter types"),
            TypeErrorKind::ReadOnly { path } => diag
                .with_message(format!("`{path}` is read-only"))
                .with_label(self.span, "cannot be assigned")
                .with_note("declare a setter or expose a writable `Property`"),
        }
    }
}
