//! Diagnostic system for binding-expression errors.
//!
//! Every compile-time failure is a value. Phases produce their own error
//! types and convert them into a [`Diagnostic`]:
//! - Error codes for searchability (`bindc explain E2005`)
//! - Clear messages (what went wrong)
//! - Primary span (where it went wrong)
//! - Context labels, notes and suggestions
//!
//! Spans are relative to the expression text; the driver shifts them into
//! the enclosing markup with [`Diagnostic::shifted`].

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod queue;
pub mod span_utils;

pub use diagnostic::{
    expected_expression, unclosed_delimiter, unexpected_token, Diagnostic, Label, Severity,
};
pub use error_code::ErrorCode;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
