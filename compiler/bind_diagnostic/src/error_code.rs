//! Error codes for all binding-compiler diagnostics.
//!
//! The first digit names the phase. Used for `bindc explain` lookups.

use std::fmt;
use std::str::FromStr;

/// Error codes for all binding-compiler diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Parser errors
/// - E2xxx: Resolution and type errors
/// - E3xxx: Binding errors
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Invalid character in source
    E0002,
    /// Invalid or out-of-range number literal
    E0003,
    /// Invalid character literal
    E0004,
    /// Invalid escape sequence
    E0005,
    /// Unterminated template literal
    E0006,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Expected member name
    E1004,
    /// Malformed template segment
    E1005,

    // Resolution and Type Errors (E2xxx)
    /// Type mismatch
    E2001,
    /// Operator not applicable to operand types
    E2002,
    /// Unresolved identifier
    E2003,
    /// Unresolved member
    E2004,
    /// Ambiguous overload
    E2005,
    /// Assignment through a read-only path
    E2006,

    // Binding Errors (E3xxx)
    /// Reactive expression bound to a non-reactive target
    E3001,
    /// Invalid bidirectional binding
    E3002,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,
    /// Too many errors
    E9002,
}

impl ErrorCode {
    /// All error code variants, for exhaustive testing and `explain`.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E0001,
        ErrorCode::E0002,
        ErrorCode::E0003,
        ErrorCode::E0004,
        ErrorCode::E0005,
        ErrorCode::E0006,
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E9001,
        ErrorCode::E9002,
    ];

    /// Get the code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// Long-form explanation shown by `bindc explain`.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "A string literal is missing its closing `\"`.",
            ErrorCode::E0002 => "The expression contains a character that is not part of the binding language.",
            ErrorCode::E0003 => {
                "A numeric literal is malformed or does not fit its type. Plain integer \
                 literals must fit in 32 bits; add an `L` suffix for a long."
            }
            ErrorCode::E0004 => "A character literal must contain exactly one character, e.g. `'a'`.",
            ErrorCode::E0005 => {
                "Unknown escape sequence. Supported escapes are \\n \\t \\r \\\\ \\\" \\' and \\u{..}."
            }
            ErrorCode::E0006 => "A template literal is missing its closing backtick.",
            ErrorCode::E1001 => "The parser found a token it did not expect at this position.",
            ErrorCode::E1002 => "An expression was expected, e.g. a literal, a name or `(`.",
            ErrorCode::E1003 => "A `(`, `[` or `{` was opened but never closed.",
            ErrorCode::E1004 => "A member name must follow `.`.",
            ErrorCode::E1005 => {
                "A template segment is malformed. Each `{...}` must hold one expression; \
                 write `{{` and `}}` for literal braces."
            }
            ErrorCode::E2001 => {
                "The value's type is not assignable to the type required here and no \
                 coercion applies."
            }
            ErrorCode::E2002 => "The operator is not defined for the operand types.",
            ErrorCode::E2003 => {
                "The name is neither a named object of the document nor a member of the \
                 enclosing class."
            }
            ErrorCode::E2004 => {
                "No member of the receiver's type matches the name and argument count. \
                 Properties are found through `nameProperty()`, `getName()`/`isName()` or \
                 a field."
            }
            ErrorCode::E2005 => {
                "More than one overload accepts the argument types and none matches \
                 exactly. Ambiguity is an error; no most-specific candidate is chosen."
            }
            ErrorCode::E2006 => "The path has no setter or writable property, so it cannot be assigned.",
            ErrorCode::E3001 => {
                "The expression reads a reactive value, but the target slot is not \
                 observable and cannot host a live binding."
            }
            ErrorCode::E3002 => {
                "A bidirectional binding must be a single writable property path ending \
                 in a reactive property."
            }
            ErrorCode::E9001 => "Internal compiler error. Please report it with the expression text.",
            ErrorCode::E9002 => "Compilation stopped after reaching the error limit.",
        }
    }

    /// Check if this is a lexer error (E0xxx range).
    pub fn is_lexer_error(&self) -> bool {
        self.as_str().starts_with("E0")
    }

    /// Check if this is a syntax error (E0xxx or E1xxx range).
    pub fn is_parser_error(&self) -> bool {
        self.is_lexer_error() || self.as_str().starts_with("E1")
    }

    /// Check if this is a resolution or type error (E2xxx range).
    pub fn is_type_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    /// Check if this is a binding error (E3xxx range).
    pub fn is_binding_error(&self) -> bool {
        self.as_str().starts_with("E3")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = String;

    /// Parse a code, case-insensitively (`e2005` works).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown error code `{s}`"))
    }
}

#[cfg(test)]
mod tests;
