//! Runtime errors raised while evaluating compiled programs.

/// Failure while running a program.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    #[error("null receiver in {0}")]
    NullReceiver(&'static str),

    #[error("null cannot be unboxed to {0}")]
    NullUnboxing(&'static str),

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("observable is read-only")]
    ReadOnly,

    #[error("no native body registered for method m{0}")]
    UnknownMethod(u32),

    #[error("local slot {0} is not bound")]
    UnknownLocal(u16),

    #[error("expected {expected}, found {found}")]
    TypeFault {
        expected: &'static str,
        found: &'static str,
    },

    #[error("program reads a write-back argument outside a write-back")]
    MissingArgument,

    #[error("operand stack underflow")]
    StackUnderflow,
}
