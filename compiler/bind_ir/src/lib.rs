//! Binding IR - Intermediate Representation Types
//!
//! This crate contains the core data structures shared by every phase of the
//! binding-expression compiler and by the load-time runtime:
//! - Spans for source locations
//! - Names for interned identifiers
//! - Tokens and `TokenList` for lexer output
//! - AST nodes (`Expr`, `ExprKind`) stored in a flat `ExprArena`
//! - Semantic types (`Type`, `Prim`) and host member ids
//! - Emitted code (`Op`, `Program`, `Emitter`) and dependency `Step`s
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: Strings → Name(u32)
//! - **Flatten Everything**: No Box<Expr>, use ExprId(u32) indices
//! - **Structural Code**: emitted programs are plain data with `Eq + Hash`,
//!   so two emissions of the same access path compare equal.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
pub mod ast;
pub mod code;
mod expr_id;
mod interner;
mod name;
mod span;
mod token;
mod ty;

pub use arena::ExprArena;
pub use ast::{BinaryOp, Expr, ExprKind, TemplatePart, TemplatePartRange, UnaryOp};
pub use code::{
    BuiltinMethod, Constant, Conversion, Emitter, Label, Op, OperandKind, Program, Step,
};
pub use expr_id::{ExprId, ExprRange};
pub use interner::StringInterner;
pub use name::Name;
pub use span::{Span, SpanError};
pub use token::{Token, TokenKind, TokenList};
pub use ty::{ClassId, FieldId, MethodId, Prim, Type};

/// Trait for types that carry a source span.
pub trait Spanned {
    fn span(&self) -> Span;
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{ExprId, Span};
    crate::static_assert_size!(Span, 8);
    crate::static_assert_size!(ExprId, 4);
}
