//! Expression AST.
//!
//! A tagged variant over literals, identifiers, member access, indexing,
//! calls, operators, ternaries, collection literals and template strings.
//! Nodes are immutable once parsed and reference their children through
//! `ExprId` indices into an [`ExprArena`](crate::ExprArena).

mod operators;

use std::fmt;

pub use operators::{BinaryOp, UnaryOp};

use crate::{ExprId, ExprRange, Name, Span, Spanned};

/// Expression node.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        self.span
    }
}

/// One interpolation segment of a template string.
///
/// Represents `{expr}text_after`; the text before the first segment is the
/// template's `head`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TemplatePart {
    pub expr: ExprId,
    pub text_after: Name,
}

/// Range of template parts in the arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct TemplatePartRange {
    pub start: u32,
    pub len: u16,
}

impl TemplatePartRange {
    pub const EMPTY: TemplatePartRange = TemplatePartRange { start: 0, len: 0 };

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Expression variants.
///
/// Float literals are stored as raw bits so the node stays `Eq + Hash`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    // Literals
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(u32),
    Double(u64),
    Char(char),
    Str(Name),

    /// Free identifier, resolved through the scope.
    Ident(Name),
    /// The enclosing instance.
    This,

    /// Property-style access: `receiver.name`
    Field { receiver: ExprId, name: Name },
    /// Indexed access: `receiver[index]`
    Index { receiver: ExprId, index: ExprId },
    /// Method call with explicit receiver: `receiver.method(args)`
    MethodCall {
        receiver: ExprId,
        method: Name,
        args: ExprRange,
    },
    /// Call with implicit receiver: `method(args)`
    Call { func: Name, args: ExprRange },

    Unary { op: UnaryOp, operand: ExprId },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    /// `cond ? then_expr : else_expr`
    Ternary {
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
    },

    /// Untyped collection literal: `[a, b, c]`
    Collection(ExprRange),
    /// Template string: `` `head{expr}text...` ``
    Template {
        head: Name,
        parts: TemplatePartRange,
    },
}

impl ExprKind {
    /// Whether this node is a literal constant.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            ExprKind::Null
                | ExprKind::Bool(_)
                | ExprKind::Int(_)
                | ExprKind::Long(_)
                | ExprKind::Float(_)
                | ExprKind::Double(_)
                | ExprKind::Char(_)
                | ExprKind::Str(_)
        )
    }
}
