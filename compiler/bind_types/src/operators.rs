//! Operator and conditional typing.
//!
//! Shared by the checker (to type nodes) and the continuation compiler (to
//! pick operand kinds and insert conversions), so both agree by
//! construction.

use bind_ir::{BinaryOp, Prim, Type, UnaryOp};

use crate::assign::coercion;
use crate::registry::ClassRegistry;

/// How a binary operator applies to its operands.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BinaryTyping {
    /// String concatenation (`+` with a `String` side).
    Concat,
    /// Both operands converted to `operand`; yields `result`.
    Primitive { operand: Prim, result: Prim },
    /// Reference (identity) equality.
    Reference,
}

impl BinaryTyping {
    pub fn result_type(self) -> Type {
        match self {
            BinaryTyping::Concat => Type::Str,
            BinaryTyping::Primitive { result, .. } => Type::Prim(result),
            BinaryTyping::Reference => Type::BOOLEAN,
        }
    }
}

/// Type a binary operator over operand value types.
pub fn binary_typing(op: BinaryOp, left: &Type, right: &Type) -> Option<BinaryTyping> {
    use BinaryOp::{Add, And, BitAnd, BitOr, BitXor, Eq, NotEq, Or, Shl, Shr};

    if op == Add && (*left == Type::Str || *right == Type::Str) {
        let void = *left == Type::Void || *right == Type::Void;
        return (!void).then_some(BinaryTyping::Concat);
    }

    let numeric = left.numeric().zip(right.numeric());
    let booleans = left.is_boolean_like() && right.is_boolean_like();
    let primitive = |operand: Prim, result: Prim| Some(BinaryTyping::Primitive { operand, result });

    match op {
        And | Or => booleans.then_some(BinaryTyping::Primitive {
            operand: Prim::Boolean,
            result: Prim::Boolean,
        }),
        BitAnd | BitOr | BitXor => {
            if booleans {
                return primitive(Prim::Boolean, Prim::Boolean);
            }
            let (a, b) = numeric.filter(|(a, b)| a.is_integral() && b.is_integral())?;
            let p = Prim::promote(a, b);
            primitive(p, p)
        }
        Shl | Shr => {
            let (a, _) = numeric.filter(|(a, b)| a.is_integral() && b.is_integral())?;
            let p = a.promote_unary();
            primitive(p, p)
        }
        Eq | NotEq => {
            if let Some((a, b)) = numeric {
                // boxed == boxed compares identity
                if left.is_reference() && right.is_reference() {
                    return Some(BinaryTyping::Reference);
                }
                return primitive(Prim::promote(a, b), Prim::Boolean);
            }
            if booleans {
                if left.is_reference() && right.is_reference() {
                    return Some(BinaryTyping::Reference);
                }
                return primitive(Prim::Boolean, Prim::Boolean);
            }
            let references = left.is_reference() && right.is_reference();
            references.then_some(BinaryTyping::Reference)
        }
        _ if op.is_relational() => {
            let (a, b) = numeric?;
            primitive(Prim::promote(a, b), Prim::Boolean)
        }
        _ => {
            let (a, b) = numeric?;
            let p = Prim::promote(a, b);
            primitive(p, p)
        }
    }
}

/// Type a unary operator: the promoted operand primitive, which is also
/// the result.
pub fn unary_typing(op: UnaryOp, operand: &Type) -> Option<Prim> {
    match op {
        UnaryOp::Not => operand.is_boolean_like().then_some(Prim::Boolean),
        UnaryOp::Neg => operand.numeric().map(Prim::promote_unary),
        UnaryOp::BitNot => operand
            .numeric()
            .filter(|p| p.is_integral())
            .map(Prim::promote_unary),
    }
}

/// Result type of `cond ? a : b`.
pub fn conditional_type(a: &Type, b: &Type, registry: &ClassRegistry) -> Option<Type> {
    if a == b {
        return Some(a.clone());
    }
    if *a == Type::Void || *b == Type::Void {
        return None;
    }
    if a.is_boolean_like() && b.is_boolean_like() {
        return Some(Type::BOOLEAN);
    }
    if let Some((p, q)) = a.numeric().zip(b.numeric()) {
        return Some(Type::Prim(Prim::promote(p, q)));
    }
    match (a, b) {
        (Type::Null, Type::Prim(p)) | (Type::Prim(p), Type::Null) => Some(Type::Boxed(*p)),
        (Type::Null, other) | (other, Type::Null) => Some(other.clone()),
        _ if free_widening(a, b, registry) => Some(b.clone()),
        _ if free_widening(b, a, registry) => Some(a.clone()),
        _ => Some(Type::Object),
    }
}

fn free_widening(from: &Type, to: &Type, registry: &ClassRegistry) -> bool {
    to.is_reference() && coercion(from, to, registry).is_some_and(|c| c.is_empty())
}
