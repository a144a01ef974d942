//! Assignability and the conversions it implies.
//!
//! A value of type `from` is assignable to `to` under identity, reference
//! widening (`null`, subclass, `Object`), primitive widening, boxing and
//! unboxing, and array-component compatibility. Boxing and reference
//! widening are free at runtime; widening and unboxing need a conversion.

use bind_ir::{Conversion, Prim, Type};
use smallvec::{smallvec, SmallVec};

use crate::registry::ClassRegistry;

/// Conversions applied, in order, to a value on the stack.
pub type Coercion = SmallVec<[Conversion; 2]>;

/// Conversion path from `from` to `to`, or `None` when not assignable.
pub fn coercion(from: &Type, to: &Type, registry: &ClassRegistry) -> Option<Coercion> {
    if from == to {
        return Some(Coercion::new());
    }
    match (from, to) {
        (Type::Void, _) | (_, Type::Void | Type::Null) => None,
        (Type::Null, _) => to.is_reference().then(Coercion::new),
        (_, Type::Object) => Some(Coercion::new()),
        (Type::Prim(p), Type::Prim(q)) if p.widens_to(*q) => {
            Some(smallvec![Conversion::Widen { from: *p, to: *q }])
        }
        (Type::Prim(p), Type::Boxed(q)) if p == q => Some(Coercion::new()),
        (Type::Boxed(p), Type::Prim(q)) if p == q => Some(smallvec![Conversion::Unbox(*p)]),
        (Type::Boxed(p), Type::Prim(q)) if p.widens_to(*q) => Some(smallvec![
            Conversion::Unbox(*p),
            Conversion::Widen { from: *p, to: *q }
        ]),
        (Type::Class(a), Type::Class(b)) if registry.is_subclass(*a, *b) => Some(Coercion::new()),
        (Type::Array(a), Type::Array(b)) if a.is_reference() && b.is_reference() => {
            coercion(a, b, registry).filter(SmallVec::is_empty)
        }
        (
            Type::Observable { value: a, .. },
            Type::Observable {
                value: b,
                writable: false,
            },
        ) if a == b => Some(Coercion::new()),
        _ => None,
    }
}

pub fn is_assignable(from: &Type, to: &Type, registry: &ClassRegistry) -> bool {
    coercion(from, to, registry).is_some()
}

/// Conversion into a target slot of type `to`: assignability, then string
/// conversion when the slot holds a `String`.
pub fn slot_coercion(from: &Type, to: &Type, registry: &ClassRegistry) -> Option<Coercion> {
    coercion(from, to, registry).or_else(|| {
        (*to == Type::Str && *from != Type::Void).then(|| smallvec![Conversion::ToStr])
    })
}

/// Conversions bringing a primitive or boxed operand to `to` for an
/// operator. Callers guarantee `from` has a primitive view.
pub fn operand_coercion(from: &Type, to: Prim) -> Coercion {
    let mut out = Coercion::new();
    let prim = match from {
        Type::Boxed(p) => {
            out.push(Conversion::Unbox(*p));
            *p
        }
        Type::Prim(p) => *p,
        _ => return out,
    };
    if prim != to {
        out.push(Conversion::Widen { from: prim, to });
    }
    out
}
