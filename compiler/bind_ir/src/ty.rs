//! Semantic types and host member ids.
//!
//! The type language mirrors the host object model the markup binds to:
//! primitives and their boxed forms, strings, declared classes, arrays, an
//! untyped list, and observable values (read-only or writable).

use std::fmt;

/// Id of a declared host class.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct ClassId(pub u32);

/// Id of a declared field (unique across all classes).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct FieldId(pub u32);

/// Id of a declared method (unique across all classes).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct MethodId(pub u32);

impl ClassId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl FieldId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl MethodId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Primitive types.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Prim {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl Prim {
    pub const fn name(self) -> &'static str {
        match self {
            Prim::Boolean => "boolean",
            Prim::Byte => "byte",
            Prim::Short => "short",
            Prim::Char => "char",
            Prim::Int => "int",
            Prim::Long => "long",
            Prim::Float => "float",
            Prim::Double => "double",
        }
    }

    /// Name of the boxed reference type.
    pub const fn boxed_name(self) -> &'static str {
        match self {
            Prim::Boolean => "Boolean",
            Prim::Byte => "Byte",
            Prim::Short => "Short",
            Prim::Char => "Character",
            Prim::Int => "Integer",
            Prim::Long => "Long",
            Prim::Float => "Float",
            Prim::Double => "Double",
        }
    }

    pub const fn is_numeric(self) -> bool {
        !matches!(self, Prim::Boolean)
    }

    pub const fn is_integral(self) -> bool {
        matches!(self, Prim::Byte | Prim::Short | Prim::Char | Prim::Int | Prim::Long)
    }

    /// Widening primitive conversion: `self` converts to `to` without a cast.
    ///
    /// Identity is not a widening.
    pub const fn widens_to(self, to: Prim) -> bool {
        match self {
            Prim::Byte => matches!(
                to,
                Prim::Short | Prim::Int | Prim::Long | Prim::Float | Prim::Double
            ),
            Prim::Short | Prim::Char => {
                matches!(to, Prim::Int | Prim::Long | Prim::Float | Prim::Double)
            }
            Prim::Int => matches!(to, Prim::Long | Prim::Float | Prim::Double),
            Prim::Long => matches!(to, Prim::Float | Prim::Double),
            Prim::Float => matches!(to, Prim::Double),
            Prim::Double | Prim::Boolean => false,
        }
    }

    /// Rank used for binary numeric promotion.
    const fn rank(self) -> u8 {
        match self {
            Prim::Boolean => 0,
            Prim::Byte | Prim::Short | Prim::Char | Prim::Int => 1,
            Prim::Long => 2,
            Prim::Float => 3,
            Prim::Double => 4,
        }
    }

    /// Binary numeric promotion of two numeric primitives.
    ///
    /// Anything narrower than `int` promotes to `int`.
    pub fn promote(a: Prim, b: Prim) -> Prim {
        match a.rank().max(b.rank()) {
            2 => Prim::Long,
            3 => Prim::Float,
            4 => Prim::Double,
            _ => Prim::Int,
        }
    }

    /// Unary numeric promotion.
    pub fn promote_unary(self) -> Prim {
        Prim::promote(self, Prim::Int)
    }
}

/// Semantic type of an expression, member, or target slot.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Type {
    Prim(Prim),
    /// Boxed primitive (`Integer`, `Double`, ...).
    Boxed(Prim),
    Str,
    /// Top reference type.
    Object,
    /// Type of the `null` literal.
    Null,
    Void,
    Class(ClassId),
    Array(Box<Type>),
    /// Untyped list produced by collection literals.
    List,
    /// Observable value container; `writable` marks a settable property.
    Observable { value: Box<Type>, writable: bool },
}

impl Type {
    pub const INT: Type = Type::Prim(Prim::Int);
    pub const LONG: Type = Type::Prim(Prim::Long);
    pub const DOUBLE: Type = Type::Prim(Prim::Double);
    pub const BOOLEAN: Type = Type::Prim(Prim::Boolean);

    /// Read-only observable of `value`.
    pub fn observable(value: Type) -> Type {
        Type::Observable {
            value: Box::new(value),
            writable: false,
        }
    }

    /// Writable observable (property) of `value`.
    pub fn property(value: Type) -> Type {
        Type::Observable {
            value: Box::new(value),
            writable: true,
        }
    }

    pub fn array(component: Type) -> Type {
        Type::Array(Box::new(component))
    }

    pub fn is_observable(&self) -> bool {
        matches!(self, Type::Observable { .. })
    }

    /// Type of the value an expression yields once observables are read.
    pub fn value_type(&self) -> &Type {
        match self {
            Type::Observable { value, .. } => value,
            other => other,
        }
    }

    pub fn is_reference(&self) -> bool {
        !matches!(self, Type::Prim(_) | Type::Void)
    }

    /// Primitive view of a primitive or boxed type.
    pub fn unboxed(&self) -> Option<Prim> {
        match self {
            Type::Prim(p) | Type::Boxed(p) => Some(*p),
            _ => None,
        }
    }

    /// Numeric primitive view (unboxing if needed).
    pub fn numeric(&self) -> Option<Prim> {
        self.unboxed().filter(|p| p.is_numeric())
    }

    pub fn is_boolean_like(&self) -> bool {
        self.unboxed() == Some(Prim::Boolean)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Prim(p) => f.write_str(p.name()),
            Type::Boxed(p) => f.write_str(p.boxed_name()),
            Type::Str => f.write_str("String"),
            Type::Object => f.write_str("Object"),
            Type::Null => f.write_str("null"),
            Type::Void => f.write_str("void"),
            Type::Class(id) => write!(f, "class#{}", id.0),
            Type::Array(component) => write!(f, "{component}[]"),
            Type::List => f.write_str("List"),
            Type::Observable { value, writable } => {
                if *writable {
                    write!(f, "Property<{value}>")
                } else {
                    write!(f, "ObservableValue<{value}>")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
