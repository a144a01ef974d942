//! Property-style member access.
//!
//! `recv.name` resolves through a fixed naming convention, first match wins:
//!
//! 1. `nameProperty()` returning an observable: a reactive property,
//!    writable when the model is a writable `Property<T>` or, for a
//!    read-only model, when a `setName` setter exists. Writes then go
//!    through the setter.
//! 2. `getName()`, or `isName()` returning `boolean`: a plain getter.
//! 3. A field named `name`.
//! 4. `length` on arrays.

use bind_ir::{ClassId, Emitter, FieldId, MethodId, Name, Op, Prim, Program, StringInterner, Type};
use rustc_hash::FxHashSet;

use crate::registry::ClassRegistry;

/// How a resolved property is read.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum PropertyAccess {
    /// `nameProperty()` yields the observable model. `setter` is only
    /// recorded when the model itself is read-only.
    Reactive {
        model: MethodId,
        setter: Option<MethodId>,
    },
    Getter {
        getter: MethodId,
        setter: Option<MethodId>,
    },
    Field(FieldId),
    ArrayLength,
}

/// A property resolved on a receiver type.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Property {
    pub access: PropertyAccess,
    /// Declared type; an observable for reactive properties.
    pub ty: Type,
    /// Whether assignment through this access site is legal.
    pub writable: bool,
}

impl Property {
    pub fn is_reactive(&self) -> bool {
        self.ty.is_observable()
    }

    /// Setter that writes to a reactive property whose model is read-only.
    pub fn reactive_setter(&self) -> Option<MethodId> {
        match self.access {
            PropertyAccess::Reactive { setter, .. } => setter,
            _ => None,
        }
    }

    /// Emit the ops that turn a receiver on the stack into the property.
    pub fn emit_accessor(&self, e: &mut Emitter) {
        match &self.access {
            PropertyAccess::Reactive { model: method, .. }
            | PropertyAccess::Getter { getter: method, .. } => e.emit(Op::Call {
                method: *method,
                argc: 0,
            }),
            PropertyAccess::Field(field) => e.emit(Op::GetField(*field)),
            PropertyAccess::ArrayLength => e.emit(Op::ArrayLength),
        }
    }

    pub fn accessor_program(&self) -> Program {
        let mut e = Emitter::new();
        self.emit_accessor(&mut e);
        e.finish()
    }
}

/// Resolve `name` on a receiver of type `receiver` (already read through
/// any observable).
pub fn resolve_property(
    registry: &ClassRegistry,
    receiver: &Type,
    name: Name,
    interner: &StringInterner,
) -> Option<Property> {
    match receiver {
        Type::Class(class) => resolve_on_class(registry, *class, name, interner),
        Type::Array(_) if interner.lookup(name) == "length" => Some(Property {
            access: PropertyAccess::ArrayLength,
            ty: Type::INT,
            writable: false,
        }),
        _ => None,
    }
}

fn resolve_on_class(
    registry: &ClassRegistry,
    class: ClassId,
    name: Name,
    interner: &StringInterner,
) -> Option<Property> {
    let text = interner.lookup(name);
    let capitalized = capitalize(text);
    let setter = interner
        .get(&format!("set{capitalized}"))
        .and_then(|set| zero_or_one(registry, class, set, 1));

    if let Some(model) = interner
        .get(&format!("{text}Property"))
        .and_then(|n| zero_or_one(registry, class, n, 0))
    {
        let ret = &registry.method(model).ret;
        if let Type::Observable { value, writable } = ret {
            let setter = setter.filter(|_| !*writable);
            let writable = *writable || setter.is_some();
            return Some(Property {
                access: PropertyAccess::Reactive { model, setter },
                ty: Type::Observable {
                    value: value.clone(),
                    writable,
                },
                writable,
            });
        }
    }

    let getter = interner
        .get(&format!("get{capitalized}"))
        .and_then(|n| zero_or_one(registry, class, n, 0))
        .or_else(|| {
            interner
                .get(&format!("is{capitalized}"))
                .and_then(|n| zero_or_one(registry, class, n, 0))
                .filter(|&m| registry.method(m).ret.unboxed() == Some(Prim::Boolean))
        });
    if let Some(getter) = getter {
        return Some(Property {
            access: PropertyAccess::Getter { getter, setter },
            ty: registry.method(getter).ret.clone(),
            writable: setter.is_some(),
        });
    }

    registry.lookup_field(class, name).map(|field| Property {
        access: PropertyAccess::Field(field.id),
        writable: matches!(field.ty, Type::Observable { writable: true, .. }),
        ty: field.ty.clone(),
    })
}

/// Every property name visible on `class`, in declaration order,
/// nearest class first.
pub fn property_names(
    registry: &ClassRegistry,
    class: ClassId,
    interner: &StringInterner,
) -> Vec<Name> {
    let mut seen = FxHashSet::default();
    let mut names = Vec::new();
    for def in registry.ancestry(class) {
        for &id in &def.fields {
            let name = registry.field(id).name;
            if seen.insert(name) {
                names.push(name);
            }
        }
        for &id in &def.methods {
            let method = registry.method(id);
            if !method.params.is_empty() {
                continue;
            }
            let text = interner.lookup(method.name);
            let stem = text
                .strip_suffix("Property")
                .filter(|_| method.ret.is_observable())
                .map(str::to_owned)
                .or_else(|| text.strip_prefix("get").and_then(decapitalize))
                .or_else(|| {
                    text.strip_prefix("is")
                        .filter(|_| method.ret.unboxed() == Some(Prim::Boolean))
                        .and_then(decapitalize)
                });
            if let Some(stem) = stem.filter(|s| !s.is_empty()) {
                let name = interner.intern(&stem);
                if seen.insert(name) {
                    names.push(name);
                }
            }
        }
    }
    names
}

/// The unique visible method named `name` with `arity` parameters.
fn zero_or_one(registry: &ClassRegistry, class: ClassId, name: Name, arity: usize) -> Option<MethodId> {
    let mut found = registry
        .methods_named(class, name)
        .into_iter()
        .filter(|m| m.params.len() == arity);
    let first = found.next()?;
    found.next().is_none().then_some(first.id)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `Name` -> `name`; `None` unless the stem starts with an uppercase letter.
fn decapitalize(s: &str) -> Option<String> {
    let mut chars = s.chars();
    let first = chars.next().filter(char::is_ascii_uppercase)?;
    Some(first.to_lowercase().chain(chars).collect())
}

#[cfg(test)]
mod tests;
