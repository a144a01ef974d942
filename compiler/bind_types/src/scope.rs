//! Scope resolution.
//!
//! A [`Scope`] maps every identifier addressable at an expression's
//! evaluation site to a [`Loadable`]: its semantic type plus the emission
//! units that leave exactly one value of that type on the stack. The scope
//! is built once per enclosing declaration and is read-only afterwards.

use std::fmt;
use std::rc::Rc;

use bind_ir::{ClassId, Emitter, MethodId, Name, Op, Program, StringInterner, Type};
use rustc_hash::FxHashMap;

use crate::property::{property_names, resolve_property};
use crate::registry::ClassRegistry;

/// An emission unit invoked at code-generation time.
pub type Emit = Rc<dyn Fn(&mut Emitter)>;

/// Typed access descriptor for one identifier.
///
/// The load is split into the *owner* (the object the value hangs off, if
/// any) and the *access* applied to it, so a reactive load can be
/// re-resolved as an (owner, accessor) dependency pair.
#[derive(Clone)]
pub struct Loadable {
    pub ty: Type,
    pub owner: Option<Emit>,
    pub access: Emit,
    pub writable: bool,
    /// Called on the owner to write a read-only reactive model.
    pub setter: Option<MethodId>,
}

impl Loadable {
    pub fn emit(&self, e: &mut Emitter) {
        if let Some(owner) = &self.owner {
            owner(e);
        }
        (self.access)(e);
    }

    pub fn owner_program(&self) -> Option<Program> {
        self.owner.as_ref().map(|owner| {
            let mut e = Emitter::new();
            owner(&mut e);
            e.finish()
        })
    }

    pub fn access_program(&self) -> Program {
        let mut e = Emitter::new();
        (self.access)(&mut e);
        e.finish()
    }
}

impl fmt::Debug for Loadable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loadable")
            .field("ty", &self.ty)
            .field("owner", &self.owner_program())
            .field("access", &self.access_program())
            .field("writable", &self.writable)
            .field("setter", &self.setter)
            .finish()
    }
}

fn load_this(e: &mut Emitter) {
    e.emit(Op::LoadThis);
}

/// Identifiers visible at one evaluation site.
#[derive(Clone, Debug)]
pub struct Scope {
    this_class: ClassId,
    entries: FxHashMap<Name, Loadable>,
    order: Vec<Name>,
}

impl Scope {
    /// Scope of an expression inside an instance of `this_class`: every
    /// field and convention property of the class and its superclasses.
    #[tracing::instrument(level = "trace", skip_all, fields(class = this_class.0))]
    pub fn new(registry: &ClassRegistry, this_class: ClassId, interner: &StringInterner) -> Self {
        let mut scope = Scope {
            this_class,
            entries: FxHashMap::default(),
            order: Vec::new(),
        };
        let receiver = Type::Class(this_class);
        for name in property_names(registry, this_class, interner) {
            let Some(property) = resolve_property(registry, &receiver, name, interner) else {
                continue;
            };
            let ty = property.ty.clone();
            let writable = property.writable;
            let setter = property.reactive_setter();
            let owner: Emit = Rc::new(load_this);
            let access: Emit = Rc::new(move |e: &mut Emitter| property.emit_accessor(e));
            scope.insert(
                name,
                Loadable {
                    ty,
                    owner: Some(owner),
                    access,
                    writable,
                    setter,
                },
            );
        }
        tracing::trace!(entries = scope.order.len(), "scope built");
        scope
    }

    /// Add a named entry loading local `slot`; shadows any member.
    pub fn insert_named(&mut self, name: Name, slot: u16, ty: Type) {
        let writable = matches!(ty, Type::Observable { writable: true, .. });
        self.insert(
            name,
            Loadable {
                ty,
                owner: None,
                access: Rc::new(move |e: &mut Emitter| e.emit(Op::LoadLocal(slot))),
                writable,
                setter: None,
            },
        );
    }

    fn insert(&mut self, name: Name, loadable: Loadable) {
        if self.entries.insert(name, loadable).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: Name) -> Option<&Loadable> {
        self.entries.get(&name)
    }

    pub fn this_class(&self) -> ClassId {
        self.this_class
    }

    /// The enclosing instance.
    pub fn this(&self) -> Loadable {
        Loadable {
            ty: Type::Class(self.this_class),
            owner: None,
            access: Rc::new(load_this),
            writable: false,
            setter: None,
        }
    }

    /// Bound names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = Name> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests;
