//! Declared host classes.
//!
//! The object-graph compiler describes the enclosing declaration and every
//! type reachable from it: classes with an optional superclass, fields and
//! methods. Ids are dense indices; member ids are unique across classes so
//! emitted code can name a member without its class.

use bind_ir::{ClassId, FieldId, MethodId, Name, StringInterner, Type};
use rustc_hash::FxHashMap;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClassDef {
    pub id: ClassId,
    pub name: Name,
    pub superclass: Option<ClassId>,
    pub fields: Vec<FieldId>,
    pub methods: Vec<MethodId>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldDef {
    pub id: FieldId,
    pub owner: ClassId,
    pub name: Name,
    pub ty: Type,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MethodDef {
    pub id: MethodId,
    pub owner: ClassId,
    pub name: Name,
    pub params: Vec<Type>,
    pub ret: Type,
}

/// All declared classes and their members.
#[derive(Clone, Debug, Default)]
pub struct ClassRegistry {
    classes: Vec<ClassDef>,
    fields: Vec<FieldDef>,
    methods: Vec<MethodDef>,
    by_name: FxHashMap<Name, ClassId>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(&mut self, name: Name, superclass: Option<ClassId>) -> ClassId {
        let id = ClassId(dense_id(self.classes.len()));
        self.classes.push(ClassDef {
            id,
            name,
            superclass,
            fields: Vec::new(),
            methods: Vec::new(),
        });
        self.by_name.insert(name, id);
        id
    }

    pub fn add_field(&mut self, owner: ClassId, name: Name, ty: Type) -> FieldId {
        let id = FieldId(dense_id(self.fields.len()));
        self.fields.push(FieldDef {
            id,
            owner,
            name,
            ty,
        });
        self.classes[owner.index()].fields.push(id);
        id
    }

    pub fn add_method(&mut self, owner: ClassId, name: Name, params: Vec<Type>, ret: Type) -> MethodId {
        let id = MethodId(dense_id(self.methods.len()));
        self.methods.push(MethodDef {
            id,
            owner,
            name,
            params,
            ret,
        });
        self.classes[owner.index()].methods.push(id);
        id
    }

    #[inline]
    pub fn class(&self, id: ClassId) -> &ClassDef {
        &self.classes[id.index()]
    }

    #[inline]
    pub fn field(&self, id: FieldId) -> &FieldDef {
        &self.fields[id.index()]
    }

    #[inline]
    pub fn method(&self, id: MethodId) -> &MethodDef {
        &self.methods[id.index()]
    }

    pub fn class_by_name(&self, name: Name) -> Option<ClassId> {
        self.by_name.get(&name).copied()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    /// `class` followed by its superclasses, nearest first.
    pub fn ancestry(&self, class: ClassId) -> impl Iterator<Item = &ClassDef> {
        let mut next = Some(class);
        std::iter::from_fn(move || {
            let current = self.class(next?);
            next = current.superclass;
            Some(current)
        })
    }

    /// Whether `sub` is `sup` or inherits from it.
    pub fn is_subclass(&self, sub: ClassId, sup: ClassId) -> bool {
        self.ancestry(sub).any(|c| c.id == sup)
    }

    /// Nearest field named `name`.
    pub fn lookup_field(&self, class: ClassId, name: Name) -> Option<&FieldDef> {
        self.ancestry(class)
            .flat_map(|c| c.fields.iter())
            .map(|&id| self.field(id))
            .find(|f| f.name == name)
    }

    /// Every visible method named `name`; a subclass method hides a
    /// superclass method with the same parameter list.
    pub fn methods_named(&self, class: ClassId, name: Name) -> Vec<&MethodDef> {
        let mut found: Vec<&MethodDef> = Vec::new();
        for def in self.ancestry(class) {
            for &id in &def.methods {
                let method = self.method(id);
                if method.name == name && !found.iter().any(|m| m.params == method.params) {
                    found.push(method);
                }
            }
        }
        found
    }

    /// Names of every field and method visible on `class`, for suggestions.
    pub fn member_names(&self, class: ClassId) -> Vec<Name> {
        let mut names = Vec::new();
        for def in self.ancestry(class) {
            names.extend(def.fields.iter().map(|&id| self.field(id).name));
            names.extend(def.methods.iter().map(|&id| self.method(id).name));
        }
        names
    }

    /// Render a type with class names instead of ids.
    pub fn display_type(&self, ty: &Type, interner: &StringInterner) -> String {
        match ty {
            Type::Class(id) => self
                .classes
                .get(id.index())
                .map_or_else(|| ty.to_string(), |c| interner.lookup(c.name).to_string()),
            Type::Array(component) => format!("{}[]", self.display_type(component, interner)),
            Type::Observable { value, writable } => {
                let inner = self.display_type(value, interner);
                if *writable {
                    format!("Property<{inner}>")
                } else {
                    format!("ObservableValue<{inner}>")
                }
            }
            other => other.to_string(),
        }
    }
}

fn dense_id(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("host model exceeded u32::MAX entries"))
}

#[cfg(test)]
mod tests;
