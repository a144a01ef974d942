//! Host model builder.
//!
//! Declares the classes a document binds to and supplies their method
//! bodies, keeping the class registry (compile time) and the native table
//! (run time) in step. Convention properties are backed by one
//! [`SimpleProperty`] per (instance, property), created on first access.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use bind_compile::BindingUnit;
use bind_ir::{ClassId, FieldId, MethodId, Prim, StringInterner, Type};
use bind_runtime::{
    BeanId, BindingDelegate, EvalEnv, Heap, NativeTable, ObjRef, ObservableRef, ReadOnlyView,
    RuntimeError, SimpleProperty, Value,
};
use bind_types::ClassRegistry;
use rustc_hash::FxHashMap;

/// Per-instance property storage.
#[derive(Default)]
struct PropertyModels {
    models: RefCell<FxHashMap<(BeanId, MethodId), ObservableRef>>,
}

impl PropertyModels {
    fn model(&self, bean: BeanId, method: MethodId, ty: &Type) -> ObservableRef {
        self.models
            .borrow_mut()
            .entry((bean, method))
            .or_insert_with(|| SimpleProperty::shared(default_value(ty)))
            .clone()
    }
}

/// Initial value of a property of type `ty`.
fn default_value(ty: &Type) -> Value {
    match ty {
        Type::Prim(Prim::Boolean) => Value::Bool(false),
        Type::Prim(Prim::Char) => Value::Char('\0'),
        Type::Prim(Prim::Byte | Prim::Short | Prim::Int) => Value::Int(0),
        Type::Prim(Prim::Long) => Value::Long(0),
        Type::Prim(Prim::Float) => Value::Float(0.0),
        Type::Prim(Prim::Double) => Value::Double(0.0),
        _ => Value::Null,
    }
}

pub struct HostBuilder {
    interner: StringInterner,
    registry: ClassRegistry,
    natives: NativeTable,
    models: Rc<PropertyModels>,
}

impl Default for HostBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HostBuilder {
    pub fn new() -> Self {
        HostBuilder {
            interner: StringInterner::new(),
            registry: ClassRegistry::new(),
            natives: NativeTable::new(),
            models: Rc::new(PropertyModels::default()),
        }
    }

    pub fn class(&mut self, name: &str, superclass: Option<ClassId>) -> ClassId {
        self.registry
            .add_class(self.interner.intern(name), superclass)
    }

    pub fn field(&mut self, class: ClassId, name: &str, ty: Type) -> FieldId {
        self.registry
            .add_field(class, self.interner.intern(name), ty)
    }

    /// Declare a method together with its body.
    pub fn method(
        &mut self,
        class: ClassId,
        name: &str,
        params: Vec<Type>,
        ret: Type,
        body: impl Fn(&Value, &[Value]) -> Result<Value, RuntimeError> + 'static,
    ) -> MethodId {
        let id = self
            .registry
            .add_method(class, self.interner.intern(name), params, ret);
        self.natives.register(id, body);
        id
    }

    /// Declare a writable property `name` of type `ty`: `nameProperty()`
    /// returning `Property<ty>`.
    pub fn property(&mut self, class: ClassId, name: &str, ty: Type) -> MethodId {
        self.observable_property(class, name, ty, true)
    }

    /// Declare a read-only observable `name`: `nameProperty()` returning
    /// `ObservableValue<ty>`. Host code still writes it through
    /// [`HostModel::property`].
    pub fn read_only_property(&mut self, class: ClassId, name: &str, ty: Type) -> MethodId {
        self.observable_property(class, name, ty, false)
    }

    fn observable_property(&mut self, class: ClassId, name: &str, ty: Type, writable: bool) -> MethodId {
        let ret = if writable {
            Type::property(ty.clone())
        } else {
            Type::observable(ty.clone())
        };
        let accessor = self.interner.intern(&format!("{name}Property"));
        let id = self.registry.add_method(class, accessor, Vec::new(), ret);
        let models = Rc::clone(&self.models);
        self.natives.register(id, move |this, _| {
            let Value::Object(obj) = this else {
                return Err(RuntimeError::NullReceiver("property access"));
            };
            let model = models.model(obj.id(), id, &ty);
            Ok(Value::Observable(if writable {
                model
            } else {
                ObservableRef::new(ReadOnlyView(model))
            }))
        });
        id
    }

    /// Declare a plain getter `getName()` reading `field`.
    pub fn getter(&mut self, class: ClassId, name: &str, field: FieldId, ty: Type) -> MethodId {
        let getter = format!("get{}", capitalize(name));
        self.method(class, &getter, Vec::new(), ty, move |this, _| match this {
            Value::Object(obj) => Ok(obj.get_field(field)),
            _ => Err(RuntimeError::NullReceiver("getter")),
        })
    }

    /// Declare `setName(ty)` storing into the model that `model`
    /// (`nameProperty()`) exposes, typically a read-only one.
    pub fn setter(&mut self, class: ClassId, name: &str, model: MethodId, ty: Type) -> MethodId {
        let setter = format!("set{}", capitalize(name));
        let models = Rc::clone(&self.models);
        let value_type = ty.clone();
        self.method(class, &setter, vec![ty], Type::Void, move |this, args| {
            let Value::Object(obj) = this else {
                return Err(RuntimeError::NullReceiver("setter"));
            };
            let [value] = args else {
                return Err(RuntimeError::MissingArgument);
            };
            models
                .model(obj.id(), model, &value_type)
                .set_value(value.clone())?;
            Ok(Value::Null)
        })
    }

    pub fn build(self) -> HostModel {
        HostModel {
            interner: self.interner,
            registry: self.registry,
            natives: Rc::new(self.natives),
            models: self.models,
            heap: Heap::new(),
        }
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// A finished host model: what the compiler resolves against and what the
/// runtime calls into.
pub struct HostModel {
    interner: StringInterner,
    registry: ClassRegistry,
    natives: Rc<NativeTable>,
    models: Rc<PropertyModels>,
    heap: Heap,
}

impl HostModel {
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    pub fn natives(&self) -> &Rc<NativeTable> {
        &self.natives
    }

    pub fn class_named(&self, name: &str) -> Option<ClassId> {
        self.registry.class_by_name(self.interner.get(name)?)
    }

    pub fn instantiate(&self, class: ClassId) -> ObjRef {
        self.heap.alloc(class)
    }

    /// Writable model behind the convention property `name` of `obj`.
    pub fn property(&self, obj: &ObjRef, name: &str) -> Option<ObservableRef> {
        let accessor = self.interner.get(&format!("{name}Property"))?;
        let method = self
            .registry
            .methods_named(obj.class(), accessor)
            .into_iter()
            .find(|m| m.params.is_empty())?;
        Some(self.models.model(obj.id(), method.id, method.ret.value_type()))
    }

    /// Evaluation environment with `this` bound to `this`.
    pub fn env(&self, this: &ObjRef) -> EvalEnv {
        EvalEnv::new(Value::Object(Rc::clone(this)), Rc::clone(&self.natives))
    }

    /// Attached delegate for `unit` on the instance `this`.
    pub fn delegate(&self, unit: &Rc<BindingUnit>, this: &ObjRef) -> BindingDelegate {
        let delegate = BindingDelegate::new(Rc::clone(unit), self.env(this));
        delegate.attach();
        delegate
    }
}

impl fmt::Debug for HostModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostModel")
            .field("classes", &self.registry.class_count())
            .field("methods", &self.registry.method_count())
            .field("natives", &self.natives.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
