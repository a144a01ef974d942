#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::heap::{Heap, ObjRef};
use crate::native::NativeTable;
use crate::observable::SimpleProperty;
use bind_compile::{compile_expression, BindingMode, CompiledExpr, TargetSlot};
use bind_ir::{ClassId, FieldId, MethodId, StringInterner, Type};
use bind_types::{ClassRegistry, Scope};
use pretty_assertions::assert_eq;

/// `View { countProperty(): Property<int>; personProperty(): ObservableValue<Person>;
/// tick(int): int }` with `tick` counting its calls,
/// `Person { nameModel: Property<String>; nameProperty(): Property<String> }`.
struct Fixture {
    interner: StringInterner,
    registry: ClassRegistry,
    scope: Scope,
    heap: Heap,
    view: ObjRef,
    count: ObservableRef,
    person: ObservableRef,
    natives: Rc<NativeTable>,
    ticks: Rc<Cell<u32>>,
}

const NAME_MODEL: FieldId = FieldId(0);

fn fixture() -> Fixture {
    let interner = StringInterner::new();
    let mut registry = ClassRegistry::new();
    let view_class = registry.add_class(interner.intern("View"), None);
    let person_class = registry.add_class(interner.intern("Person"), None);
    let count_m = registry.add_method(
        view_class,
        interner.intern("countProperty"),
        vec![],
        Type::property(Type::INT),
    );
    let person_m = registry.add_method(
        view_class,
        interner.intern("personProperty"),
        vec![],
        Type::observable(Type::Class(person_class)),
    );
    let model = registry.add_field(
        person_class,
        interner.intern("nameModel"),
        Type::property(Type::Str),
    );
    let name_m = registry.add_method(
        person_class,
        interner.intern("nameProperty"),
        vec![],
        Type::property(Type::Str),
    );
    assert_eq!((count_m, person_m, name_m, model), (MethodId(0), MethodId(1), MethodId(2), NAME_MODEL));
    let tick_m = registry.add_method(view_class, interner.intern("tick"), vec![Type::INT], Type::INT);

    let count = SimpleProperty::shared(Value::Int(41));
    let person = SimpleProperty::shared(Value::Null);
    let mut natives = NativeTable::new();
    let c = count.clone();
    natives.register(count_m, move |_, _| Ok(Value::Observable(c.clone())));
    let p = person.clone();
    natives.register(person_m, move |_, _| Ok(Value::Observable(p.clone())));
    let ticks = Rc::new(Cell::new(0));
    let t = Rc::clone(&ticks);
    natives.register(tick_m, move |_, args| {
        t.set(t.get() + 1);
        args.first().cloned().ok_or(RuntimeError::MissingArgument)
    });
    natives.register(name_m, |this, _| match this {
        Value::Object(obj) => Ok(obj.get_field(NAME_MODEL)),
        other => Err(RuntimeError::TypeFault {
            expected: "object",
            found: other.kind_name(),
        }),
    });

    let heap = Heap::new();
    let view = heap.alloc(view_class);
    let scope = Scope::new(&registry, view_class, &interner);
    Fixture {
        interner,
        registry,
        scope,
        heap,
        view,
        count,
        person,
        natives: Rc::new(natives),
        ticks,
    }
}

impl Fixture {
    fn delegate(&self, source: &str, slot: Type, mode: BindingMode) -> BindingDelegate {
        let compiled = compile_expression(
            source,
            &TargetSlot::new(slot),
            mode,
            &self.scope,
            &self.registry,
            &self.interner,
        )
        .unwrap();
        let CompiledExpr::Binding(unit) = compiled else {
            panic!("`{source}` compiled to a constant");
        };
        let env = EvalEnv::new(Value::Object(Rc::clone(&self.view)), Rc::clone(&self.natives));
        let delegate = BindingDelegate::new(unit, env);
        delegate.attach();
        delegate
    }

    fn new_person(&self, name: &str) -> ObjRef {
        let obj = self.heap.alloc(ClassId(1));
        obj.set_field(NAME_MODEL, Value::Observable(SimpleProperty::shared(Value::str(name))));
        obj
    }
}

fn name_model(person: &ObjRef) -> ObservableRef {
    match person.get_field(NAME_MODEL) {
        Value::Observable(obs) => obs,
        other => panic!("expected observable, found {other:?}"),
    }
}

#[test]
fn test_value_tracks_dependency() {
    let f = fixture();
    let d = f.delegate("count + 1", Type::property(Type::INT), BindingMode::Once);
    assert_eq!(d.get_value(), Value::Int(42));
    f.count.set_value(Value::Int(99)).unwrap();
    assert_eq!(d.get_value(), Value::Int(100));
}

#[test]
fn test_reads_are_cached_until_invalidated() {
    let f = fixture();
    let d = f.delegate("tick(count)", Type::property(Type::INT), BindingMode::Once);
    assert_eq!(f.ticks.get(), 0);
    assert_eq!(d.get_value(), Value::Int(41));
    assert_eq!(d.get_value(), Value::Int(41));
    assert_eq!(f.ticks.get(), 1);

    f.count.set_value(Value::Int(7)).unwrap();
    assert_eq!(f.ticks.get(), 1);
    assert_eq!(d.get_value(), Value::Int(7));
    assert_eq!(f.ticks.get(), 2);
    assert_eq!(d.get_value(), Value::Int(7));
    assert_eq!(f.ticks.get(), 2);
}

#[test]
fn test_cached_value_is_shared_until_invalidated() {
    let f = fixture();
    let d = f.delegate("`n={count}`", Type::property(Type::Str), BindingMode::Once);
    let (Value::Str(first), Value::Str(second)) = (d.get_value(), d.get_value()) else {
        panic!("expected strings");
    };
    assert!(Rc::ptr_eq(&first, &second));

    f.count.set_value(Value::Int(1)).unwrap();
    let Value::Str(third) = d.get_value() else {
        panic!("expected a string");
    };
    assert_eq!(&*third, "n=1");
    assert!(!Rc::ptr_eq(&first, &third));
}

#[test]
fn test_delegate_notifies_its_own_listeners() {
    let f = fixture();
    let d = f.delegate("count * 2", Type::property(Type::INT), BindingMode::Once);
    let obs = d.as_observable();
    let hits = Rc::new(Cell::new(0));
    let h = Rc::clone(&hits);
    obs.add_listener(Rc::new(move || h.set(h.get() + 1)));

    f.count.set_value(Value::Int(2)).unwrap();
    assert_eq!(hits.get(), 1);
    assert_eq!(obs.get_value(), Value::Int(4));
    assert!(!obs.is_writable());
}

#[test]
fn test_dynamic_dependency_follows_owner() {
    let f = fixture();
    let ann = f.new_person("Ann");
    let bob = f.new_person("Bob");
    f.person.set_value(Value::Object(Rc::clone(&ann))).unwrap();

    let d = f.delegate("person.name", Type::property(Type::Str), BindingMode::Once);
    assert_eq!(d.unit().dependency_count(), 2);
    assert_eq!(d.get_value(), Value::str("Ann"));
    assert_eq!(d.runtime().steps_of(ann.id()), vec![Step(1)]);

    f.person.set_value(Value::Object(Rc::clone(&bob))).unwrap();
    assert_eq!(d.get_value(), Value::str("Bob"));
    assert_eq!(d.runtime().listener_count(ann.id()), 0);
    assert_eq!(d.runtime().steps_of(bob.id()), vec![Step(1)]);

    name_model(&ann).set_value(Value::str("Anna")).unwrap();
    assert_eq!(d.get_value(), Value::str("Bob"));
    name_model(&bob).set_value(Value::str("Robert")).unwrap();
    assert_eq!(d.get_value(), Value::str("Robert"));
}

#[test]
fn test_null_owner_leaves_step_unsubscribed() {
    let f = fixture();
    let d = f.delegate("person.name", Type::property(Type::Str), BindingMode::Once);
    assert_eq!(d.subscribed_count(), 1);
    assert_eq!(d.get_value(), Value::Null);

    let ann = f.new_person("Ann");
    f.person.set_value(Value::Object(Rc::clone(&ann))).unwrap();
    assert_eq!(d.subscribed_count(), 2);
    assert_eq!(d.get_value(), Value::str("Ann"));
}

#[test]
fn test_dispose_empties_directory() {
    let f = fixture();
    let ann = f.new_person("Ann");
    f.person.set_value(Value::Object(ann)).unwrap();
    let d = f.delegate("person.name + count", Type::property(Type::Str), BindingMode::Once);
    assert_eq!(d.subscribed_count(), 3);
    assert!(!d.runtime().is_empty());

    d.dispose();
    assert!(d.runtime().is_empty());
    assert_eq!(d.subscribed_count(), 0);
    assert!(!d.is_attached());
}

#[test]
fn test_locked_delegate_defers_invalidation() {
    let f = fixture();
    let d = f.delegate("count", Type::property(Type::INT), BindingMode::Once);
    assert_eq!(d.get_value(), Value::Int(41));

    d.lock_listeners();
    f.count.set_value(Value::Int(1)).unwrap();
    f.count.set_value(Value::Int(2)).unwrap();
    assert_eq!(d.get_value(), Value::Int(41));
    assert_eq!(d.runtime().pending_len(), 2);

    d.unlock_listeners();
    assert_eq!(d.get_value(), Value::Int(2));
}

#[test]
fn test_bidirectional_write_back() {
    let f = fixture();
    let d = f.delegate("count", Type::property(Type::INT), BindingMode::Bidirectional);
    d.set_value(Value::Int(7)).unwrap();
    assert_eq!(f.count.get_value(), Value::Int(7));
    assert_eq!(d.get_value(), Value::Int(7));
    assert!(d.as_observable().is_writable());
}

#[test]
fn test_one_way_delegate_rejects_writes() {
    let f = fixture();
    let d = f.delegate("count", Type::property(Type::INT), BindingMode::Once);
    assert_eq!(d.set_value(Value::Int(7)), Err(RuntimeError::ReadOnly));
}

#[test]
fn test_attach_is_idempotent() {
    let f = fixture();
    let d = f.delegate("count + count", Type::property(Type::INT), BindingMode::Once);
    d.attach();
    assert_eq!(d.runtime().steps_of(f.view.id()), vec![Step(0)]);
}
