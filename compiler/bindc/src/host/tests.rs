#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use bind_runtime::{evaluate, ObservableValue};
use bind_ir::{Op, Program};
use pretty_assertions::assert_eq;

#[test]
fn test_property_models_are_per_instance() {
    let mut builder = HostBuilder::new();
    let counter = builder.class("Counter", None);
    let count = builder.property(counter, "count", Type::INT);
    let host = builder.build();

    let a = host.instantiate(counter);
    let b = host.instantiate(counter);
    let model_a = host.property(&a, "count").unwrap();
    assert_eq!(model_a.get_value(), Value::Int(0));
    model_a.set_value(Value::Int(5)).unwrap();
    assert_eq!(host.property(&b, "count").unwrap().get_value(), Value::Int(0));

    let program = Program::from_ops(vec![Op::LoadThis, Op::Call { method: count, argc: 0 }]);
    let Value::Observable(read) = evaluate(&program, &host.env(&a)).unwrap() else {
        panic!("expected an observable");
    };
    assert!(read.ptr_eq(&model_a));
}

#[test]
fn test_read_only_property_hides_setter() {
    let mut builder = HostBuilder::new();
    let view = builder.class("View", None);
    let title = builder.read_only_property(view, "title", Type::Str);
    let host = builder.build();

    let obj = host.instantiate(view);
    let program = Program::from_ops(vec![Op::LoadThis, Op::Call { method: title, argc: 0 }]);
    let Value::Observable(read) = evaluate(&program, &host.env(&obj)).unwrap() else {
        panic!("expected an observable");
    };
    assert!(!read.is_writable());
    host.property(&obj, "title").unwrap().set_value(Value::str("x")).unwrap();
    assert_eq!(read.get_value(), Value::str("x"));
}

#[test]
fn test_setter_writes_read_only_model() {
    let mut builder = HostBuilder::new();
    let view = builder.class("View", None);
    let title = builder.read_only_property(view, "title", Type::Str);
    let set_title = builder.setter(view, "title", title, Type::Str);
    let host = builder.build();

    let obj = host.instantiate(view);
    let this = Value::Object(Rc::clone(&obj));
    host.natives()
        .call(set_title, &this, &[Value::str("x")])
        .unwrap();
    assert_eq!(host.property(&obj, "title").unwrap().get_value(), Value::str("x"));
    assert_eq!(
        host.natives().call(set_title, &this, &[]),
        Err(RuntimeError::MissingArgument)
    );
}

#[test]
fn test_getter_reads_field() {
    let mut builder = HostBuilder::new();
    let person = builder.class("Person", None);
    let age = builder.field(person, "ageValue", Type::INT);
    let get_age = builder.getter(person, "age", age, Type::INT);
    let host = builder.build();
    assert_eq!(host.interner().lookup(host.registry().method(get_age).name), "getAge");

    let obj = host.instantiate(person);
    obj.set_field(age, Value::Int(30));
    let program = Program::from_ops(vec![Op::LoadThis, Op::Call { method: get_age, argc: 0 }]);
    assert_eq!(evaluate(&program, &host.env(&obj)), Ok(Value::Int(30)));
}

#[test]
fn test_class_lookup() {
    let mut builder = HostBuilder::new();
    let view = builder.class("View", None);
    let host = builder.build();
    assert_eq!(host.class_named("View"), Some(view));
    assert_eq!(host.class_named("Missing"), None);
    assert!(host.property(&host.instantiate(view), "nothing").is_none());
}
