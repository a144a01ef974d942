//! Compile binding expressions against a host model and run them.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::rc::Rc;

use bind_ir::{ClassId, Type};
use bind_runtime::ObservableValue;
use bindc::{
    BindingRequest, CompiledExpr, CompilerOptions, ErrorCode, HostBuilder, HostModel, Session,
    Value,
};
use pretty_assertions::assert_eq;

/// `Form { aProperty(): Property<Item>; labelProperty(): Property<String>;
/// statusProperty(): ObservableValue<String>; setStatus(String) }`,
/// `Item { bProperty(): Property<int>; tagProperty(): ObservableValue<String>;
/// setTag(String) }`.
struct World {
    session: Session,
    form_class: ClassId,
    item_class: ClassId,
}

fn world() -> World {
    let mut builder = HostBuilder::new();
    let form = builder.class("Form", None);
    let item = builder.class("Item", None);
    builder.property(form, "a", Type::Class(item));
    builder.property(form, "label", Type::Str);
    builder.property(item, "b", Type::INT);
    let status = builder.read_only_property(form, "status", Type::Str);
    builder.setter(form, "status", status, Type::Str);
    let tag = builder.read_only_property(item, "tag", Type::Str);
    builder.setter(item, "tag", tag, Type::Str);
    builder.method(item, "scaled", vec![Type::INT], Type::INT, |_, args| match args {
        [Value::Int(k)] => Ok(Value::Int(k * 10)),
        _ => Ok(Value::Null),
    });
    let host = Rc::new(builder.build());
    World {
        session: Session::new(Rc::clone(&host), form, CompilerOptions::unlimited()),
        form_class: form,
        item_class: item,
    }
}

impl World {
    fn host(&self) -> &HostModel {
        self.session.host()
    }
}

#[test]
fn reactive_member_plus_constant_tracks_changes() {
    let w = world();
    let form = w.host().instantiate(w.form_class);
    let item = w.host().instantiate(w.item_class);
    w.host()
        .property(&form, "a")
        .unwrap()
        .set_value(Value::Object(Rc::clone(&item)))
        .unwrap();
    let b = w.host().property(&item, "b").unwrap();
    b.set_value(Value::Int(41)).unwrap();

    let compiled = w
        .session
        .compile(&BindingRequest::new("a.b + 1", Type::property(Type::INT)))
        .unwrap();
    let unit = compiled.as_binding().unwrap();
    assert_eq!(unit.dependency_count(), 2);

    let delegate = w.host().delegate(unit, &form);
    assert_eq!(delegate.get_value(), Value::Int(42));
    b.set_value(Value::Int(99)).unwrap();
    assert_eq!(delegate.get_value(), Value::Int(100));
}

#[test]
fn pure_expression_never_subscribes() {
    let w = world();
    let compiled = w
        .session
        .compile(&BindingRequest::new("`total: {2 * 21}`", Type::Str))
        .unwrap();
    let CompiledExpr::Constant { program, .. } = &compiled else {
        panic!("expected a constant");
    };
    let form = w.host().instantiate(w.form_class);
    let value = bind_runtime::evaluate(program, &w.host().env(&form)).unwrap();
    assert_eq!(value, Value::str("total: 42"));
}

#[test]
fn duplicate_reads_collapse_to_one_step() {
    let w = world();
    let compiled = w
        .session
        .compile(&BindingRequest::new(
            "label + label.length() + label",
            Type::property(Type::Str),
        ))
        .unwrap();
    assert_eq!(compiled.as_binding().unwrap().dependency_count(), 1);
}

#[test]
fn cached_value_is_identical_until_a_dependency_fires() {
    let w = world();
    let form = w.host().instantiate(w.form_class);
    let label = w.host().property(&form, "label").unwrap();
    label.set_value(Value::str("hi")).unwrap();

    let compiled = w
        .session
        .compile(&BindingRequest::new("label.toUpperCase()", Type::property(Type::Str)))
        .unwrap();
    let delegate = w.host().delegate(compiled.as_binding().unwrap(), &form);
    let (Value::Str(first), Value::Str(second)) = (delegate.get_value(), delegate.get_value())
    else {
        panic!("expected strings");
    };
    assert!(Rc::ptr_eq(&first, &second));

    label.set_value(Value::str("yo")).unwrap();
    assert_eq!(delegate.get_value(), Value::str("YO"));
}

#[test]
fn bidirectional_binding_writes_back() {
    let w = world();
    let form = w.host().instantiate(w.form_class);
    let compiled = w
        .session
        .compile(&BindingRequest::new("label", Type::property(Type::Str)).bidirectional())
        .unwrap();
    let delegate = w.host().delegate(compiled.as_binding().unwrap(), &form);
    delegate.set_value(Value::str("typed")).unwrap();
    assert_eq!(
        w.host().property(&form, "label").unwrap().get_value(),
        Value::str("typed")
    );
    assert_eq!(delegate.get_value(), Value::str("typed"));
}

#[test]
fn bidirectional_read_only_member_writes_through_setter() {
    let w = world();
    let form = w.host().instantiate(w.form_class);
    let compiled = w
        .session
        .compile(&BindingRequest::new("status", Type::property(Type::Str)).bidirectional())
        .unwrap();
    let delegate = w.host().delegate(compiled.as_binding().unwrap(), &form);
    assert!(delegate.as_observable().is_writable());

    delegate.set_value(Value::str("typed")).unwrap();
    assert_eq!(
        w.host().property(&form, "status").unwrap().get_value(),
        Value::str("typed")
    );
    assert_eq!(delegate.get_value(), Value::str("typed"));
}

#[test]
fn bidirectional_read_only_path_writes_through_setter() {
    let w = world();
    let form = w.host().instantiate(w.form_class);
    let item = w.host().instantiate(w.item_class);
    w.host()
        .property(&form, "a")
        .unwrap()
        .set_value(Value::Object(Rc::clone(&item)))
        .unwrap();
    let compiled = w
        .session
        .compile(&BindingRequest::new("a.tag", Type::property(Type::Str)).bidirectional())
        .unwrap();
    let delegate = w.host().delegate(compiled.as_binding().unwrap(), &form);

    delegate.set_value(Value::str("urgent")).unwrap();
    assert_eq!(
        w.host().property(&item, "tag").unwrap().get_value(),
        Value::str("urgent")
    );
    assert_eq!(delegate.get_value(), Value::str("urgent"));
}

#[test]
fn method_call_with_argument() {
    let w = world();
    let form = w.host().instantiate(w.form_class);
    let item = w.host().instantiate(w.item_class);
    w.host()
        .property(&form, "a")
        .unwrap()
        .set_value(Value::Object(item))
        .unwrap();
    let compiled = w
        .session
        .compile(&BindingRequest::new("a.scaled(4)", Type::property(Type::INT)))
        .unwrap();
    let delegate = w.host().delegate(compiled.as_binding().unwrap(), &form);
    assert_eq!(delegate.get_value(), Value::Int(40));
}

#[test]
fn document_reports_every_failure_and_compiles_the_rest() {
    let w = world();
    let document = "<Form title=\"${a.c}\" label=\"${label}\" count=\"${a.b}\"/>";
    let requests = vec![
        BindingRequest::new("a.c", Type::property(Type::Str)).at(15),
        BindingRequest::new("label", Type::property(Type::Str)).at(31),
        BindingRequest::new("a.b", Type::INT).at(47),
    ];
    let output = w.session.compile_document(document, &requests);
    let codes: Vec<ErrorCode> = output.diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E2004, ErrorCode::E3001]);
    assert!(output.results[1].is_some());
    assert_eq!(output.live_count(), 1);
}

#[test]
fn locked_construction_defers_updates() {
    let w = world();
    let form = w.host().instantiate(w.form_class);
    let label = w.host().property(&form, "label").unwrap();
    let compiled = w
        .session
        .compile(&BindingRequest::new("label", Type::property(Type::Str)))
        .unwrap();
    let delegate = w.host().delegate(compiled.as_binding().unwrap(), &form);
    assert_eq!(delegate.get_value(), Value::Null);

    delegate.lock_listeners();
    label.set_value(Value::str("one")).unwrap();
    label.set_value(Value::str("two")).unwrap();
    assert_eq!(delegate.get_value(), Value::Null);
    delegate.unlock_listeners();
    assert_eq!(delegate.get_value(), Value::str("two"));

    delegate.dispose();
    assert!(delegate.runtime().is_empty());
}
