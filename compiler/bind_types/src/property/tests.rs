#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;

struct Model {
    interner: StringInterner,
    registry: ClassRegistry,
    person: ClassId,
}

fn model() -> Model {
    let interner = StringInterner::new();
    let mut registry = ClassRegistry::new();
    let person = registry.add_class(interner.intern("Person"), None);
    registry.add_method(
        person,
        interner.intern("nameProperty"),
        vec![],
        Type::observable(Type::Str),
    );
    registry.add_method(person, interner.intern("setName"), vec![Type::Str], Type::Void);
    registry.add_method(
        person,
        interner.intern("ageProperty"),
        vec![],
        Type::property(Type::INT),
    );
    registry.add_method(person, interner.intern("setAge"), vec![Type::INT], Type::Void);
    registry.add_method(person, interner.intern("getTitle"), vec![], Type::Str);
    registry.add_method(person, interner.intern("isActive"), vec![], Type::BOOLEAN);
    registry.add_method(person, interner.intern("isOdd"), vec![], Type::INT);
    registry.add_field(person, interner.intern("id"), Type::LONG);
    registry.add_field(person, interner.intern("title"), Type::Str);
    Model {
        interner,
        registry,
        person,
    }
}

fn resolve(m: &Model, name: &str) -> Option<Property> {
    resolve_property(
        &m.registry,
        &Type::Class(m.person),
        m.interner.intern(name),
        &m.interner,
    )
}

#[test]
fn test_reactive_property_with_setter_is_writable() {
    let m = model();
    let prop = resolve(&m, "name").unwrap();
    assert!(prop.is_reactive());
    assert!(prop.writable);
    let set_name = m
        .registry
        .methods_named(m.person, m.interner.intern("setName"))
        .into_iter()
        .map(|def| def.id)
        .next();
    assert_eq!(prop.reactive_setter(), set_name);
    assert_eq!(
        prop.ty,
        Type::Observable {
            value: Box::new(Type::Str),
            writable: true
        }
    );
}

#[test]
fn test_writable_model_ignores_setter() {
    let m = model();
    let prop = resolve(&m, "age").unwrap();
    assert!(prop.writable);
    assert_eq!(prop.ty, Type::property(Type::INT));
    assert_eq!(prop.reactive_setter(), None);
}

#[test]
fn test_getter_wins_over_field() {
    let m = model();
    let prop = resolve(&m, "title").unwrap();
    assert!(matches!(prop.access, PropertyAccess::Getter { setter: None, .. }));
    assert!(!prop.writable);
}

#[test]
fn test_is_getter_requires_boolean() {
    let m = model();
    assert_eq!(resolve(&m, "active").map(|p| p.ty), Some(Type::BOOLEAN));
    assert_eq!(resolve(&m, "odd"), None);
}

#[test]
fn test_field_fallback_and_array_length() {
    let m = model();
    let id = resolve(&m, "id").unwrap();
    assert!(matches!(id.access, PropertyAccess::Field(_)));
    assert_eq!(id.accessor_program().ops(), &[Op::GetField(FieldId(0))]);

    let len = resolve_property(
        &m.registry,
        &Type::array(Type::Str),
        m.interner.intern("length"),
        &m.interner,
    )
    .unwrap();
    assert_eq!(len.accessor_program().ops(), &[Op::ArrayLength]);
}

#[test]
fn test_property_names() {
    let m = model();
    let names: Vec<&str> = property_names(&m.registry, m.person, &m.interner)
        .into_iter()
        .map(|n| m.interner.lookup(n))
        .collect();
    assert_eq!(names, vec!["id", "title", "name", "age", "active"]);
}
