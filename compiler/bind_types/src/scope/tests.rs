#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use bind_ir::{FieldId, MethodId};
use pretty_assertions::assert_eq;

fn setup() -> (StringInterner, ClassRegistry, ClassId) {
    let interner = StringInterner::new();
    let mut registry = ClassRegistry::new();
    let base = registry.add_class(interner.intern("Base"), None);
    registry.add_field(base, interner.intern("label"), Type::Str);
    let view = registry.add_class(interner.intern("View"), Some(base));
    registry.add_method(
        view,
        interner.intern("countProperty"),
        vec![],
        Type::property(Type::INT),
    );
    (interner, registry, view)
}

#[test]
fn test_members_of_class_and_superclass() {
    let (interner, registry, view) = setup();
    let scope = Scope::new(&registry, view, &interner);

    let count = scope.get(interner.intern("count")).unwrap();
    assert_eq!(count.ty, Type::property(Type::INT));
    assert!(count.writable);
    assert_eq!(count.owner_program().unwrap().ops(), &[Op::LoadThis]);
    assert_eq!(
        count.access_program().ops(),
        &[Op::Call {
            method: MethodId(0),
            argc: 0
        }]
    );

    let label = scope.get(interner.intern("label")).unwrap();
    assert_eq!(label.ty, Type::Str);
    let mut e = Emitter::new();
    label.emit(&mut e);
    assert_eq!(e.finish().ops(), &[Op::LoadThis, Op::GetField(FieldId(0))]);
}

#[test]
fn test_named_entry_shadows_member() {
    let (interner, registry, view) = setup();
    let mut scope = Scope::new(&registry, view, &interner);
    let before = scope.len();
    scope.insert_named(interner.intern("label"), 3, Type::Object);

    assert_eq!(scope.len(), before);
    let label = scope.get(interner.intern("label")).unwrap();
    assert!(label.owner.is_none());
    assert_eq!(label.access_program().ops(), &[Op::LoadLocal(3)]);
}

#[test]
fn test_this_and_unknown() {
    let (interner, registry, view) = setup();
    let scope = Scope::new(&registry, view, &interner);
    assert_eq!(scope.this().ty, Type::Class(view));
    assert!(scope.get(interner.intern("missing")).is_none());
}
