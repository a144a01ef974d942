use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_inherited_lookup() {
    let interner = StringInterner::new();
    let mut reg = ClassRegistry::new();
    let base = reg.add_class(interner.intern("Base"), None);
    let derived = reg.add_class(interner.intern("Derived"), Some(base));
    let id = reg.add_field(base, interner.intern("id"), Type::INT);

    assert!(reg.is_subclass(derived, base));
    assert!(!reg.is_subclass(base, derived));
    assert_eq!(reg.lookup_field(derived, interner.intern("id")).map(|f| f.id), Some(id));
    assert_eq!(reg.class_by_name(interner.intern("Derived")), Some(derived));
}

#[test]
fn test_override_hides_superclass_method() {
    let interner = StringInterner::new();
    let mut reg = ClassRegistry::new();
    let base = reg.add_class(interner.intern("Base"), None);
    let derived = reg.add_class(interner.intern("Derived"), Some(base));
    let f = interner.intern("f");
    reg.add_method(base, f, vec![Type::INT], Type::Str);
    reg.add_method(base, f, vec![Type::Str], Type::Str);
    let over = reg.add_method(derived, f, vec![Type::INT], Type::Str);

    let found: Vec<MethodId> = reg.methods_named(derived, f).iter().map(|m| m.id).collect();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0], over);
}

#[test]
fn test_display_type_uses_class_names() {
    let interner = StringInterner::new();
    let mut reg = ClassRegistry::new();
    let person = reg.add_class(interner.intern("Person"), None);
    let ty = Type::property(Type::array(Type::Class(person)));
    assert_eq!(reg.display_type(&ty, &interner), "Property<Person[]>");
}
