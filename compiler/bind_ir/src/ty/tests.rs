use super::*;

#[test]
fn test_primitive_widening() {
    assert!(Prim::Int.widens_to(Prim::Long));
    assert!(Prim::Int.widens_to(Prim::Double));
    assert!(Prim::Char.widens_to(Prim::Int));
    assert!(!Prim::Long.widens_to(Prim::Int));
    assert!(!Prim::Int.widens_to(Prim::Int));
    assert!(!Prim::Byte.widens_to(Prim::Char));
    assert!(!Prim::Boolean.widens_to(Prim::Int));
}

#[test]
fn test_numeric_promotion() {
    assert_eq!(Prim::promote(Prim::Byte, Prim::Short), Prim::Int);
    assert_eq!(Prim::promote(Prim::Int, Prim::Long), Prim::Long);
    assert_eq!(Prim::promote(Prim::Long, Prim::Float), Prim::Float);
    assert_eq!(Prim::promote(Prim::Float, Prim::Double), Prim::Double);
    assert_eq!(Prim::Char.promote_unary(), Prim::Int);
}

#[test]
fn test_value_type_unwraps_observable() {
    let ty = Type::property(Type::INT);
    assert!(ty.is_observable());
    assert_eq!(ty.value_type(), &Type::INT);
    assert_eq!(Type::Str.value_type(), &Type::Str);
}

#[test]
fn test_display() {
    assert_eq!(Type::observable(Type::Str).to_string(), "ObservableValue<String>");
    assert_eq!(Type::property(Type::Boxed(Prim::Int)).to_string(), "Property<Integer>");
    assert_eq!(Type::array(Type::DOUBLE).to_string(), "double[]");
}

#[test]
fn test_unboxed_views() {
    assert_eq!(Type::Boxed(Prim::Long).numeric(), Some(Prim::Long));
    assert_eq!(Type::BOOLEAN.numeric(), None);
    assert!(Type::Boxed(Prim::Boolean).is_boolean_like());
    assert!(!Type::INT.is_reference());
    assert!(Type::Null.is_reference());
}
