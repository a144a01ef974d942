use super::*;
use crate::heap::Heap;
use bind_ir::ClassId;

#[test]
fn test_display_matches_concatenation_rendering() {
    assert_eq!(Value::Int(42).to_string(), "42");
    assert_eq!(Value::Double(1.0).to_string(), "1.0");
    assert_eq!(Value::Float(2.5).to_string(), "2.5");
    assert_eq!(Value::Null.to_string(), "null");
    assert_eq!(Value::Char('x').to_string(), "x");
    let list = Value::List(Rc::from(vec![Value::Int(1), Value::str("a")]));
    assert_eq!(list.to_string(), "[1, a]");
}

#[test]
fn test_objects_compare_by_identity() {
    let heap = Heap::new();
    let a = heap.alloc(ClassId(0));
    let b = heap.alloc(ClassId(0));
    assert_eq!(Value::Object(Rc::clone(&a)), Value::Object(Rc::clone(&a)));
    assert_ne!(Value::Object(a), Value::Object(b));
}

#[test]
fn test_strings_compare_by_content() {
    assert_eq!(Value::str("ab"), Value::from("ab"));
    assert_ne!(Value::Int(1), Value::Long(1));
}
