use super::*;

#[test]
fn test_intern_returns_same_name() {
    let interner = StringInterner::new();
    let a = interner.intern("count");
    let b = interner.intern("count");
    assert_eq!(a, b);
    assert_eq!(interner.lookup(a), "count");
}

#[test]
fn test_distinct_strings_get_distinct_names() {
    let interner = StringInterner::new();
    let a = interner.intern("a");
    let b = interner.intern("b");
    assert_ne!(a, b);
}

#[test]
fn test_empty_is_preinterned() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.lookup(Name::EMPTY), "");
}

#[test]
fn test_get_does_not_intern() {
    let interner = StringInterner::new();
    assert_eq!(interner.get("missing"), None);
    let before = interner.len();
    let name = interner.intern("present");
    assert_eq!(interner.get("present"), Some(name));
    assert_eq!(interner.len(), before + 1);
}
