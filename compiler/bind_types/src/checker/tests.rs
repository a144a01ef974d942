#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use bind_diagnostic::ErrorCode;
use bind_parse::{parse, TypeHint};
use pretty_assertions::assert_eq;

/// `View` with a reactive `count`, a `Person` reachable through `person`,
/// and a few overloaded methods.
struct Host {
    interner: StringInterner,
    registry: ClassRegistry,
    scope: Scope,
}

fn host() -> Host {
    let interner = StringInterner::new();
    let mut registry = ClassRegistry::new();
    let person = registry.add_class(interner.intern("Person"), None);
    registry.add_method(
        person,
        interner.intern("nameProperty"),
        vec![],
        Type::observable(Type::Str),
    );
    registry.add_method(person, interner.intern("getAge"), vec![], Type::INT);
    registry.add_field(person, interner.intern("tags"), Type::array(Type::Str));

    let view = registry.add_class(interner.intern("View"), None);
    registry.add_method(
        view,
        interner.intern("countProperty"),
        vec![],
        Type::property(Type::INT),
    );
    registry.add_method(
        view,
        interner.intern("personProperty"),
        vec![],
        Type::observable(Type::Class(person)),
    );
    let f = interner.intern("f");
    registry.add_method(view, f, vec![Type::INT], Type::Str);
    registry.add_method(view, f, vec![Type::LONG], Type::Str);
    registry.add_method(view, f, vec![Type::Str], Type::Str);
    let g = interner.intern("g");
    registry.add_method(view, g, vec![Type::LONG], Type::INT);
    registry.add_method(view, g, vec![Type::DOUBLE], Type::INT);
    registry.add_method(view, interner.intern("total"), vec![], Type::LONG);

    let scope = Scope::new(&registry, view, &interner);
    Host {
        interner,
        registry,
        scope,
    }
}

fn check_src(h: &Host, src: &str, hint: TypeHint) -> Result<(ParsedExpr, TypedExpr), TypeError> {
    let parsed = parse(src, hint, &h.interner).unwrap();
    let typed = check(&parsed, &h.scope, &h.registry, &h.interner)?;
    Ok((parsed, typed))
}

fn root_type(h: &Host, src: &str) -> Type {
    let (_, typed) = check_src(h, src, TypeHint::None).unwrap();
    typed.root_type().clone()
}

fn error_code(h: &Host, src: &str, hint: TypeHint) -> ErrorCode {
    check_src(h, src, hint).unwrap_err().code()
}

#[test]
fn test_literals_and_operators() {
    let h = host();
    assert_eq!(root_type(&h, "1 + 2L"), Type::LONG);
    assert_eq!(root_type(&h, "1 < 2.0"), Type::BOOLEAN);
    assert_eq!(root_type(&h, "'a' + 1"), Type::INT);
    assert_eq!(root_type(&h, "\"n=\" + 1"), Type::Str);
    assert_eq!(root_type(&h, "!true"), Type::BOOLEAN);
    assert_eq!(root_type(&h, "true ? 1 : 2L"), Type::LONG);
}

#[test]
fn test_reactive_members_keep_observable_type() {
    let h = host();
    assert_eq!(root_type(&h, "count"), Type::property(Type::INT));
    assert_eq!(root_type(&h, "count + 1"), Type::INT);
    assert_eq!(root_type(&h, "person.name"), Type::observable(Type::Str));
    assert_eq!(root_type(&h, "this.person.age"), Type::INT);
    assert_eq!(root_type(&h, "person.tags.length"), Type::INT);
    assert_eq!(root_type(&h, "person.tags[0]"), Type::Str);
}

#[test]
fn test_resolutions_recorded() {
    let h = host();
    let (parsed, typed) = check_src(&h, "person.name", TypeHint::None).unwrap();
    assert!(matches!(
        typed.resolution(parsed.root),
        Some(Resolution::Property(p)) if p.is_reactive()
    ));

    let (parsed, typed) = check_src(&h, "total", TypeHint::None).unwrap();
    assert!(matches!(typed.resolution(parsed.root), Some(Resolution::Method(_))));
    assert_eq!(typed.root_type(), &Type::LONG);

    let (parsed, typed) = check_src(&h, "\"abc\".length()", TypeHint::None).unwrap();
    assert_eq!(
        typed.resolution(parsed.root),
        Some(&Resolution::Builtin(BuiltinMethod::StrLength))
    );
}

#[test]
fn test_overloads() {
    let h = host();
    let (parsed, typed) = check_src(&h, "f(1)", TypeHint::None).unwrap();
    assert_eq!(typed.resolution(parsed.root), Some(&Resolution::Method(MethodId(4))));
    assert_eq!(typed.root_type(), &Type::Str);

    let err = check_src(&h, "g(1)", TypeHint::None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2005);
    assert_eq!(
        err.kind,
        TypeErrorKind::AmbiguousOverload {
            member: "g".into(),
            candidates: vec!["g(long)".into(), "g(double)".into()],
        }
    );
    assert_eq!(root_type(&h, "g(1.5)"), Type::INT);
}

#[test]
fn test_unresolved_names_suggest() {
    let h = host();
    let err = check_src(&h, "cuont + 1", TypeHint::None).unwrap_err();
    assert_eq!(
        err.kind,
        TypeErrorKind::UnresolvedIdentifier {
            name: "cuont".into(),
            suggestion: Some("count".into()),
        }
    );
    assert_eq!(err.span, Span::new(0, 5));

    let err = check_src(&h, "person.nmae", TypeHint::None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2004);
    assert!(matches!(
        err.kind,
        TypeErrorKind::UnresolvedMember { ref suggestion, .. } if suggestion.as_deref() == Some("name")
    ));

    assert_eq!(error_code(&h, "nothing(1)", TypeHint::None), ErrorCode::E2003);
    assert_eq!(error_code(&h, "f(1, 2)", TypeHint::None), ErrorCode::E2004);
}

#[test]
fn test_type_errors() {
    let h = host();
    assert_eq!(error_code(&h, "1 - \"a\"", TypeHint::None), ErrorCode::E2002);
    assert_eq!(error_code(&h, "1 ? 2 : 3", TypeHint::None), ErrorCode::E2001);
    assert_eq!(error_code(&h, "person.tags[1L]", TypeHint::None), ErrorCode::E2001);
    assert_eq!(error_code(&h, "\"a\".charAt(true)", TypeHint::None), ErrorCode::E2001);
}

#[test]
fn test_target_slot() {
    let h = host();
    let (_, typed) = check_src(&h, "count", TypeHint::Expected(Type::property(Type::LONG))).unwrap();
    assert_eq!(
        typed.target_coercion().to_vec(),
        vec![bind_ir::Conversion::Widen {
            from: Prim::Int,
            to: Prim::Long
        }]
    );

    let (_, typed) = check_src(&h, "count", TypeHint::Expected(Type::Str)).unwrap();
    assert_eq!(typed.target_coercion().to_vec(), vec![bind_ir::Conversion::ToStr]);

    let err = check_src(&h, "person.name", TypeHint::Expected(Type::INT)).unwrap_err();
    assert_eq!(
        err.kind,
        TypeErrorKind::TypeMismatch {
            expected: "int".into(),
            found: "String".into(),
            context: MismatchContext::Target,
        }
    );
}

#[test]
fn test_collections_follow_hint() {
    let h = host();
    assert_eq!(root_type(&h, "[1, \"a\"]"), Type::List);

    let hint = TypeHint::Expected(Type::array(Type::LONG));
    let (_, typed) = check_src(&h, "[1, 2L]", hint.clone()).unwrap();
    assert_eq!(typed.root_type(), &Type::array(Type::LONG));

    assert_eq!(error_code(&h, "[1, \"a\"]", hint), ErrorCode::E2001);
}

#[test]
fn test_template_is_string() {
    let h = host();
    assert_eq!(root_type(&h, "`n={count} p={person.name}`"), Type::Str);
}
