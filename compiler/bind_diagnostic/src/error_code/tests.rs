use super::*;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E1001.to_string(), "E1001");
    assert_eq!(ErrorCode::E2005.as_str(), "E2005");
}

#[test]
fn test_all_variants_classified() {
    for code in ErrorCode::ALL {
        let families = [
            code.is_lexer_error(),
            code.is_parser_error() && !code.is_lexer_error(),
            code.is_type_error(),
            code.is_binding_error(),
            code.as_str().starts_with("E9"),
        ];
        assert_eq!(
            families.iter().filter(|f| **f).count(),
            1,
            "{code} must belong to exactly one family"
        );
        assert!(!code.description().is_empty());
    }
}

#[test]
fn test_parse_round_trip_is_case_insensitive() {
    assert_eq!("e2005".parse::<ErrorCode>(), Ok(ErrorCode::E2005));
    assert_eq!(" E3001 ".parse::<ErrorCode>(), Ok(ErrorCode::E3001));
    assert!("E7777".parse::<ErrorCode>().is_err());
}
