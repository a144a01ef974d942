use super::*;

#[test]
fn test_nested_depth() {
    fn depth(n: u32) -> u32 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { depth(n - 1) + 1 })
    }

    assert_eq!(depth(100_000), 100_000);
}

#[test]
fn test_passes_result_through() {
    let result: Result<u8, &str> = ensure_sufficient_stack(|| Err("unclosed"));
    assert_eq!(result, Err("unclosed"));
}
