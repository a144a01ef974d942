use super::*;

#[test]
fn test_span_basic() {
    let span = Span::new(10, 20);
    assert_eq!(span.len(), 10);
    assert!(!span.is_empty());
    assert!(span.contains(15));
    assert!(!span.contains(20));
}

#[test]
fn test_span_merge() {
    let a = Span::new(10, 20);
    let b = Span::new(15, 30);
    let merged = a.merge(b);
    assert_eq!(merged.start, 10);
    assert_eq!(merged.end, 30);
}

#[test]
fn test_span_shift() {
    let span = Span::new(2, 5).shift(100);
    assert_eq!(span, Span::new(102, 105));
}

#[test]
fn test_span_shift_saturates() {
    let span = Span::new(u32::MAX - 1, u32::MAX).shift(10);
    assert_eq!(span.end, u32::MAX);
}

#[test]
fn test_span_try_from_range_end_too_large() {
    let large_end = u32::MAX as usize + 1;
    let result = Span::try_from_range(0..large_end);
    assert!(matches!(result, Err(SpanError::EndTooLarge(_))));
}

#[test]
fn test_span_error_display() {
    let err = SpanError::StartTooLarge(0x1_0000_0000);
    assert!(err.to_string().contains("start"));
}
