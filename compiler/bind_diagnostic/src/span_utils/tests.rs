use super::*;

#[test]
fn test_single_line() {
    let source = "items[0].name";
    let table = LineOffsetTable::build(source);
    assert_eq!(table.line_count(), 1);
    assert_eq!(table.offset_to_line_col(source, 9), (1, 10));
}

#[test]
fn test_multi_line_and_line_text() {
    let source = "first\nsecond\nthird";
    let table = LineOffsetTable::build(source);
    assert_eq!(table.line_from_offset(6), 2);
    assert_eq!(table.line_from_offset(12), 2);
    assert_eq!(table.line_from_offset(13), 3);
    assert_eq!(table.line_text(source, 2), "second");
    assert_eq!(table.line_text(source, 3), "third");
    assert_eq!(table.line_text(source, 9), "");
}

#[test]
fn test_columns_count_chars() {
    let source = "\"héllo\" + x";
    let table = LineOffsetTable::build(source);
    let x = u32::try_from(source.find('x').unwrap_or(0)).unwrap_or(0);
    assert_eq!(table.offset_to_line_col(source, x), (1, 11));
}
