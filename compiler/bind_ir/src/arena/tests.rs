use super::*;
use crate::{ExprKind, Name, Span};

#[test]
fn test_alloc_and_get() {
    let mut arena = ExprArena::new();
    let id = arena.alloc_expr(Expr::new(ExprKind::Int(7), Span::new(0, 1)));
    assert_eq!(arena.get_expr(id).kind, ExprKind::Int(7));
    assert_eq!(arena.len(), 1);
}

#[test]
fn test_expr_lists() {
    let mut arena = ExprArena::new();
    let a = arena.alloc_expr(Expr::new(ExprKind::Int(1), Span::DUMMY));
    let b = arena.alloc_expr(Expr::new(ExprKind::Int(2), Span::DUMMY));
    let empty = arena.alloc_expr_list(&[]);
    let range = arena.alloc_expr_list(&[a, b]);
    assert!(empty.is_empty());
    assert_eq!(arena.get_expr_list(range), &[a, b]);
}

#[test]
fn test_template_parts() {
    let mut arena = ExprArena::new();
    let e = arena.alloc_expr(Expr::new(ExprKind::This, Span::DUMMY));
    let parts = [TemplatePart {
        expr: e,
        text_after: Name::EMPTY,
    }];
    let range = arena.alloc_template_parts(&parts);
    assert_eq!(arena.get_template_parts(range), &parts);
}
