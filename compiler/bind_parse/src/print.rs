//! S-expression rendering of a parsed expression, used by `bindc parse`
//! and by tests.

use std::fmt::Write;

use bind_ir::{ExprArena, ExprId, ExprKind, StringInterner};

use crate::ParsedExpr;

/// Render `parsed` as an S-expression, e.g. `(+ (. a b) 1)`.
pub fn to_sexpr(parsed: &ParsedExpr, interner: &StringInterner) -> String {
    let mut out = String::new();
    write_expr(&mut out, &parsed.arena, parsed.root, interner);
    out
}

fn write_expr(out: &mut String, arena: &ExprArena, id: ExprId, interner: &StringInterner) {
    let expr = arena.get_expr(id);
    let _ = match expr.kind {
        ExprKind::Null => write!(out, "null"),
        ExprKind::Bool(b) => write!(out, "{b}"),
        ExprKind::Int(i) => write!(out, "{i}"),
        ExprKind::Long(i) => write!(out, "{i}L"),
        ExprKind::Float(bits) => write!(out, "{}f", f32::from_bits(bits)),
        ExprKind::Double(bits) => write!(out, "{:?}", f64::from_bits(bits)),
        ExprKind::Char(c) => write!(out, "{c:?}"),
        ExprKind::Str(name) => write!(out, "{:?}", interner.lookup(name)),
        ExprKind::Ident(name) => write!(out, "{}", interner.lookup(name)),
        ExprKind::This => write!(out, "this"),
        ExprKind::Field { receiver, name } => {
            out.push_str("(. ");
            write_expr(out, arena, receiver, interner);
            write!(out, " {})", interner.lookup(name))
        }
        ExprKind::Index { receiver, index } => {
            out.push_str("([] ");
            write_expr(out, arena, receiver, interner);
            out.push(' ');
            write_expr(out, arena, index, interner);
            write!(out, ")")
        }
        ExprKind::MethodCall {
            receiver,
            method,
            args,
        } => {
            write!(out, "(.{} ", interner.lookup(method)).ok();
            write_expr(out, arena, receiver, interner);
            for &arg in arena.get_expr_list(args) {
                out.push(' ');
                write_expr(out, arena, arg, interner);
            }
            write!(out, ")")
        }
        ExprKind::Call { func, args } => {
            write!(out, "(call {}", interner.lookup(func)).ok();
            for &arg in arena.get_expr_list(args) {
                out.push(' ');
                write_expr(out, arena, arg, interner);
            }
            write!(out, ")")
        }
        ExprKind::Unary { op, operand } => {
            write!(out, "({} ", op.as_symbol()).ok();
            write_expr(out, arena, operand, interner);
            write!(out, ")")
        }
        ExprKind::Binary { op, left, right } => {
            write!(out, "({} ", op.as_symbol()).ok();
            write_expr(out, arena, left, interner);
            out.push(' ');
            write_expr(out, arena, right, interner);
            write!(out, ")")
        }
        ExprKind::Ternary {
            cond,
            then_expr,
            else_expr,
        } => {
            out.push_str("(? ");
            write_expr(out, arena, cond, interner);
            out.push(' ');
            write_expr(out, arena, then_expr, interner);
            out.push(' ');
            write_expr(out, arena, else_expr, interner);
            write!(out, ")")
        }
        ExprKind::Collection(items) => {
            out.push('[');
            for (i, &item) in arena.get_expr_list(items).iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                write_expr(out, arena, item, interner);
            }
            write!(out, "]")
        }
        ExprKind::Template { head, parts } => {
            write!(out, "(template {:?}", interner.lookup(head)).ok();
            for part in arena.get_template_parts(parts) {
                out.push(' ');
                write_expr(out, arena, part.expr, interner);
                write!(out, " {:?}", interner.lookup(part.text_after)).ok();
            }
            write!(out, ")")
        }
    };
}
