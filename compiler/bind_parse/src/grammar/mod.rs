//! Expression grammar.
//!
//! - `expr.rs`: ternary, binary precedence chain, unary
//! - `postfix.rs`: member access, method calls, indexing
//! - `primary.rs`: literals, names, parentheses, collections
//! - `template.rs`: template strings

mod expr;
mod postfix;
mod primary;
mod template;
