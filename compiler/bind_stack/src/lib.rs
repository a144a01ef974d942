//! Stack guard for recursive compiler passes.
//!
//! The parser, the type checker and the continuation compiler all recurse on
//! the expression tree. Markup authors can nest parentheses or ternaries
//! arbitrarily, so every recursive entry point runs through
//! [`ensure_sufficient_stack`], which grows the stack on demand.
//!
//! On `wasm32` the guard is a passthrough.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if the red zone has been reached.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
