//! Continuation compiler and binding emitter.
//!
//! [`compile_expression`] runs the whole pipeline for one binding request:
//! parse, resolve and type, compile the continuation, then emit either a
//! run-once program or a live [`BindingUnit`].

mod continuation;
mod emitter;
mod error;

use bind_ir::StringInterner;
use bind_parse::TypeHint;
use bind_types::{ClassRegistry, Scope};

pub use continuation::{Continuation, ContinuationCompiler, Dependency, SetterWrite};
pub use emitter::{BindingEmitter, BindingMode, BindingUnit, CompiledExpr, TargetSlot};
pub use error::CompileError;

/// Compile the expression `source` for `slot`.
#[tracing::instrument(level = "debug", skip_all, fields(source = source))]
pub fn compile_expression(
    source: &str,
    slot: &TargetSlot,
    mode: BindingMode,
    scope: &Scope,
    registry: &ClassRegistry,
    interner: &StringInterner,
) -> Result<CompiledExpr, CompileError> {
    let parsed = bind_parse::parse(source, TypeHint::Expected(slot.ty.clone()), interner)?;
    let typed = bind_types::check(&parsed, scope, registry, interner)?;
    let cont = ContinuationCompiler::new(&parsed, &typed, scope, registry, interner).compile()?;
    let span = parsed.arena.get_expr(parsed.root).span;
    BindingEmitter::new(registry, interner).emit(&cont, &typed, slot, mode, span, source)
}
