//! Binding emitter.
//!
//! Decides what a compiled expression becomes at its target slot:
//!
//! - runnable once (no reactive reads): a constant program
//! - reactive reads feeding an observable target: a [`BindingUnit`] whose
//!   dependencies are deduplicated into steps in first-discovery order
//! - reactive reads feeding a plain target: `E3001`
//!
//! Bidirectional requests additionally need a writable property path and
//! get a write-back program. It stores into the model, or calls the
//! property's setter when the model is read-only.

use std::rc::Rc;

use bind_ir::{Emitter, Op, Program, Span, Step, StringInterner, Type};
use bind_types::{coercion, ClassRegistry, TypeError, TypeErrorKind, TypedExpr};
use rustc_hash::FxHashSet;

use crate::continuation::{emit_coercion, Continuation, Dependency};
use crate::error::CompileError;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum BindingMode {
    /// Source to target only.
    #[default]
    Once,
    /// Source to target, and target changes written back to the source.
    Bidirectional,
}

/// The slot an expression's value is assigned to.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TargetSlot {
    pub ty: Type,
}

impl TargetSlot {
    pub fn new(ty: Type) -> Self {
        TargetSlot { ty }
    }

    /// Observable slots can host a live binding.
    pub fn is_reactive(&self) -> bool {
        self.ty.is_observable()
    }
}

/// A live binding: one delegate's worth of compiled code.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BindingUnit {
    program: Program,
    steps: Vec<Dependency>,
    write_back: Option<Program>,
    value_type: Type,
}

impl BindingUnit {
    /// Computes the binding's value, already converted for the target.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Distinct dependencies; the index is the step.
    pub fn dependencies(&self) -> &[Dependency] {
        &self.steps
    }

    pub fn steps(&self) -> impl Iterator<Item = (Step, &Dependency)> {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, dep)| (Step(u32::try_from(i).unwrap_or(u32::MAX)), dep))
    }

    pub fn dependency_count(&self) -> usize {
        self.steps.len()
    }

    /// Stores the argument into the source property (bidirectional only).
    pub fn write_back(&self) -> Option<&Program> {
        self.write_back.as_ref()
    }

    pub fn value_type(&self) -> &Type {
        &self.value_type
    }
}

/// Result of compiling one binding request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CompiledExpr {
    /// Evaluated once at construction; never subscribes.
    Constant { program: Program, ty: Type },
    Binding(Rc<BindingUnit>),
}

impl CompiledExpr {
    pub fn is_live(&self) -> bool {
        matches!(self, CompiledExpr::Binding(_))
    }

    pub fn program(&self) -> &Program {
        match self {
            CompiledExpr::Constant { program, .. } => program,
            CompiledExpr::Binding(unit) => unit.program(),
        }
    }

    pub fn as_binding(&self) -> Option<&Rc<BindingUnit>> {
        match self {
            CompiledExpr::Binding(unit) => Some(unit),
            CompiledExpr::Constant { .. } => None,
        }
    }
}

pub struct BindingEmitter<'a> {
    registry: &'a ClassRegistry,
    interner: &'a StringInterner,
}

impl<'a> BindingEmitter<'a> {
    pub fn new(registry: &'a ClassRegistry, interner: &'a StringInterner) -> Self {
        BindingEmitter { registry, interner }
    }

    /// Emit `cont`, the root of an expression spanning `span` in `source`.
    #[tracing::instrument(level = "debug", skip_all, fields(mode = ?mode))]
    pub fn emit(
        &self,
        cont: &Continuation,
        typed: &TypedExpr,
        slot: &TargetSlot,
        mode: BindingMode,
        span: Span,
        source: &str,
    ) -> Result<CompiledExpr, CompileError> {
        let program = {
            let mut e = Emitter::new();
            (cont.render)(&mut e);
            emit_coercion(&mut e, typed.target_coercion());
            e.finish()
        };
        let value_type = slot.ty.value_type().clone();

        let write_back = match mode {
            BindingMode::Bidirectional => Some(self.write_back(cont, slot, span, source)?),
            BindingMode::Once if cont.can_be_run => {
                tracing::debug!("binding runs once");
                return Ok(CompiledExpr::Constant {
                    program,
                    ty: value_type,
                });
            }
            BindingMode::Once if !slot.is_reactive() => {
                return Err(CompileError::LiveBindingOnPlainTarget {
                    span,
                    target: self.registry.display_type(&slot.ty, self.interner),
                });
            }
            BindingMode::Once => None,
        };

        let steps = distinct(&cont.dependencies);
        tracing::debug!(
            discovered = cont.dependencies.len(),
            steps = steps.len(),
            "binding is live"
        );
        Ok(CompiledExpr::Binding(Rc::new(BindingUnit {
            program,
            steps,
            write_back,
            value_type,
        })))
    }

    fn write_back(
        &self,
        cont: &Continuation,
        slot: &TargetSlot,
        span: Span,
        source: &str,
    ) -> Result<Program, CompileError> {
        let bidirectional = |reason| CompileError::Bidirectional { span, reason };
        match &slot.ty {
            Type::Observable { writable: true, .. } => {}
            Type::Observable { .. } => return Err(bidirectional("the target is read-only")),
            _ => return Err(bidirectional("the target is not observable")),
        }
        let Some(observable) = &cont.observable else {
            return Err(bidirectional("the expression is not a property path"));
        };
        if !matches!(cont.ty, Type::Observable { writable: true, .. }) {
            return Err(TypeError::new(
                TypeErrorKind::ReadOnly {
                    path: source.trim().to_string(),
                },
                span,
            )
            .into());
        }
        let conversion = coercion(slot.ty.value_type(), cont.value_type(), self.registry)
            .ok_or_else(|| bidirectional("the target and source types differ"))?;

        let mut e = Emitter::new();
        if let Some(setter) = &cont.setter {
            let param = self
                .registry
                .method(setter.method)
                .params
                .first()
                .ok_or_else(|| bidirectional("the setter takes no value"))?;
            let conversion = coercion(slot.ty.value_type(), param, self.registry)
                .ok_or_else(|| bidirectional("the target and setter types differ"))?;
            (setter.owner)(&mut e);
            e.emit(Op::LoadArg);
            emit_coercion(&mut e, &conversion);
            e.emit(Op::Call {
                method: setter.method,
                argc: 1,
            });
            e.emit(Op::Pop);
            return Ok(e.finish());
        }
        observable(&mut e);
        e.emit(Op::LoadArg);
        emit_coercion(&mut e, &conversion);
        e.emit(Op::SetObservable);
        Ok(e.finish())
    }
}

/// First occurrence of each structurally distinct dependency.
fn distinct(dependencies: &[Dependency]) -> Vec<Dependency> {
    let mut seen = FxHashSet::default();
    dependencies
        .iter()
        .filter(|dep| seen.insert(*dep))
        .cloned()
        .collect()
}
