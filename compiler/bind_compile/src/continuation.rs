//! Continuation compiler.
//!
//! Bottom-up walk of a resolved expression. Each node becomes a
//! [`Continuation`]: a render command, its type, whether it can run once at
//! construction (`can_be_run`), and the reactive dependencies it reads.
//!
//! A reactive read contributes one [`Dependency`], the (owner, accessor)
//! pair that yields the observable, and renders the observable's current
//! value. Interior nodes concatenate their children's dependencies
//! depth-first, left to right; duplicates are kept until steps are
//! assigned.

use std::fmt;
use std::rc::Rc;

use bind_ir::{
    BinaryOp, Constant, Emitter, ExprId, ExprKind, ExprRange, MethodId, Name, Op, OperandKind,
    Prim, Program, Span, StringInterner, Type,
};
use bind_parse::ParsedExpr;
use bind_stack::ensure_sufficient_stack;
use bind_types::operators::{binary_typing, unary_typing, BinaryTyping};
use bind_types::{
    builtins, coercion, operand_coercion, ClassRegistry, Coercion, Emit, Resolution, Scope,
    TypedExpr,
};

use crate::error::CompileError;

/// One reactive read: evaluating `owner` (or nothing) and then `accessor`
/// yields the observable.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Dependency {
    pub owner: Option<Program>,
    pub accessor: Program,
    /// The owner or accessor itself reads reactive values, so the
    /// observable must be re-resolved when those change.
    pub dynamic: bool,
}

/// Write path of a reactive read whose model is read-only: render `owner`,
/// then call `method` with the new value.
#[derive(Clone)]
pub struct SetterWrite {
    pub owner: Emit,
    pub method: MethodId,
}

/// Compiled, classified form of one expression node.
#[derive(Clone)]
pub struct Continuation {
    pub render: Emit,
    /// Declared type; an observable for reactive reads.
    pub ty: Type,
    pub can_be_run: bool,
    pub dependencies: Vec<Dependency>,
    /// For reactive reads: renders the observable instead of its value.
    pub observable: Option<Emit>,
    pub setter: Option<SetterWrite>,
}

impl Continuation {
    fn plain(ty: Type, render: Emit) -> Self {
        Continuation {
            render,
            ty,
            can_be_run: true,
            dependencies: Vec::new(),
            observable: None,
            setter: None,
        }
    }

    fn constant(ty: Type, value: Constant) -> Self {
        Continuation::plain(ty, Rc::new(move |e: &mut Emitter| e.emit(Op::Push(value.clone()))))
    }

    /// Program rendering the node's value.
    pub fn program(&self) -> Program {
        program_of(&self.render)
    }

    pub fn value_type(&self) -> &Type {
        self.ty.value_type()
    }
}

impl fmt::Debug for Continuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Continuation")
            .field("ty", &self.ty)
            .field("can_be_run", &self.can_be_run)
            .field("dependencies", &self.dependencies)
            .field("program", &self.program())
            .finish_non_exhaustive()
    }
}

pub(crate) fn program_of(render: &Emit) -> Program {
    let mut e = Emitter::new();
    render(&mut e);
    e.finish()
}

pub(crate) fn emit_coercion(e: &mut Emitter, coercion: &Coercion) {
    for conversion in coercion {
        e.emit(Op::Convert(*conversion));
    }
}

/// Render `base`, then apply `coercion`.
pub(crate) fn coerced(base: &Emit, coercion: Coercion) -> Emit {
    if coercion.is_empty() {
        return Rc::clone(base);
    }
    let base = Rc::clone(base);
    Rc::new(move |e: &mut Emitter| {
        base(e);
        emit_coercion(e, &coercion);
    })
}

pub struct ContinuationCompiler<'a> {
    parsed: &'a ParsedExpr,
    typed: &'a TypedExpr,
    scope: &'a Scope,
    registry: &'a ClassRegistry,
    interner: &'a StringInterner,
}

impl<'a> ContinuationCompiler<'a> {
    pub fn new(
        parsed: &'a ParsedExpr,
        typed: &'a TypedExpr,
        scope: &'a Scope,
        registry: &'a ClassRegistry,
        interner: &'a StringInterner,
    ) -> Self {
        ContinuationCompiler {
            parsed,
            typed,
            scope,
            registry,
            interner,
        }
    }

    #[tracing::instrument(level = "trace", skip_all)]
    pub fn compile(&self) -> Result<Continuation, CompileError> {
        self.node(self.parsed.root)
    }

    fn node(&self, id: ExprId) -> Result<Continuation, CompileError> {
        ensure_sufficient_stack(|| self.node_kind(id))
    }

    fn span(&self, id: ExprId) -> Span {
        self.parsed.arena.get_expr(id).span
    }

    fn ty(&self, id: ExprId) -> Type {
        self.typed.type_of(id).clone()
    }

    fn internal(&self, id: ExprId, message: &str) -> CompileError {
        CompileError::Internal {
            span: self.span(id),
            message: message.to_string(),
        }
    }

    fn node_kind(&self, id: ExprId) -> Result<Continuation, CompileError> {
        let ty = self.ty(id);
        let cont = match self.parsed.arena.get_expr(id).kind {
            ExprKind::Null => Continuation::constant(ty, Constant::Null),
            ExprKind::Bool(b) => Continuation::constant(ty, Constant::Bool(b)),
            ExprKind::Int(v) => Continuation::constant(ty, Constant::Int(v)),
            ExprKind::Long(v) => Continuation::constant(ty, Constant::Long(v)),
            ExprKind::Float(bits) => Continuation::constant(ty, Constant::Float(bits)),
            ExprKind::Double(bits) => Continuation::constant(ty, Constant::Double(bits)),
            ExprKind::Char(c) => Continuation::constant(ty, Constant::Char(c)),
            ExprKind::Str(name) => {
                Continuation::constant(ty, Constant::Str(self.interner.lookup(name).into()))
            }
            ExprKind::This => Continuation::plain(ty, self.scope.this().access),
            ExprKind::Ident(name) => match self.typed.resolution(id) {
                Some(Resolution::Scope(_)) => {
                    let loadable = self
                        .scope
                        .get(name)
                        .ok_or_else(|| self.internal(id, "identifier missing from scope"))?;
                    let owner = loadable
                        .owner
                        .as_ref()
                        .map(|owner| Continuation::plain(Type::Object, Rc::clone(owner)));
                    let setter = loadable
                        .owner
                        .as_ref()
                        .zip(loadable.setter)
                        .map(|(owner, method)| SetterWrite {
                            owner: Rc::clone(owner),
                            method,
                        });
                    Continuation {
                        setter,
                        ..access(owner, Vec::new(), Rc::clone(&loadable.access), ty)
                    }
                }
                Some(Resolution::Method(method)) => {
                    let method = *method;
                    access(
                        Some(self.this()),
                        Vec::new(),
                        Rc::new(move |e: &mut Emitter| e.emit(Op::Call { method, argc: 0 })),
                        ty,
                    )
                }
                _ => return Err(self.internal(id, "unresolved identifier")),
            },
            ExprKind::Field { receiver, .. } => {
                let Some(Resolution::Property(property)) = self.typed.resolution(id) else {
                    return Err(self.internal(id, "unresolved member"));
                };
                let recv = self.node(receiver)?;
                let setter = property.reactive_setter().map(|method| SetterWrite {
                    owner: Rc::clone(&recv.render),
                    method,
                });
                let property = property.clone();
                Continuation {
                    setter,
                    ..access(
                        Some(recv),
                        Vec::new(),
                        Rc::new(move |e: &mut Emitter| property.emit_accessor(e)),
                        ty,
                    )
                }
            }
            ExprKind::Index { receiver, index } => {
                let recv = self.node(receiver)?;
                let idx = self.node(index)?;
                let idx_coercion = operand_coercion(idx.value_type(), Prim::Int);
                let idx = with_render(&idx, coerced(&idx.render, idx_coercion));
                access(Some(recv), vec![idx], emit_op(Op::Index), ty)
            }
            ExprKind::MethodCall { receiver, args, .. } => {
                let recv = self.node(receiver)?;
                self.call(id, recv, args, ty)?
            }
            ExprKind::Call { args, .. } => self.call(id, self.this(), args, ty)?,
            ExprKind::Unary { op, operand } => {
                let inner = self.node(operand)?;
                let prim = unary_typing(op, inner.value_type())
                    .ok_or_else(|| self.internal(id, "untyped unary operand"))?;
                let operand_render = coerced(&inner.render, operand_coercion(inner.value_type(), prim));
                let kind = OperandKind::of_prim(prim);
                combine(ty, &[&inner], move |e| {
                    operand_render(e);
                    e.emit(Op::Unary { op, kind });
                })
            }
            ExprKind::Binary { op, left, right } => {
                let l = self.node(left)?;
                let r = self.node(right)?;
                self.binary(id, op, &l, &r, ty)?
            }
            ExprKind::Ternary {
                cond,
                then_expr,
                else_expr,
            } => {
                let c = self.node(cond)?;
                let a = self.node(then_expr)?;
                let b = self.node(else_expr)?;
                let result = ty.value_type().clone();
                let cond_render = coerced(&c.render, operand_coercion(c.value_type(), Prim::Boolean));
                let then_render = coerced(&a.render, self.coerce(then_expr, a.value_type(), &result)?);
                let else_render = coerced(&b.render, self.coerce(else_expr, b.value_type(), &result)?);
                combine(ty, &[&c, &a, &b], move |e| {
                    cond_render(e);
                    let to_else = e.emit_jump_if_false();
                    then_render(e);
                    let to_end = e.emit_jump();
                    e.bind(to_else);
                    else_render(e);
                    e.bind(to_end);
                })
            }
            ExprKind::Collection(items) => {
                let element = match ty.value_type() {
                    Type::Array(component) => component.as_ref().clone(),
                    _ => Type::Object,
                };
                let make: fn(u16) -> Op = match ty.value_type() {
                    Type::Array(_) => Op::MakeArray,
                    _ => Op::MakeList,
                };
                let ids = self.parsed.arena.get_expr_list(items).to_vec();
                let mut children = Vec::with_capacity(ids.len());
                let mut renders = Vec::with_capacity(ids.len());
                for item in ids {
                    let child = self.node(item)?;
                    renders.push(coerced(&child.render, self.coerce(item, child.value_type(), &element)?));
                    children.push(child);
                }
                let count = self.count(id, renders.len())?;
                let refs: Vec<&Continuation> = children.iter().collect();
                combine(ty, &refs, move |e| {
                    for render in &renders {
                        render(e);
                    }
                    e.emit(make(count));
                })
            }
            ExprKind::Template { head, parts } => {
                let mut children = Vec::new();
                let mut pieces: Vec<Emit> = Vec::new();
                if head != Name::EMPTY {
                    pieces.push(push_str(self.interner.lookup(head)));
                }
                for part in self.parsed.arena.get_template_parts(parts).to_vec() {
                    let child = self.node(part.expr)?;
                    pieces.push(Rc::clone(&child.render));
                    children.push(child);
                    if part.text_after != Name::EMPTY {
                        pieces.push(push_str(self.interner.lookup(part.text_after)));
                    }
                }
                let count = self.count(id, pieces.len())?;
                let refs: Vec<&Continuation> = children.iter().collect();
                combine(ty, &refs, move |e| match count {
                    0 => e.emit(Op::Push(Constant::Str("".into()))),
                    _ => {
                        for piece in &pieces {
                            piece(e);
                        }
                        e.emit(Op::Concat(count));
                    }
                })
            }
        };
        Ok(cont)
    }

    fn this(&self) -> Continuation {
        let this = self.scope.this();
        Continuation::plain(this.ty, this.access)
    }

    fn count(&self, id: ExprId, n: usize) -> Result<u16, CompileError> {
        u16::try_from(n).map_err(|_| self.internal(id, "too many operands"))
    }

    fn coerce(&self, id: ExprId, from: &Type, to: &Type) -> Result<Coercion, CompileError> {
        coercion(from, to, self.registry).ok_or_else(|| self.internal(id, "missing conversion"))
    }

    /// Host method or built-in call on `recv`.
    fn call(
        &self,
        id: ExprId,
        recv: Continuation,
        args: ExprRange,
        ty: Type,
    ) -> Result<Continuation, CompileError> {
        let (params, op): (Vec<Type>, Op) = match self.typed.resolution(id) {
            Some(Resolution::Method(method)) => {
                let def = self.registry.method(*method);
                let argc = u8::try_from(def.params.len())
                    .map_err(|_| self.internal(id, "too many arguments"))?;
                (
                    def.params.clone(),
                    Op::Call {
                        method: *method,
                        argc,
                    },
                )
            }
            Some(Resolution::Builtin(builtin)) => {
                (builtins::params(*builtin).to_vec(), Op::Builtin(*builtin))
            }
            _ => return Err(self.internal(id, "unresolved call")),
        };

        let ids = self.parsed.arena.get_expr_list(args).to_vec();
        let mut compiled = Vec::with_capacity(ids.len());
        for (arg, param) in ids.into_iter().zip(&params) {
            let child = self.node(arg)?;
            let conversion = self.coerce(arg, child.value_type(), param)?;
            compiled.push(with_render(&child, coerced(&child.render, conversion)));
        }
        Ok(access(Some(recv), compiled, emit_op(op), ty))
    }

    fn binary(
        &self,
        id: ExprId,
        op: BinaryOp,
        l: &Continuation,
        r: &Continuation,
        ty: Type,
    ) -> Result<Continuation, CompileError> {
        let typing = binary_typing(op, l.value_type(), r.value_type())
            .ok_or_else(|| self.internal(id, "untyped binary operands"))?;
        let cont = match typing {
            BinaryTyping::Concat => {
                let (lr, rr) = (Rc::clone(&l.render), Rc::clone(&r.render));
                combine(ty, &[l, r], move |e| {
                    lr(e);
                    rr(e);
                    e.emit(Op::Concat(2));
                })
            }
            BinaryTyping::Reference => {
                let (lr, rr) = (Rc::clone(&l.render), Rc::clone(&r.render));
                combine(ty, &[l, r], move |e| {
                    lr(e);
                    rr(e);
                    e.emit(Op::Binary {
                        op,
                        kind: OperandKind::Ref,
                    });
                })
            }
            BinaryTyping::Primitive { operand, .. } => {
                let lr = coerced(&l.render, operand_coercion(l.value_type(), operand));
                let rr = coerced(&r.render, operand_coercion(r.value_type(), operand));
                let kind = OperandKind::of_prim(operand);
                match op {
                    BinaryOp::And => combine(ty, &[l, r], move |e| {
                        lr(e);
                        let short = e.emit_jump_if_false();
                        rr(e);
                        let end = e.emit_jump();
                        e.bind(short);
                        e.emit(Op::Push(Constant::Bool(false)));
                        e.bind(end);
                    }),
                    BinaryOp::Or => combine(ty, &[l, r], move |e| {
                        lr(e);
                        let rhs = e.emit_jump_if_false();
                        e.emit(Op::Push(Constant::Bool(true)));
                        let end = e.emit_jump();
                        e.bind(rhs);
                        rr(e);
                        e.bind(end);
                    }),
                    _ => combine(ty, &[l, r], move |e| {
                        lr(e);
                        rr(e);
                        e.emit(Op::Binary { op, kind });
                    }),
                }
            }
        };
        Ok(cont)
    }
}

fn emit_op(op: Op) -> Emit {
    Rc::new(move |e: &mut Emitter| e.emit(op.clone()))
}

fn push_str(text: &str) -> Emit {
    emit_op(Op::Push(Constant::Str(text.into())))
}

fn with_render(base: &Continuation, render: Emit) -> Continuation {
    Continuation {
        render,
        ..base.clone()
    }
}

/// Interior node: children's classification and dependencies, own render.
fn combine(ty: Type, children: &[&Continuation], render: impl Fn(&mut Emitter) + 'static) -> Continuation {
    Continuation {
        render: Rc::new(render),
        ty,
        can_be_run: children.iter().all(|c| c.can_be_run),
        dependencies: children
            .iter()
            .flat_map(|c| c.dependencies.iter().cloned())
            .collect(),
        observable: None,
        setter: None,
    }
}

/// `owner`, then `args`, then `accessor`. When `ty` is observable this is
/// a reactive read and contributes its own dependency after the children's.
fn access(owner: Option<Continuation>, args: Vec<Continuation>, accessor: Emit, ty: Type) -> Continuation {
    let children: Vec<&Continuation> = owner.iter().chain(&args).collect();
    let can_be_run = children.iter().all(|c| c.can_be_run);
    let mut dependencies: Vec<Dependency> = children
        .iter()
        .flat_map(|c| c.dependencies.iter().cloned())
        .collect();

    let arg_renders: Vec<Emit> = args.iter().map(|a| Rc::clone(&a.render)).collect();
    let full_accessor: Emit = Rc::new(move |e: &mut Emitter| {
        for render in &arg_renders {
            render(e);
        }
        accessor(e);
    });
    let owner_render = owner.as_ref().map(|o| Rc::clone(&o.render));
    let load: Emit = {
        let owner_render = owner_render.clone();
        let full_accessor = Rc::clone(&full_accessor);
        Rc::new(move |e: &mut Emitter| {
            if let Some(owner) = &owner_render {
                owner(e);
            }
            full_accessor(e);
        })
    };

    if !ty.is_observable() {
        return Continuation {
            render: load,
            ty,
            can_be_run,
            dependencies,
            observable: None,
            setter: None,
        };
    }

    dependencies.push(Dependency {
        owner: owner_render.as_ref().map(program_of),
        accessor: program_of(&full_accessor),
        dynamic: !can_be_run,
    });
    let read = Rc::clone(&load);
    Continuation {
        render: Rc::new(move |e: &mut Emitter| {
            read(e);
            e.emit(Op::ObservableValue);
        }),
        ty,
        can_be_run: false,
        dependencies,
        observable: Some(load),
        setter: None,
    }
}
