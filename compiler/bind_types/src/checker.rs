//! Type & overload resolution.
//!
//! Walks a parsed expression once, assigning every reachable node its
//! declared type and recording how identifiers, members and calls were
//! resolved. A node whose declared type is an observable is a reactive
//! read: parents see its value type.

use bind_ir::{
    BuiltinMethod, ExprArena, ExprId, ExprKind, MethodId, Name, Prim, Span, StringInterner, Type,
};
use bind_parse::ParsedExpr;
use bind_stack::ensure_sufficient_stack;
use rustc_hash::FxHashMap;

use crate::assign::{coercion, slot_coercion, Coercion};
use crate::builtins::{self, builtins_of};
use crate::error::{MismatchContext, TypeError, TypeErrorKind};
use crate::operators::{binary_typing, conditional_type, unary_typing};
use crate::overload::{select, OverloadError, Signature};
use crate::property::{property_names, resolve_property, Property};
use crate::registry::ClassRegistry;
use crate::scope::Scope;
use crate::suggest::suggest_similar;

/// How a node was resolved.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Resolution {
    /// Identifier bound in the scope.
    Scope(Name),
    Property(Property),
    /// Host method. Free calls and method identifiers use `this` as the
    /// receiver.
    Method(MethodId),
    Builtin(BuiltinMethod),
}

/// A fully resolved expression.
#[derive(Clone, Debug)]
pub struct TypedExpr {
    types: Vec<Type>,
    resolutions: FxHashMap<ExprId, Resolution>,
    root: ExprId,
    target_coercion: Coercion,
}

impl TypedExpr {
    /// Declared type of a node (observable for reactive reads).
    pub fn type_of(&self, id: ExprId) -> &Type {
        &self.types[id.index()]
    }

    pub fn resolution(&self, id: ExprId) -> Option<&Resolution> {
        self.resolutions.get(&id)
    }

    pub fn root(&self) -> ExprId {
        self.root
    }

    pub fn root_type(&self) -> &Type {
        self.type_of(self.root)
    }

    /// Conversions from the root value into the target slot's value type.
    pub fn target_coercion(&self) -> &Coercion {
        &self.target_coercion
    }
}

/// Resolve and type `parsed` in `scope`; the parse hint is the target slot.
#[tracing::instrument(level = "debug", skip_all, fields(nodes = parsed.arena.len()))]
pub fn check(
    parsed: &ParsedExpr,
    scope: &Scope,
    registry: &ClassRegistry,
    interner: &StringInterner,
) -> Result<TypedExpr, TypeError> {
    let mut checker = TypeChecker {
        arena: &parsed.arena,
        scope,
        registry,
        interner,
        types: vec![Type::Void; parsed.arena.len()],
        resolutions: FxHashMap::default(),
    };

    let expected = parsed.hint.expected();
    let root_ty = checker.infer(parsed.root, expected)?;
    let target_coercion = match expected {
        Some(slot) => checker.target(&root_ty, slot, parsed.root)?,
        None => Coercion::new(),
    };

    tracing::trace!(root = %root_ty, "resolved");
    Ok(TypedExpr {
        types: checker.types,
        resolutions: checker.resolutions,
        root: parsed.root,
        target_coercion,
    })
}

struct TypeChecker<'a> {
    arena: &'a ExprArena,
    scope: &'a Scope,
    registry: &'a ClassRegistry,
    interner: &'a StringInterner,
    types: Vec<Type>,
    resolutions: FxHashMap<ExprId, Resolution>,
}

impl TypeChecker<'_> {
    fn infer(&mut self, id: ExprId, expected: Option<&Type>) -> Result<Type, TypeError> {
        let ty = ensure_sufficient_stack(|| self.infer_kind(id, expected))?;
        self.types[id.index()] = ty.clone();
        Ok(ty)
    }

    /// Value type of a child, reading through observables.
    fn value(&mut self, id: ExprId, expected: Option<&Type>) -> Result<Type, TypeError> {
        Ok(self.infer(id, expected)?.value_type().clone())
    }

    fn span(&self, id: ExprId) -> Span {
        self.arena.get_expr(id).span
    }

    fn show(&self, ty: &Type) -> String {
        self.registry.display_type(ty, self.interner)
    }

    fn infer_kind(&mut self, id: ExprId, expected: Option<&Type>) -> Result<Type, TypeError> {
        let span = self.span(id);
        match self.arena.get_expr(id).kind {
            ExprKind::Null => Ok(Type::Null),
            ExprKind::Bool(_) => Ok(Type::BOOLEAN),
            ExprKind::Int(_) => Ok(Type::INT),
            ExprKind::Long(_) => Ok(Type::LONG),
            ExprKind::Float(_) => Ok(Type::Prim(Prim::Float)),
            ExprKind::Double(_) => Ok(Type::DOUBLE),
            ExprKind::Char(_) => Ok(Type::Prim(Prim::Char)),
            ExprKind::Str(_) => Ok(Type::Str),
            ExprKind::Template { parts, .. } => {
                for part in self.arena.get_template_parts(parts).to_vec() {
                    let ty = self.value(part.expr, None)?;
                    if ty == Type::Void {
                        return Err(self.mismatch(&Type::Str, &ty, MismatchContext::Element, part.expr));
                    }
                }
                Ok(Type::Str)
            }
            ExprKind::This => Ok(Type::Class(self.scope.this_class())),
            ExprKind::Ident(name) => self.infer_ident(id, name, span),
            ExprKind::Field { receiver, name } => {
                let recv = self.value(receiver, None)?;
                match resolve_property(self.registry, &recv, name, self.interner) {
                    Some(property) => {
                        let ty = property.ty.clone();
                        self.resolutions.insert(id, Resolution::Property(property));
                        Ok(ty)
                    }
                    None => Err(self.unresolved_member(&recv, name, Vec::new(), span)),
                }
            }
            ExprKind::Index { receiver, index } => {
                let recv = self.value(receiver, None)?;
                let idx = self.value(index, None)?;
                if idx.numeric().filter(|p| p.is_integral()).map(Prim::promote_unary) != Some(Prim::Int) {
                    return Err(self.mismatch(&Type::INT, &idx, MismatchContext::Index, index));
                }
                match recv {
                    Type::Array(component) => Ok(*component),
                    Type::List => Ok(Type::Object),
                    other => Err(TypeError::new(
                        TypeErrorKind::InvalidOperator {
                            op: "[]",
                            operands: format!("`{}`", self.show(&other)),
                        },
                        span,
                    )),
                }
            }
            ExprKind::MethodCall {
                receiver,
                method,
                args,
            } => {
                let recv = self.value(receiver, None)?;
                let arg_ids = self.arena.get_expr_list(args).to_vec();
                let arg_types = self.values(&arg_ids)?;
                self.infer_method(id, &recv, method, &arg_ids, &arg_types, span)
            }
            ExprKind::Call { func, args } => {
                let arg_ids = self.arena.get_expr_list(args).to_vec();
                let arg_types = self.values(&arg_ids)?;
                let this = Type::Class(self.scope.this_class());
                if self.registry.methods_named(self.scope.this_class(), func).is_empty() {
                    return Err(self.unresolved_identifier(func, span));
                }
                self.infer_method(id, &this, func, &arg_ids, &arg_types, span)
            }
            ExprKind::Unary { op, operand } => {
                let ty = self.value(operand, None)?;
                match unary_typing(op, &ty) {
                    Some(prim) => Ok(Type::Prim(prim)),
                    None => Err(TypeError::new(
                        TypeErrorKind::InvalidOperator {
                            op: op.as_symbol(),
                            operands: format!("`{}`", self.show(&ty)),
                        },
                        span,
                    )),
                }
            }
            ExprKind::Binary { op, left, right } => {
                let l = self.value(left, None)?;
                let r = self.value(right, None)?;
                match binary_typing(op, &l, &r) {
                    Some(typing) => Ok(typing.result_type()),
                    None => Err(TypeError::new(
                        TypeErrorKind::InvalidOperator {
                            op: op.as_symbol(),
                            operands: format!("`{}` and `{}`", self.show(&l), self.show(&r)),
                        },
                        span,
                    )),
                }
            }
            ExprKind::Ternary {
                cond,
                then_expr,
                else_expr,
            } => {
                let c = self.value(cond, None)?;
                if !c.is_boolean_like() {
                    return Err(self.mismatch(&Type::BOOLEAN, &c, MismatchContext::Condition, cond));
                }
                let a = self.value(then_expr, expected)?;
                let b = self.value(else_expr, expected)?;
                conditional_type(&a, &b, self.registry).ok_or_else(|| {
                    TypeError::new(
                        TypeErrorKind::InvalidOperator {
                            op: "?:",
                            operands: format!("`{}` and `{}`", self.show(&a), self.show(&b)),
                        },
                        span,
                    )
                })
            }
            ExprKind::Collection(items) => {
                let component = expected.and_then(|ty| match ty.value_type() {
                    Type::Array(component) => Some(component.as_ref().clone()),
                    _ => None,
                });
                let element = component.clone().unwrap_or(Type::Object);
                for item in self.arena.get_expr_list(items).to_vec() {
                    let ty = self.value(item, component.as_ref())?;
                    if coercion(&ty, &element, self.registry).is_none() {
                        return Err(self.mismatch(&element, &ty, MismatchContext::Element, item));
                    }
                }
                Ok(component.map_or(Type::List, Type::array))
            }
        }
    }

    fn values(&mut self, ids: &[ExprId]) -> Result<Vec<Type>, TypeError> {
        ids.iter().map(|&id| self.value(id, None)).collect()
    }

    fn infer_ident(&mut self, id: ExprId, name: Name, span: Span) -> Result<Type, TypeError> {
        if let Some(loadable) = self.scope.get(name) {
            self.resolutions.insert(id, Resolution::Scope(name));
            return Ok(loadable.ty.clone());
        }
        // implicit-receiver method: `count` for `count()`
        let methods = self.registry.methods_named(self.scope.this_class(), name);
        if let Ok(index) = select(&methods, &[], self.registry) {
            let method = methods[index];
            self.resolutions.insert(id, Resolution::Method(method.id));
            return Ok(method.ret.clone());
        }
        Err(self.unresolved_identifier(name, span))
    }

    fn infer_method(
        &mut self,
        id: ExprId,
        receiver: &Type,
        method: Name,
        arg_ids: &[ExprId],
        arg_types: &[Type],
        span: Span,
    ) -> Result<Type, TypeError> {
        if let Type::Class(class) = receiver {
            let methods = self.registry.methods_named(*class, method);
            if methods.is_empty() {
                return Err(self.unresolved_member(receiver, method, Vec::new(), span));
            }
            let index = self.pick(&methods, receiver, method, arg_ids, arg_types, span)?;
            let chosen = methods[index];
            tracing::trace!(method = chosen.id.0, "overload selected");
            self.resolutions.insert(id, Resolution::Method(chosen.id));
            return Ok(chosen.ret.clone());
        }

        let text = self.interner.lookup(method);
        let candidates: Vec<BuiltinMethod> = builtins_of(receiver)
            .iter()
            .copied()
            .filter(|b| b.name() == text)
            .collect();
        if candidates.is_empty() {
            return Err(self.unresolved_member(receiver, method, Vec::new(), span));
        }
        let index = self.pick(&candidates, receiver, method, arg_ids, arg_types, span)?;
        let chosen = candidates[index];
        self.resolutions.insert(id, Resolution::Builtin(chosen));
        Ok(builtins::return_type(chosen))
    }

    fn pick<S: Signature>(
        &self,
        candidates: &[S],
        receiver: &Type,
        method: Name,
        arg_ids: &[ExprId],
        arg_types: &[Type],
        span: Span,
    ) -> Result<usize, TypeError> {
        let render = |c: &S| {
            let params: Vec<String> = c.params().iter().map(|p| self.show(p)).collect();
            format!("{}({})", self.interner.lookup(method), params.join(", "))
        };
        match select(candidates, arg_types, self.registry) {
            Ok(index) => Ok(index),
            Err(OverloadError::Mismatch { candidate, index }) => Err(self.mismatch(
                &candidates[candidate].params()[index],
                &arg_types[index],
                MismatchContext::Argument(index),
                arg_ids[index],
            )),
            Err(OverloadError::Ambiguous(indices)) => Err(TypeError::new(
                TypeErrorKind::AmbiguousOverload {
                    member: self.interner.lookup(method).to_string(),
                    candidates: indices.iter().map(|&i| render(&candidates[i])).collect(),
                },
                span,
            )),
            Err(OverloadError::NoCandidate | OverloadError::NoApplicable) => {
                let listed = candidates.iter().map(render).collect();
                Err(self.unresolved_member(receiver, method, listed, span))
            }
        }
    }

    /// Check the root against the target slot.
    fn target(&self, root: &Type, slot: &Type, root_id: ExprId) -> Result<Coercion, TypeError> {
        let from = root.value_type();
        let to = slot.value_type();
        slot_coercion(from, to, self.registry)
            .ok_or_else(|| self.mismatch(to, from, MismatchContext::Target, root_id))
    }

    fn mismatch(&self, expected: &Type, found: &Type, context: MismatchContext, at: ExprId) -> TypeError {
        TypeError::new(
            TypeErrorKind::TypeMismatch {
                expected: self.show(expected),
                found: self.show(found),
                context,
            },
            self.span(at),
        )
    }

    fn unresolved_identifier(&self, name: Name, span: Span) -> TypeError {
        let this = self.scope.this_class();
        let candidates: Vec<&str> = self
            .scope
            .names()
            .chain(self.registry.member_names(this))
            .map(|n| self.interner.lookup(n))
            .collect();
        let text = self.interner.lookup(name);
        TypeError::new(
            TypeErrorKind::UnresolvedIdentifier {
                name: text.to_string(),
                suggestion: suggest_similar(text, candidates),
            },
            span,
        )
    }

    fn unresolved_member(&self, receiver: &Type, member: Name, candidates: Vec<String>, span: Span) -> TypeError {
        let text = self.interner.lookup(member);
        let known: Vec<&str> = match receiver {
            Type::Class(class) => property_names(self.registry, *class, self.interner)
                .into_iter()
                .chain(self.registry.member_names(*class))
                .map(|n| self.interner.lookup(n))
                .collect(),
            Type::Array(_) => vec!["length"],
            other => builtins_of(other).iter().map(|b| b.name()).collect(),
        };
        TypeError::new(
            TypeErrorKind::UnresolvedMember {
                receiver: self.show(receiver),
                member: text.to_string(),
                suggestion: suggest_similar(text, known),
                candidates,
            },
            span,
        )
    }
}

#[cfg(test)]
mod tests;
