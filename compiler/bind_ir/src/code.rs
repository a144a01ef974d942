//! Emitted code.
//!
//! Render commands and loadables emit into an [`Emitter`], which builds a
//! [`Program`]: a flat sequence of stack-machine [`Op`]s evaluated by the
//! runtime. Programs are plain data (`Eq + Hash`), so the (owner, accessor)
//! pairs of two dependencies compare structurally.
//!
//! # Stack discipline
//!
//! Every complete expression program leaves exactly one value on the stack.
//! An *accessor* program runs with its owner's value already on the stack
//! and replaces it with the observable it selects.

use std::fmt;

use crate::{BinaryOp, FieldId, MethodId, Prim, UnaryOp};

/// Handle of one registered dependency subscription inside a delegate.
///
/// Assigned in first-discovery order at compile time; never reused.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Step(pub u32);

impl Step {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step#{}", self.0)
    }
}

/// Constant operand. Floats are stored as bits to keep `Eq + Hash`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Constant {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(u32),
    Double(u64),
    Char(char),
    Str(Box<str>),
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Null => f.write_str("null"),
            Constant::Bool(b) => write!(f, "{b}"),
            Constant::Int(i) => write!(f, "{i}"),
            Constant::Long(i) => write!(f, "{i}L"),
            Constant::Float(bits) => write!(f, "{}f", f32::from_bits(*bits)),
            Constant::Double(bits) => write!(f, "{}d", f64::from_bits(*bits)),
            Constant::Char(c) => write!(f, "{c:?}"),
            Constant::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// Operand kind of a typed unary/binary operator.
///
/// The compiler converts both operands to this kind before the operator.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum OperandKind {
    Int,
    Long,
    Float,
    Double,
    Bool,
    /// Reference equality operands (compared by value equality).
    Ref,
}

impl OperandKind {
    /// Operand kind for a promoted primitive.
    pub fn of_prim(prim: Prim) -> OperandKind {
        match prim {
            Prim::Boolean => OperandKind::Bool,
            Prim::Long => OperandKind::Long,
            Prim::Float => OperandKind::Float,
            Prim::Double => OperandKind::Double,
            Prim::Byte | Prim::Short | Prim::Char | Prim::Int => OperandKind::Int,
        }
    }
}

/// Value conversions inserted by the compiler.
///
/// Boxing is a runtime no-op and has no conversion; reference widening is
/// likewise free.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Conversion {
    /// Widening (or same-width) primitive conversion.
    Widen { from: Prim, to: Prim },
    /// Unboxing with a null check.
    Unbox(Prim),
    /// String conversion.
    ToStr,
}

/// Members the runtime implements for `String` and `List` receivers.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BuiltinMethod {
    StrLength,
    StrIsEmpty,
    StrToUpperCase,
    StrToLowerCase,
    StrTrim,
    StrContains,
    StrCharAt,
    ListSize,
    ListIsEmpty,
    ListGet,
}

impl BuiltinMethod {
    /// Number of arguments (excluding the receiver).
    pub const fn arity(self) -> usize {
        match self {
            BuiltinMethod::StrContains | BuiltinMethod::StrCharAt | BuiltinMethod::ListGet => 1,
            _ => 0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            BuiltinMethod::StrLength => "length",
            BuiltinMethod::StrIsEmpty | BuiltinMethod::ListIsEmpty => "isEmpty",
            BuiltinMethod::StrToUpperCase => "toUpperCase",
            BuiltinMethod::StrToLowerCase => "toLowerCase",
            BuiltinMethod::StrTrim => "trim",
            BuiltinMethod::StrContains => "contains",
            BuiltinMethod::StrCharAt => "charAt",
            BuiltinMethod::ListSize => "size",
            BuiltinMethod::ListGet => "get",
        }
    }
}

/// Stack-machine instruction.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Op {
    /// Push the enclosing instance.
    LoadThis,
    /// Push a local slot supplied by the object-graph compiler.
    LoadLocal(u16),
    /// Push the write-back argument (bidirectional bindings).
    LoadArg,
    Push(Constant),
    Pop,
    /// Pop an object, push the field value.
    GetField(FieldId),
    /// Pop receiver and `argc` arguments, push the result.
    Call { method: MethodId, argc: u8 },
    /// Pop receiver and arguments of a built-in member, push the result.
    Builtin(BuiltinMethod),
    /// Pop an array, push its length.
    ArrayLength,
    /// Pop receiver and index, push the element.
    Index,
    /// Pop an observable, push its current underlying value.
    ObservableValue,
    /// Pop a value and an observable, store the value into the observable.
    SetObservable,
    Convert(Conversion),
    Unary { op: UnaryOp, kind: OperandKind },
    Binary { op: BinaryOp, kind: OperandKind },
    /// Pop `n` values, push their string concatenation.
    Concat(u16),
    /// Pop `n` values, push a list.
    MakeList(u16),
    /// Pop `n` values, push an array.
    MakeArray(u16),
    /// Unconditional jump to an absolute op index.
    Jump(u32),
    /// Pop a boolean, jump if it is false.
    JumpIfFalse(u32),
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::LoadThis => f.write_str("load_this"),
            Op::LoadLocal(slot) => write!(f, "load_local {slot}"),
            Op::LoadArg => f.write_str("load_arg"),
            Op::Push(c) => write!(f, "push {c}"),
            Op::Pop => f.write_str("pop"),
            Op::GetField(id) => write!(f, "get_field f{}", id.0),
            Op::Call { method, argc } => write!(f, "call m{} argc={argc}", method.0),
            Op::Builtin(b) => write!(f, "builtin {}", b.name()),
            Op::ArrayLength => f.write_str("array_length"),
            Op::Index => f.write_str("index"),
            Op::ObservableValue => f.write_str("observable_value"),
            Op::SetObservable => f.write_str("set_observable"),
            Op::Convert(Conversion::Widen { from, to }) => {
                write!(f, "widen {} -> {}", from.name(), to.name())
            }
            Op::Convert(Conversion::Unbox(p)) => write!(f, "unbox {}", p.name()),
            Op::Convert(Conversion::ToStr) => f.write_str("to_str"),
            Op::Unary { op, kind } => write!(f, "unary {} {kind:?}", op.as_symbol()),
            Op::Binary { op, kind } => write!(f, "binary {} {kind:?}", op.as_symbol()),
            Op::Concat(n) => write!(f, "concat {n}"),
            Op::MakeList(n) => write!(f, "make_list {n}"),
            Op::MakeArray(n) => write!(f, "make_array {n}"),
            Op::Jump(t) => write!(f, "jump {t:04}"),
            Op::JumpIfFalse(t) => write!(f, "jump_if_false {t:04}"),
        }
    }
}

/// A complete emitted code unit.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Program {
    ops: Vec<Op>,
}

impl Program {
    pub fn from_ops(ops: Vec<Op>) -> Self {
        Program { ops }
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Whether the program reads `this`.
    pub fn reads_this(&self) -> bool {
        self.ops.iter().any(|op| matches!(op, Op::LoadThis))
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, op) in self.ops.iter().enumerate() {
            writeln!(f, "{index:04}  {op}")?;
        }
        Ok(())
    }
}

/// Pending forward jump, patched by [`Emitter::bind`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[must_use = "a jump label must be bound to a target"]
pub struct Label(usize);

/// Emission context threaded through render commands.
#[derive(Clone, Debug, Default)]
pub struct Emitter {
    ops: Vec<Op>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn emit(&mut self, op: Op) {
        self.ops.push(op);
    }

    /// Current position (index of the next op).
    pub fn position(&self) -> u32 {
        u32::try_from(self.ops.len()).unwrap_or(u32::MAX)
    }

    pub fn emit_jump(&mut self) -> Label {
        self.ops.push(Op::Jump(u32::MAX));
        Label(self.ops.len() - 1)
    }

    pub fn emit_jump_if_false(&mut self) -> Label {
        self.ops.push(Op::JumpIfFalse(u32::MAX));
        Label(self.ops.len() - 1)
    }

    /// Point a pending jump at the current position.
    pub fn bind(&mut self, label: Label) {
        let target = self.position();
        if let Some(Op::Jump(t) | Op::JumpIfFalse(t)) = self.ops.get_mut(label.0) {
            *t = target;
        }
    }

    /// Append a finished program, relocating its jump targets.
    pub fn append(&mut self, program: &Program) {
        let base = self.position();
        self.ops.extend(program.ops.iter().map(|op| match op {
            Op::Jump(t) => Op::Jump(t + base),
            Op::JumpIfFalse(t) => Op::JumpIfFalse(t + base),
            other => other.clone(),
        }));
    }

    pub fn finish(self) -> Program {
        Program { ops: self.ops }
    }
}
