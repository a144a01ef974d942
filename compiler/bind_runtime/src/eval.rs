//! Stack-machine evaluator for emitted programs.
//!
//! Runs a [`Program`] against an [`EvalEnv`]. Arithmetic on `int` and
//! `long` wraps; integer division by zero is an error. Shift distances are
//! masked to the operand width.

use std::rc::Rc;

use bind_ir::{
    BinaryOp, BuiltinMethod, Constant, Conversion, Op, OperandKind, Prim, Program, UnaryOp,
};

use crate::error::RuntimeError;
use crate::native::NativeTable;
use crate::value::Value;

/// What a program can reach while it runs.
#[derive(Clone, Debug)]
pub struct EvalEnv {
    /// The enclosing instance (`this`).
    pub this: Value,
    /// Local slots supplied by the object-graph compiler.
    pub locals: Vec<Value>,
    pub natives: Rc<NativeTable>,
}

impl EvalEnv {
    pub fn new(this: Value, natives: Rc<NativeTable>) -> Self {
        EvalEnv {
            this,
            locals: Vec::new(),
            natives,
        }
    }

    #[must_use]
    pub fn with_locals(mut self, locals: Vec<Value>) -> Self {
        self.locals = locals;
        self
    }
}

/// Run a complete program and return the value it leaves.
pub fn evaluate(program: &Program, env: &EvalEnv) -> Result<Value, RuntimeError> {
    Machine::new(env, None).run(program, Vec::new())
}

/// Run an accessor program with `receiver` already on the stack.
pub fn evaluate_on(
    program: &Program,
    env: &EvalEnv,
    receiver: Value,
) -> Result<Value, RuntimeError> {
    Machine::new(env, None).run(program, vec![receiver])
}

/// Run a write-back program with `arg` as its argument.
pub fn evaluate_write_back(
    program: &Program,
    env: &EvalEnv,
    arg: Value,
) -> Result<(), RuntimeError> {
    Machine::new(env, Some(arg)).exec(program)
}

struct Machine<'a> {
    env: &'a EvalEnv,
    arg: Option<Value>,
    stack: Vec<Value>,
}

impl<'a> Machine<'a> {
    fn new(env: &'a EvalEnv, arg: Option<Value>) -> Self {
        Machine {
            env,
            arg,
            stack: Vec::new(),
        }
    }

    fn run(mut self, program: &Program, initial: Vec<Value>) -> Result<Value, RuntimeError> {
        self.stack = initial;
        self.exec(program)?;
        self.pop()
    }

    fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.stack.pop().ok_or(RuntimeError::StackUnderflow)
    }

    /// Pop `n` values, returned in push order.
    fn pop_n(&mut self, n: usize) -> Result<Vec<Value>, RuntimeError> {
        let len = self.stack.len();
        if n > len {
            return Err(RuntimeError::StackUnderflow);
        }
        Ok(self.stack.split_off(len - n))
    }

    fn exec(&mut self, program: &Program) -> Result<(), RuntimeError> {
        let ops = program.ops();
        let mut pc = 0usize;
        while let Some(op) = ops.get(pc) {
            pc += 1;
            match op {
                Op::LoadThis => self.stack.push(self.env.this.clone()),
                Op::LoadLocal(slot) => {
                    let value = self
                        .env
                        .locals
                        .get(usize::from(*slot))
                        .cloned()
                        .ok_or(RuntimeError::UnknownLocal(*slot))?;
                    self.stack.push(value);
                }
                Op::LoadArg => {
                    let arg = self.arg.clone().ok_or(RuntimeError::MissingArgument)?;
                    self.stack.push(arg);
                }
                Op::Push(constant) => self.stack.push(constant_value(constant)),
                Op::Pop => {
                    self.pop()?;
                }
                Op::GetField(field) => match self.pop()? {
                    Value::Object(obj) => self.stack.push(obj.get_field(*field)),
                    Value::Null => return Err(RuntimeError::NullReceiver("field access")),
                    other => return Err(fault("object", &other)),
                },
                Op::Call { method, argc } => {
                    let args = self.pop_n(usize::from(*argc))?;
                    let receiver = self.pop()?;
                    if receiver.is_null() {
                        return Err(RuntimeError::NullReceiver("method call"));
                    }
                    let result = self.env.natives.call(*method, &receiver, &args)?;
                    self.stack.push(result);
                }
                Op::Builtin(builtin) => {
                    let args = self.pop_n(builtin.arity())?;
                    let receiver = self.pop()?;
                    self.stack.push(call_builtin(*builtin, &receiver, &args)?);
                }
                Op::ArrayLength => match self.pop()? {
                    Value::Array(items) => self.stack.push(Value::Int(length(items.len()))),
                    Value::Null => return Err(RuntimeError::NullReceiver("array length")),
                    other => return Err(fault("array", &other)),
                },
                Op::Index => {
                    let index = self.pop()?;
                    let receiver = self.pop()?;
                    let element = match receiver {
                        Value::Array(items) | Value::List(items) => element(&items, &index)?,
                        Value::Null => return Err(RuntimeError::NullReceiver("index")),
                        other => return Err(fault("array", &other)),
                    };
                    self.stack.push(element);
                }
                Op::ObservableValue => match self.pop()? {
                    Value::Observable(obs) => self.stack.push(obs.get_value()),
                    Value::Null => return Err(RuntimeError::NullReceiver("observable read")),
                    other => return Err(fault("observable", &other)),
                },
                Op::SetObservable => {
                    let value = self.pop()?;
                    match self.pop()? {
                        Value::Observable(obs) => obs.set_value(value)?,
                        Value::Null => return Err(RuntimeError::NullReceiver("observable write")),
                        other => return Err(fault("observable", &other)),
                    }
                }
                Op::Convert(conversion) => {
                    let value = self.pop()?;
                    self.stack.push(convert(*conversion, value)?);
                }
                Op::Unary { op, kind } => {
                    let value = self.pop()?;
                    self.stack.push(unary(*op, *kind, value)?);
                }
                Op::Binary { op, kind } => {
                    let right = self.pop()?;
                    let left = self.pop()?;
                    self.stack.push(binary(*op, *kind, left, right)?);
                }
                Op::Concat(n) => {
                    let parts = self.pop_n(usize::from(*n))?;
                    let mut out = String::new();
                    for part in &parts {
                        out.push_str(&part.to_string());
                    }
                    self.stack.push(Value::Str(out.into()));
                }
                Op::MakeList(n) => {
                    let items = self.pop_n(usize::from(*n))?;
                    self.stack.push(Value::List(items.into()));
                }
                Op::MakeArray(n) => {
                    let items = self.pop_n(usize::from(*n))?;
                    self.stack.push(Value::Array(items.into()));
                }
                Op::Jump(target) => pc = *target as usize,
                Op::JumpIfFalse(target) => match self.pop()? {
                    Value::Bool(true) => {}
                    Value::Bool(false) => pc = *target as usize,
                    other => return Err(fault("boolean", &other)),
                },
            }
        }
        Ok(())
    }
}

fn fault(expected: &'static str, found: &Value) -> RuntimeError {
    RuntimeError::TypeFault {
        expected,
        found: found.kind_name(),
    }
}

fn length(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

fn constant_value(constant: &Constant) -> Value {
    match constant {
        Constant::Null => Value::Null,
        Constant::Bool(b) => Value::Bool(*b),
        Constant::Int(i) => Value::Int(*i),
        Constant::Long(i) => Value::Long(*i),
        Constant::Float(bits) => Value::Float(f32::from_bits(*bits)),
        Constant::Double(bits) => Value::Double(f64::from_bits(*bits)),
        Constant::Char(c) => Value::Char(*c),
        Constant::Str(s) => Value::str(s),
    }
}

fn element(items: &[Value], index: &Value) -> Result<Value, RuntimeError> {
    let Value::Int(i) = index else {
        return Err(fault("int", index));
    };
    usize::try_from(*i)
        .ok()
        .and_then(|i| items.get(i))
        .cloned()
        .ok_or(RuntimeError::IndexOutOfBounds {
            index: i64::from(*i),
            len: items.len(),
        })
}

fn call_builtin(
    builtin: BuiltinMethod,
    receiver: &Value,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    match receiver {
        Value::Null => Err(RuntimeError::NullReceiver(builtin.name())),
        Value::Str(s) => match builtin {
            BuiltinMethod::StrLength => Ok(Value::Int(length(s.chars().count()))),
            BuiltinMethod::StrIsEmpty => Ok(Value::Bool(s.is_empty())),
            BuiltinMethod::StrToUpperCase => Ok(Value::str(&s.to_uppercase())),
            BuiltinMethod::StrToLowerCase => Ok(Value::str(&s.to_lowercase())),
            BuiltinMethod::StrTrim => Ok(Value::str(s.trim())),
            BuiltinMethod::StrContains => match args.first() {
                Some(Value::Str(needle)) => Ok(Value::Bool(s.contains(&**needle))),
                Some(Value::Null) => Err(RuntimeError::NullReceiver("contains")),
                Some(other) => Err(fault("String", other)),
                None => Err(RuntimeError::StackUnderflow),
            },
            BuiltinMethod::StrCharAt => {
                let chars: Vec<Value> = s.chars().map(Value::Char).collect();
                element(&chars, args.first().unwrap_or(&Value::Null))
            }
            _ => Err(fault("List", receiver)),
        },
        Value::List(items) | Value::Array(items) => match builtin {
            BuiltinMethod::ListSize => Ok(Value::Int(length(items.len()))),
            BuiltinMethod::ListIsEmpty => Ok(Value::Bool(items.is_empty())),
            BuiltinMethod::ListGet => element(items, args.first().unwrap_or(&Value::Null)),
            _ => Err(fault("String", receiver)),
        },
        other => Err(fault("String or List", other)),
    }
}

/// Numeric view of a primitive value.
#[derive(Copy, Clone)]
enum Num {
    I(i64),
    F(f64),
}

fn num(value: &Value) -> Result<Num, RuntimeError> {
    match value {
        Value::Int(i) => Ok(Num::I(i64::from(*i))),
        Value::Long(i) => Ok(Num::I(*i)),
        Value::Char(c) => Ok(Num::I(i64::from(u32::from(*c)))),
        Value::Float(x) => Ok(Num::F(f64::from(*x))),
        Value::Double(x) => Ok(Num::F(*x)),
        other => Err(fault("number", other)),
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn cast(value: &Value, to: Prim) -> Result<Value, RuntimeError> {
    if to == Prim::Boolean {
        return match value {
            Value::Bool(_) => Ok(value.clone()),
            other => Err(fault("boolean", other)),
        };
    }
    let n = num(value)?;
    Ok(match (to, n) {
        (Prim::Byte, Num::I(i)) => Value::Int(i32::from(i as i8)),
        (Prim::Short, Num::I(i)) => Value::Int(i32::from(i as i16)),
        (Prim::Int, Num::I(i)) => Value::Int(i as i32),
        (Prim::Byte | Prim::Short | Prim::Int, Num::F(x)) => Value::Int(x as i32),
        (Prim::Char, Num::I(i)) => Value::Char(char::from_u32(i as u32).unwrap_or('\u{fffd}')),
        (Prim::Char, Num::F(x)) => Value::Char(char::from_u32(x as u32).unwrap_or('\u{fffd}')),
        (Prim::Long, Num::I(i)) => Value::Long(i),
        (Prim::Long, Num::F(x)) => Value::Long(x as i64),
        (Prim::Float, Num::I(i)) => Value::Float(i as f32),
        (Prim::Float, Num::F(x)) => Value::Float(x as f32),
        (Prim::Double, Num::I(i)) => Value::Double(i as f64),
        (Prim::Double, Num::F(x)) => Value::Double(x),
        (Prim::Boolean, _) => return Err(fault("boolean", value)),
    })
}

fn convert(conversion: Conversion, value: Value) -> Result<Value, RuntimeError> {
    match conversion {
        Conversion::Widen { to, .. } => cast(&value, to),
        Conversion::Unbox(prim) if value.is_null() => Err(RuntimeError::NullUnboxing(prim.name())),
        Conversion::Unbox(_) => Ok(value),
        Conversion::ToStr => Ok(match value {
            Value::Str(_) => value,
            other => Value::Str(other.to_string().into()),
        }),
    }
}

fn unary(op: UnaryOp, kind: OperandKind, value: Value) -> Result<Value, RuntimeError> {
    Ok(match (op, kind, &value) {
        (UnaryOp::Not, _, Value::Bool(b)) => Value::Bool(!b),
        (UnaryOp::Neg, _, Value::Int(i)) => Value::Int(i.wrapping_neg()),
        (UnaryOp::Neg, _, Value::Long(i)) => Value::Long(i.wrapping_neg()),
        (UnaryOp::Neg, _, Value::Float(x)) => Value::Float(-x),
        (UnaryOp::Neg, _, Value::Double(x)) => Value::Double(-x),
        (UnaryOp::BitNot, _, Value::Int(i)) => Value::Int(!i),
        (UnaryOp::BitNot, _, Value::Long(i)) => Value::Long(!i),
        (_, OperandKind::Bool, other) => return Err(fault("boolean", other)),
        (_, _, other) => return Err(fault("number", other)),
    })
}

fn binary(
    op: BinaryOp,
    kind: OperandKind,
    left: Value,
    right: Value,
) -> Result<Value, RuntimeError> {
    match kind {
        OperandKind::Ref => match op {
            BinaryOp::Eq => Ok(Value::Bool(left == right)),
            BinaryOp::NotEq => Ok(Value::Bool(left != right)),
            _ => Err(fault("number", &left)),
        },
        OperandKind::Bool => {
            let (l, r) = match (&left, &right) {
                (Value::Bool(l), Value::Bool(r)) => (*l, *r),
                (Value::Bool(_), other) | (other, _) => return Err(fault("boolean", other)),
            };
            Ok(Value::Bool(match op {
                BinaryOp::Eq => l == r,
                BinaryOp::NotEq => l != r,
                BinaryOp::And | BinaryOp::BitAnd => l & r,
                BinaryOp::Or | BinaryOp::BitOr => l | r,
                BinaryOp::BitXor => l ^ r,
                _ => return Err(fault("number", &left)),
            }))
        }
        OperandKind::Int => match (&left, &right) {
            (Value::Int(l), _) => int_binary(op, *l, &right),
            _ => Err(fault("int", &left)),
        },
        OperandKind::Long => match (&left, &right) {
            (Value::Long(l), _) => long_binary(op, *l, &right),
            _ => Err(fault("long", &left)),
        },
        OperandKind::Float => match (&left, &right) {
            (Value::Float(l), Value::Float(r)) => {
                #[allow(clippy::cast_possible_truncation)]
                let narrow = |x: f64| Value::Float(x as f32);
                float_binary(op, f64::from(*l), f64::from(*r), narrow)
            }
            _ => Err(fault("float", &left)),
        },
        OperandKind::Double => match (&left, &right) {
            (Value::Double(l), Value::Double(r)) => float_binary(op, *l, *r, Value::Double),
            _ => Err(fault("double", &left)),
        },
    }
}

/// Shift distance; the right operand of a shift keeps its own width.
fn shift_distance(right: &Value, mask: i64) -> Result<u32, RuntimeError> {
    match num(right)? {
        Num::I(i) => Ok(u32::try_from(i & mask).unwrap_or(0)),
        Num::F(_) => Err(fault("integer", right)),
    }
}

fn int_binary(op: BinaryOp, l: i32, right: &Value) -> Result<Value, RuntimeError> {
    if matches!(op, BinaryOp::Shl | BinaryOp::Shr) {
        let by = shift_distance(right, 31)?;
        return Ok(Value::Int(if op == BinaryOp::Shl { l << by } else { l >> by }));
    }
    let Value::Int(r) = *right else {
        return Err(fault("int", right));
    };
    Ok(match op {
        BinaryOp::Add => Value::Int(l.wrapping_add(r)),
        BinaryOp::Sub => Value::Int(l.wrapping_sub(r)),
        BinaryOp::Mul => Value::Int(l.wrapping_mul(r)),
        BinaryOp::Div if r == 0 => return Err(RuntimeError::DivisionByZero),
        BinaryOp::Div => Value::Int(l.wrapping_div(r)),
        BinaryOp::Mod if r == 0 => return Err(RuntimeError::DivisionByZero),
        BinaryOp::Mod => Value::Int(l.wrapping_rem(r)),
        BinaryOp::BitAnd => Value::Int(l & r),
        BinaryOp::BitOr => Value::Int(l | r),
        BinaryOp::BitXor => Value::Int(l ^ r),
        _ => Value::Bool(compare(op, l.cmp(&r))),
    })
}

fn long_binary(op: BinaryOp, l: i64, right: &Value) -> Result<Value, RuntimeError> {
    if matches!(op, BinaryOp::Shl | BinaryOp::Shr) {
        let by = shift_distance(right, 63)?;
        return Ok(Value::Long(if op == BinaryOp::Shl { l << by } else { l >> by }));
    }
    let Value::Long(r) = *right else {
        return Err(fault("long", right));
    };
    Ok(match op {
        BinaryOp::Add => Value::Long(l.wrapping_add(r)),
        BinaryOp::Sub => Value::Long(l.wrapping_sub(r)),
        BinaryOp::Mul => Value::Long(l.wrapping_mul(r)),
        BinaryOp::Div if r == 0 => return Err(RuntimeError::DivisionByZero),
        BinaryOp::Div => Value::Long(l.wrapping_div(r)),
        BinaryOp::Mod if r == 0 => return Err(RuntimeError::DivisionByZero),
        BinaryOp::Mod => Value::Long(l.wrapping_rem(r)),
        BinaryOp::BitAnd => Value::Long(l & r),
        BinaryOp::BitOr => Value::Long(l | r),
        BinaryOp::BitXor => Value::Long(l ^ r),
        _ => Value::Bool(compare(op, l.cmp(&r))),
    })
}

#[allow(clippy::float_cmp)]
fn float_binary(
    op: BinaryOp,
    l: f64,
    r: f64,
    wrap: impl Fn(f64) -> Value,
) -> Result<Value, RuntimeError> {
    Ok(match op {
        BinaryOp::Add => wrap(l + r),
        BinaryOp::Sub => wrap(l - r),
        BinaryOp::Mul => wrap(l * r),
        BinaryOp::Div => wrap(l / r),
        BinaryOp::Mod => wrap(l % r),
        BinaryOp::Eq => Value::Bool(l == r),
        BinaryOp::NotEq => Value::Bool(l != r),
        BinaryOp::Lt => Value::Bool(l < r),
        BinaryOp::LtEq => Value::Bool(l <= r),
        BinaryOp::Gt => Value::Bool(l > r),
        BinaryOp::GtEq => Value::Bool(l >= r),
        _ => {
            return Err(RuntimeError::TypeFault {
                expected: "integer",
                found: "floating point",
            })
        }
    })
}

fn compare(op: BinaryOp, ordering: std::cmp::Ordering) -> bool {
    use std::cmp::Ordering;
    match op {
        BinaryOp::Eq => ordering == Ordering::Equal,
        BinaryOp::NotEq => ordering != Ordering::Equal,
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::LtEq => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::GtEq => ordering != Ordering::Less,
        _ => false,
    }
}
