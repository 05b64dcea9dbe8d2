//! Arithmetic operators.
//!
//! Integer operands stay integers wherever the result is exact; any floating operand
//! makes the result floating. `div` and `sqrt` always produce floats, while `ceiling`,
//! `floor` and `round` always produce integers.

use crate::Error;
use crate::evaluator::Interpreter;
use crate::value::{IntType, Value};

/// A popped numeric operand
#[derive(Debug, Clone, Copy)]
enum Number {
    Int(IntType),
    Real(f64),
}

impl Number {
    fn from_value(value: Value, op: &'static str) -> Result<Number, Error> {
        match value {
            Value::Integer(n) => Ok(Number::Int(n)),
            Value::Float(x) => Ok(Number::Real(x)),
            other => Err(Error::type_mismatch(
                op,
                format!("expected number, got {}", other.kind()),
            )),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Real(x) => x,
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Value {
        match n {
            Number::Int(n) => Value::Integer(n),
            Number::Real(x) => Value::Float(x),
        }
    }
}

fn overflow(op: &'static str) -> Error {
    Error::domain(op, "integer overflow")
}

/// Pop two numbers, deepest first.
fn pop_pair(interp: &mut Interpreter, op: &'static str) -> Result<(Number, Number), Error> {
    let stack = interp.operands_mut();
    let b = stack.pop(op)?;
    let a = stack.pop(op)?;
    Ok((Number::from_value(a, op)?, Number::from_value(b, op)?))
}

fn pop_number(interp: &mut Interpreter, op: &'static str) -> Result<Number, Error> {
    Number::from_value(interp.operands_mut().pop(op)?, op)
}

fn push(interp: &mut Interpreter, value: impl Into<Value>) -> Result<(), Error> {
    interp.operands_mut().push(value.into());
    Ok(())
}

/// Apply a binary operation with checked integer and plain float variants
fn binary(
    interp: &mut Interpreter,
    op: &'static str,
    int_op: fn(IntType, IntType) -> Option<IntType>,
    real_op: fn(f64, f64) -> f64,
) -> Result<(), Error> {
    let result = match pop_pair(interp, op)? {
        (Number::Int(a), Number::Int(b)) => Number::Int(int_op(a, b).ok_or_else(|| overflow(op))?),
        (a, b) => Number::Real(real_op(a.as_f64(), b.as_f64())),
    };
    push(interp, result)
}

pub(super) fn add(interp: &mut Interpreter) -> Result<(), Error> {
    binary(interp, "add", IntType::checked_add, |a, b| a + b)
}

pub(super) fn sub(interp: &mut Interpreter) -> Result<(), Error> {
    binary(interp, "sub", IntType::checked_sub, |a, b| a - b)
}

pub(super) fn mul(interp: &mut Interpreter) -> Result<(), Error> {
    binary(interp, "mul", IntType::checked_mul, |a, b| a * b)
}

pub(super) fn div(interp: &mut Interpreter) -> Result<(), Error> {
    let (a, b) = pop_pair(interp, "div")?;
    let divisor = b.as_f64();
    if divisor == 0.0 {
        return Err(Error::domain("div", "division by zero"));
    }
    push(interp, a.as_f64() / divisor)
}

/// Pop two integers for `idiv` and `mod`, rejecting a zero divisor.
fn pop_integer_division(
    interp: &mut Interpreter,
    op: &'static str,
) -> Result<(IntType, IntType), Error> {
    match pop_pair(interp, op)? {
        (Number::Int(_), Number::Int(0)) => Err(Error::domain(op, "division by zero")),
        (Number::Int(a), Number::Int(b)) => Ok((a, b)),
        _ => Err(Error::type_mismatch(op, "operands must be integers")),
    }
}

/// Quotient truncated toward zero
pub(super) fn idiv(interp: &mut Interpreter) -> Result<(), Error> {
    let (a, b) = pop_integer_division(interp, "idiv")?;
    let quotient = a.checked_div(b).ok_or_else(|| overflow("idiv"))?;
    push(interp, quotient)
}

/// Remainder with the sign of the dividend
pub(super) fn modulo(interp: &mut Interpreter) -> Result<(), Error> {
    let (a, b) = pop_integer_division(interp, "mod")?;
    let remainder = a.checked_rem(b).ok_or_else(|| overflow("mod"))?;
    push(interp, remainder)
}

pub(super) fn abs(interp: &mut Interpreter) -> Result<(), Error> {
    let result = match pop_number(interp, "abs")? {
        Number::Int(n) => Number::Int(n.checked_abs().ok_or_else(|| overflow("abs"))?),
        Number::Real(x) => Number::Real(x.abs()),
    };
    push(interp, result)
}

pub(super) fn neg(interp: &mut Interpreter) -> Result<(), Error> {
    let result = match pop_number(interp, "neg")? {
        Number::Int(n) => Number::Int(n.checked_neg().ok_or_else(|| overflow("neg"))?),
        Number::Real(x) => Number::Real(-x),
    };
    push(interp, result)
}

/// Pop a number and round it to an integer with `rounding`.
fn to_integer(
    interp: &mut Interpreter,
    op: &'static str,
    rounding: fn(f64) -> f64,
) -> Result<(), Error> {
    let result = match pop_number(interp, op)? {
        Number::Int(n) => n,
        Number::Real(x) => {
            let rounded = rounding(x);
            // 2^63 itself is out of range; see the classifier for the same bound
            if !rounded.is_finite()
                || rounded < IntType::MIN as f64
                || rounded >= -(IntType::MIN as f64)
            {
                return Err(Error::domain(op, format!("{x} is out of integer range")));
            }
            rounded as IntType
        }
    };
    push(interp, result)
}

pub(super) fn ceiling(interp: &mut Interpreter) -> Result<(), Error> {
    to_integer(interp, "ceiling", f64::ceil)
}

pub(super) fn floor(interp: &mut Interpreter) -> Result<(), Error> {
    to_integer(interp, "floor", f64::floor)
}

/// Round half away from zero
pub(super) fn round(interp: &mut Interpreter) -> Result<(), Error> {
    to_integer(interp, "round", |x| {
        if x >= 0.0 {
            (x + 0.5).floor()
        } else {
            (x - 0.5).ceil()
        }
    })
}

pub(super) fn sqrt(interp: &mut Interpreter) -> Result<(), Error> {
    let x = pop_number(interp, "sqrt")?.as_f64();
    if x < 0.0 {
        return Err(Error::domain("sqrt", "negative operand"));
    }
    push(interp, x.sqrt())
}
