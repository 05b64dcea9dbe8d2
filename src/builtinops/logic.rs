use std::cmp::Ordering;

use crate::Error;
use crate::evaluator::Interpreter;
use crate::value::Value;

fn pop_pair(interp: &mut Interpreter, op: &'static str) -> Result<(Value, Value), Error> {
    let stack = interp.operands_mut();
    let b = stack.pop(op)?;
    let a = stack.pop(op)?;
    Ok((a, b))
}

fn push_bool(interp: &mut Interpreter, b: bool) -> Result<(), Error> {
    interp.operands_mut().push(Value::Bool(b));
    Ok(())
}

pub(super) fn eq(interp: &mut Interpreter) -> Result<(), Error> {
    let (a, b) = pop_pair(interp, "eq")?;
    push_bool(interp, a == b)
}

pub(super) fn ne(interp: &mut Interpreter) -> Result<(), Error> {
    let (a, b) = pop_pair(interp, "ne")?;
    push_bool(interp, a != b)
}

/// Order two like-kinded values. `None` means unordered (a NaN operand).
fn compare(a: &Value, b: &Value, op: &'static str) -> Result<Option<Ordering>, Error> {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Ok(Some(x.cmp(y))),
        (Value::String(x), Value::String(y)) | (Value::Name(x), Value::Name(y)) => {
            Ok(Some(x.cmp(y)))
        }
        // Element by element on the stored token text
        (Value::Array(x), Value::Array(y)) => Ok(Some(x.borrow().cmp(&*y.borrow()))),
        (Value::Bool(x), Value::Bool(y)) => Ok(Some(x.cmp(y))),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => Ok(x.partial_cmp(&y)),
            _ => Err(Error::type_mismatch(
                op,
                format!("cannot compare {} with {}", a.kind(), b.kind()),
            )),
        },
    }
}

fn ordering(
    interp: &mut Interpreter,
    op: &'static str,
    accept: fn(Ordering) -> bool,
) -> Result<(), Error> {
    let (a, b) = pop_pair(interp, op)?;
    let result = compare(&a, &b, op)?.is_some_and(accept);
    push_bool(interp, result)
}

pub(super) fn ge(interp: &mut Interpreter) -> Result<(), Error> {
    ordering(interp, "ge", Ordering::is_ge)
}

pub(super) fn gt(interp: &mut Interpreter) -> Result<(), Error> {
    ordering(interp, "gt", Ordering::is_gt)
}

pub(super) fn le(interp: &mut Interpreter) -> Result<(), Error> {
    ordering(interp, "le", Ordering::is_le)
}

pub(super) fn lt(interp: &mut Interpreter) -> Result<(), Error> {
    ordering(interp, "lt", Ordering::is_lt)
}

/// Logical on two booleans, bitwise on two integers
fn bitwise(
    interp: &mut Interpreter,
    op: &'static str,
    logical: fn(bool, bool) -> bool,
    bits: fn(i64, i64) -> i64,
) -> Result<(), Error> {
    let result = match pop_pair(interp, op)? {
        (Value::Bool(a), Value::Bool(b)) => Value::Bool(logical(a, b)),
        (Value::Integer(a), Value::Integer(b)) => Value::Integer(bits(a, b)),
        (a, b) => {
            return Err(Error::type_mismatch(
                op,
                format!(
                    "expected two booleans or two integers, got {} and {}",
                    a.kind(),
                    b.kind()
                ),
            ));
        }
    };
    interp.operands_mut().push(result);
    Ok(())
}

pub(super) fn and(interp: &mut Interpreter) -> Result<(), Error> {
    bitwise(interp, "and", |a, b| a && b, |a, b| a & b)
}

pub(super) fn or(interp: &mut Interpreter) -> Result<(), Error> {
    bitwise(interp, "or", |a, b| a || b, |a, b| a | b)
}

pub(super) fn not(interp: &mut Interpreter) -> Result<(), Error> {
    let result = match interp.operands_mut().pop("not")? {
        Value::Bool(b) => Value::Bool(!b),
        Value::Integer(n) => Value::Integer(!n),
        other => {
            return Err(Error::type_mismatch(
                "not",
                format!("expected boolean or integer, got {}", other.kind()),
            ));
        }
    };
    interp.operands_mut().push(result);
    Ok(())
}
