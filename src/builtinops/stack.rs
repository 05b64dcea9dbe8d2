use crate::Error;
use crate::evaluator::Interpreter;
use crate::value::{IntType, Value};

pub(super) fn exch(interp: &mut Interpreter) -> Result<(), Error> {
    let stack = interp.operands_mut();
    let b = stack.pop("exch")?;
    let a = stack.pop("exch")?;
    stack.push(b);
    stack.push(a);
    Ok(())
}

pub(super) fn pop(interp: &mut Interpreter) -> Result<(), Error> {
    interp.operands_mut().pop("pop")?;
    Ok(())
}

/// `n copy`: duplicate the top `n` values below the count.
///
/// Unlike the other operators, nothing is consumed unless the whole operation can
/// succeed.
pub(super) fn copy(interp: &mut Interpreter) -> Result<(), Error> {
    let stack = interp.operands_mut();
    let n = match stack.peek(0) {
        Some(Value::Integer(n)) => *n,
        Some(other) => {
            return Err(Error::type_mismatch(
                "copy",
                format!("expected integer, got {}", other.kind()),
            ));
        }
        None => return stack.require("copy", 1),
    };
    let n = usize::try_from(n).map_err(|_| Error::domain("copy", "negative count"))?;
    stack.require("copy", n + 1)?;

    stack.pop("copy")?;
    stack.duplicate_top(n);
    Ok(())
}

pub(super) fn dup(interp: &mut Interpreter) -> Result<(), Error> {
    interp.operands_mut().duplicate_top(1);
    Ok(())
}

pub(super) fn clear(interp: &mut Interpreter) -> Result<(), Error> {
    interp.operands_mut().clear();
    Ok(())
}

pub(super) fn count(interp: &mut Interpreter) -> Result<(), Error> {
    let stack = interp.operands_mut();
    let depth = Value::Integer(stack.len() as IntType);
    stack.push(depth);
    Ok(())
}
