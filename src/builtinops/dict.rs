use tracing::debug;

use crate::Error;
use crate::NAME_MARKER;
use crate::environment::Dictionary;
use crate::evaluator::Interpreter;
use crate::value::{IntType, Value};

/// `n dict`: a new empty dictionary. The capacity is checked but otherwise ignored.
pub(super) fn dict(interp: &mut Interpreter) -> Result<(), Error> {
    let capacity = interp.operands_mut().pop("dict")?.into_integer("dict")?;
    if capacity < 0 {
        return Err(Error::domain("dict", "negative capacity"));
    }
    interp.operands_mut().push(Value::dictionary(Dictionary::new()));
    Ok(())
}

/// Number of characters, elements or bindings in a container
fn container_length(value: &Value, op: &'static str) -> Result<usize, Error> {
    match value {
        Value::String(s) => Ok(s.chars().count()),
        Value::Array(tokens) => Ok(tokens.borrow().len()),
        Value::Dictionary(dict) => Ok(dict.borrow().len()),
        other => Err(Error::type_mismatch(
            op,
            format!("expected string, array or dictionary, got {}", other.kind()),
        )),
    }
}

fn push_length(interp: &mut Interpreter, op: &'static str) -> Result<(), Error> {
    let container = interp.operands_mut().pop(op)?;
    let len = container_length(&container, op)?;
    interp.operands_mut().push(Value::Integer(len as IntType));
    Ok(())
}

pub(super) fn length(interp: &mut Interpreter) -> Result<(), Error> {
    push_length(interp, "length")
}

/// Containers grow without bound, so the maximum length is the current length.
pub(super) fn maxlength(interp: &mut Interpreter) -> Result<(), Error> {
    push_length(interp, "maxlength")
}

pub(super) fn begin(interp: &mut Interpreter) -> Result<(), Error> {
    let dict = interp.operands_mut().pop("begin")?.into_dictionary("begin")?;
    interp.dictionaries_mut().begin(dict);
    debug!(depth = interp.dictionaries().depth(), "begin");
    Ok(())
}

pub(super) fn end(interp: &mut Interpreter) -> Result<(), Error> {
    interp.dictionaries_mut().end()?;
    debug!(depth = interp.dictionaries().depth(), "end");
    Ok(())
}

/// `/name value def`: bind in the top dictionary, without the name marker.
pub(super) fn def(interp: &mut Interpreter) -> Result<(), Error> {
    let stack = interp.operands_mut();
    let value = stack.pop("def")?;
    let key = match stack.pop("def")? {
        Value::Name(name) => name
            .strip_prefix(NAME_MARKER)
            .map(str::to_owned)
            .unwrap_or(name),
        other => {
            return Err(Error::type_mismatch(
                "def",
                format!("expected name, got {}", other.kind()),
            ));
        }
    };
    debug!(key, kind = value.kind(), "def");
    interp.dictionaries().define(key, value);
    Ok(())
}
