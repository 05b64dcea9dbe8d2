//! String and array access.
//!
//! Strings are indexed by character. Array elements are the raw token text they were
//! read from, and `get` hands them out as strings.

use crate::Error;
use crate::evaluator::Interpreter;
use crate::value::{IntType, Value};

/// Convert an index or count operand, rejecting negative values.
fn non_negative(n: IntType, op: &'static str, what: &str) -> Result<usize, Error> {
    usize::try_from(n).map_err(|_| Error::domain(op, format!("negative {what} {n}")))
}

/// Check that `start..start + count` lies within a container of length `len`.
fn check_range(op: &'static str, start: usize, count: usize, len: usize) -> Result<(), Error> {
    match start.checked_add(count) {
        Some(end) if end <= len => Ok(()),
        _ => Err(Error::domain(
            op,
            format!("range {start}+{count} out of bounds for length {len}"),
        )),
    }
}

/// `container index get`
pub(super) fn get(interp: &mut Interpreter) -> Result<(), Error> {
    let stack = interp.operands_mut();
    let index = stack.pop("get")?.into_integer("get")?;
    let container = stack.pop("get")?;
    let out_of_range = || Error::domain("get", format!("index {index} out of range"));
    let index = usize::try_from(index).map_err(|_| out_of_range())?;

    let element = match container {
        Value::String(s) => {
            let c = s.chars().nth(index).ok_or_else(out_of_range)?;
            Value::Integer(IntType::from(u32::from(c)))
        }
        Value::Array(tokens) => {
            let token = tokens.borrow().get(index).cloned().ok_or_else(out_of_range)?;
            Value::String(token)
        }
        other => {
            return Err(Error::type_mismatch(
                "get",
                format!("expected string or array, got {}", other.kind()),
            ));
        }
    };
    interp.operands_mut().push(element);
    Ok(())
}

/// `container index count getinterval`: a new string or array holding the slice
pub(super) fn getinterval(interp: &mut Interpreter) -> Result<(), Error> {
    let stack = interp.operands_mut();
    let count = stack.pop("getinterval")?.into_integer("getinterval")?;
    let index = stack.pop("getinterval")?.into_integer("getinterval")?;
    let container = stack.pop("getinterval")?;
    let count = non_negative(count, "getinterval", "count")?;
    let index = non_negative(index, "getinterval", "index")?;

    let slice = match container {
        Value::String(s) => {
            check_range("getinterval", index, count, s.chars().count())?;
            Value::String(s.chars().skip(index).take(count).collect())
        }
        Value::Array(tokens) => {
            let tokens = tokens.borrow();
            check_range("getinterval", index, count, tokens.len())?;
            Value::array(tokens[index..index + count].iter().cloned())
        }
        other => {
            return Err(Error::type_mismatch(
                "getinterval",
                format!("expected string or array, got {}", other.kind()),
            ));
        }
    };
    stack.push(slice);
    Ok(())
}

/// `container index source putinterval`: overwrite part of `container` with `source`.
///
/// Arrays are modified in place and the same array is pushed back. Strings are
/// immutable, so a new string is pushed instead.
pub(super) fn putinterval(interp: &mut Interpreter) -> Result<(), Error> {
    let stack = interp.operands_mut();
    let source = stack.pop("putinterval")?;
    let index = stack.pop("putinterval")?.into_integer("putinterval")?;
    let container = stack.pop("putinterval")?;
    let index = non_negative(index, "putinterval", "index")?;

    let result = match (container, source) {
        (Value::String(target), Value::String(source)) => {
            let mut chars: Vec<char> = target.chars().collect();
            let replacement: Vec<char> = source.chars().collect();
            check_range("putinterval", index, replacement.len(), chars.len())?;
            chars[index..index + replacement.len()].copy_from_slice(&replacement);
            Value::String(chars.into_iter().collect())
        }
        (Value::Array(target), Value::Array(source)) => {
            // Source and target may be the same array
            let replacement = source.borrow().clone();
            {
                let mut tokens = target.borrow_mut();
                check_range("putinterval", index, replacement.len(), tokens.len())?;
                tokens[index..index + replacement.len()].clone_from_slice(&replacement);
            }
            Value::Array(target)
        }
        (container, source) => {
            return Err(Error::type_mismatch(
                "putinterval",
                format!(
                    "expected two strings or two arrays, got {} and {}",
                    container.kind(),
                    source.kind()
                ),
            ));
        }
    };
    stack.push(result);
    Ok(())
}

#[cfg(test)]
#[expect(clippy::unwrap_used)] // test code OK
mod tests {
    use crate::builtinops::testing::OpTestResult::*;
    use crate::builtinops::testing::{eval_script, interpreter, run_op_tests};
    use crate::value::{Value, val};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_data_driven() {
        let test_cases = vec![
            ("(abc) 0 get", Stack(vec![val(97)])),
            ("(abc) 2 get", Stack(vec![val(99)])),
            ("(abc) 3 get", RangeError),
            ("(abc) -1 get", RangeError),
            ("(abc) 1.5 get", TypeError),
            // Array elements are the stored token text, never reinterpreted
            ("[10 2.5 true] 0 get", Stack(vec![val("10")])),
            ("[10 2.5 true] 1 get", Stack(vec![val("2.5")])),
            ("[10 2.5 true] 2 get", Stack(vec![val("true")])),
            ("[/k (s)] 0 get", Stack(vec![val("/k")])),
            ("[/k (s)] 1 get", Stack(vec![val("(s)")])),
            ("[(s) 1 x] 0 get [(s) 1 x] 1 get", Stack(vec![val("(s)"), val("1")])),
            ("[foo] 0 get", Stack(vec![val("foo")])),
            ("[] 0 get", RangeError),
            ("5 0 get", TypeError),
            ("0 get", Underflow),
        ];

        run_op_tests(test_cases);
    }

    #[test]
    fn test_getinterval_data_driven() {
        let test_cases = vec![
            ("(hello) 1 3 getinterval", Stack(vec![val("ell")])),
            ("(hello) 0 0 getinterval", Stack(vec![val("")])),
            ("(hello) 5 0 getinterval", Stack(vec![val("")])),
            ("(hello) 3 3 getinterval", RangeError),
            ("(hello) 0 -1 getinterval", RangeError),
            ("(hello) -1 2 getinterval", RangeError),
            (
                "[1 2 3 4] 1 2 getinterval",
                Stack(vec![Value::array(["2", "3"])]),
            ),
            ("[1 2 3 4] 2 3 getinterval", RangeError),
            ("(hello) (a) 1 getinterval", TypeError),
            ("true 0 1 getinterval", TypeError),
            ("0 1 getinterval", Underflow),
        ];

        run_op_tests(test_cases);
    }

    #[test]
    fn test_putinterval_data_driven() {
        let test_cases = vec![
            ("(hello) 1 (EY) putinterval", Stack(vec![val("hEYlo")])),
            ("(hello) 0 () putinterval", Stack(vec![val("hello")])),
            ("(hello) 3 (xyz) putinterval", RangeError),
            ("(hello) -1 (x) putinterval", RangeError),
            (
                "[1 2 3] 1 [8 9] putinterval",
                Stack(vec![Value::array(["1", "8", "9"])]),
            ),
            ("[1 2 3] 2 [8 9] putinterval", RangeError),
            ("(abc) 0 [1] putinterval", TypeError),
            ("[1] 0 (a) putinterval", TypeError),
            ("(abc) (x) (y) putinterval", TypeError),
            ("0 (y) putinterval", Underflow),
        ];

        run_op_tests(test_cases);
    }

    #[test]
    fn test_putinterval_string_is_a_new_value() {
        let (mut interp, _) = interpreter();
        eval_script(&mut interp, "/s (abc) def s 0 (X) putinterval s").unwrap();
        assert_eq!(interp.operands().as_slice(), &[val("Xbc"), val("abc")]);
    }

    #[test]
    fn test_putinterval_array_mutates_in_place() {
        let (mut interp, _) = interpreter();
        eval_script(&mut interp, "/a [1 2 3] def a 0 [7] putinterval a").unwrap();
        let stack = interp.operands().as_slice();
        assert_eq!(stack[1], Value::array(["7", "2", "3"]));
        match (&stack[0], &stack[1]) {
            (Value::Array(pushed), Value::Array(bound)) => {
                assert!(std::rc::Rc::ptr_eq(pushed, bound));
            }
            other => panic!("expected two arrays, got {other:?}"),
        }
    }

    #[test]
    fn test_putinterval_from_own_slice() {
        let (mut interp, _) = interpreter();
        eval_script(&mut interp, "[1 2 3 4] dup 2 exch 0 2 getinterval putinterval").unwrap();
        assert_eq!(
            interp.operands().as_slice(),
            &[Value::array(["1", "2", "1", "2"])]
        );
    }

    #[test]
    fn test_putinterval_array_into_itself() {
        let (mut interp, _) = interpreter();
        eval_script(&mut interp, "[1 2] dup 0 exch putinterval").unwrap();
        assert_eq!(interp.operands().as_slice(), &[Value::array(["1", "2"])]);
    }

    #[test]
    fn test_failed_access_consumes_operands() {
        let (mut interp, _) = interpreter();
        assert!(eval_script(&mut interp, "7 (abc) 9 get").is_err());
        assert_eq!(interp.operands().as_slice(), &[val(7)]);
    }
}
