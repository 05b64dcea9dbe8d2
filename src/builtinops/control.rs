//! Control flow operators.
//!
//! Each operator only decides which blocks run and how often; the evaluator executes
//! them under the interpreter's scoping policy. Errors raised by tokens inside a block
//! are reported by the evaluator and do not stop a loop.

use crate::Error;
use crate::evaluator::Interpreter;
use crate::value::Value;

/// `cond { ... } if`
pub(super) fn if_(interp: &mut Interpreter) -> Result<(), Error> {
    let stack = interp.operands_mut();
    let block = stack.pop("if")?;
    let cond = stack.pop("if")?.into_bool("if")?;
    let block = block.into_block("if")?;
    if cond {
        interp.execute(&block)?;
    }
    Ok(())
}

/// `cond { then } { else } ifelse`
pub(super) fn ifelse(interp: &mut Interpreter) -> Result<(), Error> {
    let stack = interp.operands_mut();
    let otherwise = stack.pop("ifelse")?;
    let then = stack.pop("ifelse")?;
    let cond = stack.pop("ifelse")?.into_bool("ifelse")?;
    let then = then.into_block("ifelse")?;
    let otherwise = otherwise.into_block("ifelse")?;
    interp.execute(if cond { &then } else { &otherwise })
}

/// `n { ... } repeat`; a count below one runs nothing
pub(super) fn repeat(interp: &mut Interpreter) -> Result<(), Error> {
    let stack = interp.operands_mut();
    let block = stack.pop("repeat")?;
    let count = stack.pop("repeat")?.into_integer("repeat")?;
    let block = block.into_block("repeat")?;
    for _ in 0..count.max(0) {
        interp.execute(&block)?;
    }
    Ok(())
}

/// `init step limit { ... } for`
///
/// The control value is pushed before each execution. It stays an integer when all
/// three operands are integers and is a float otherwise.
pub(super) fn for_(interp: &mut Interpreter) -> Result<(), Error> {
    let stack = interp.operands_mut();
    let block = stack.pop("for")?;
    let limit = stack.pop("for")?;
    let step = stack.pop("for")?;
    let init = stack.pop("for")?;
    let block = block.into_block("for")?;

    match (init, step, limit) {
        (Value::Integer(_), Value::Integer(0), Value::Integer(_)) => {
            Err(Error::domain("for", "zero step"))
        }
        (Value::Integer(mut i), Value::Integer(step), Value::Integer(limit)) => {
            while (step > 0 && i <= limit) || (step < 0 && i >= limit) {
                interp.operands_mut().push(Value::Integer(i));
                interp.execute(&block)?;
                match i.checked_add(step) {
                    Some(next) => i = next,
                    None => break,
                }
            }
            Ok(())
        }
        (init, step, limit) => {
            let (Some(mut i), Some(step), Some(limit)) =
                (init.as_f64(), step.as_f64(), limit.as_f64())
            else {
                return Err(Error::type_mismatch(
                    "for",
                    format!(
                        "expected numbers, got {}, {} and {}",
                        init.kind(),
                        step.kind(),
                        limit.kind()
                    ),
                ));
            };
            if step == 0.0 || step.is_nan() {
                return Err(Error::domain("for", "zero step"));
            }
            while (step > 0.0 && i <= limit) || (step < 0.0 && i >= limit) {
                interp.operands_mut().push(Value::Float(i));
                interp.execute(&block)?;
                let next = i + step;
                // A step lost to rounding would never terminate
                if next == i {
                    break;
                }
                i = next;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used)] // test code OK
mod tests {
    use crate::builtinops::testing::OpTestResult::*;
    use crate::builtinops::testing::{eval_script, interpreter, run_op_tests};
    use crate::value::val;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_conditionals_data_driven() {
        let test_cases = vec![
            ("true { 1 } if", Stack(vec![val(1)])),
            ("false { 1 } if", Stack(vec![])),
            ("1 2 lt { (yes) } if", Stack(vec![val("yes")])),
            ("1 { 2 } if", TypeError),
            ("true 5 if", TypeError),
            ("{ 1 } if", Underflow),
            ("true { 1 } { 2 } ifelse", Stack(vec![val(1)])),
            ("false { 1 } { 2 } ifelse", Stack(vec![val(2)])),
            ("false { 1 } 2 ifelse", TypeError),
            ("0 { 1 } { 2 } ifelse", TypeError),
            ("{ 1 } { 2 } ifelse", Underflow),
        ];

        run_op_tests(test_cases);
    }

    #[test]
    fn test_loops_data_driven() {
        let test_cases = vec![
            ("0 3 { 1 add } repeat", Stack(vec![val(3)])),
            ("5 0 { pop } repeat", Stack(vec![val(5)])),
            ("5 -1 { pop } repeat", Stack(vec![val(5)])),
            ("2.5 { } repeat", TypeError),
            ("3 4 repeat", TypeError),
            ("1 1 3 { } for", Stack(vec![val(1), val(2), val(3)])),
            ("3 -1 1 { } for", Stack(vec![val(3), val(2), val(1)])),
            ("1 1 0 { } for", Stack(vec![])),
            ("0 1 1 4 { add } for", Stack(vec![val(10)])),
            (
                "0 0.5 1 { } for",
                Stack(vec![val(0.0), val(0.5), val(1.0)]),
            ),
            ("1 0 3 { } for", RangeError),
            ("1 0.0 3 { } for", RangeError),
            ("(a) 1 3 { } for", TypeError),
            ("1 1 3 5 for", TypeError),
            ("1 3 { } for", Underflow),
        ];

        run_op_tests(test_cases);
    }

    #[test]
    fn test_loop_over_named_block() {
        let (mut interp, _) = interpreter();
        eval_script(&mut interp, "/inner { 10 20 } def 1 1 2 { inner } for").unwrap();
        assert_eq!(
            interp.operands().as_slice(),
            &[val(1), val(10), val(20), val(2), val(10), val(20)]
        );
    }

    #[test]
    fn test_loop_continues_after_error_in_body() {
        let (mut interp, _) = interpreter();
        eval_script(&mut interp, "1 1 3 { missing } for").unwrap();
        assert_eq!(interp.operands().as_slice(), &[val(1), val(2), val(3)]);
    }

    #[test]
    fn test_integer_for_stops_at_overflow() {
        let (mut interp, _) = interpreter();
        let script = "9223372036854775806 1 9223372036854775807 { } for";
        eval_script(&mut interp, script).unwrap();
        assert_eq!(
            interp.operands().as_slice(),
            &[val(i64::MAX - 1), val(i64::MAX)]
        );
    }
}
