use crate::Error;
use crate::evaluator::Interpreter;
use crate::value::Value;

/// `(text) print`: write a string with no line break
pub(super) fn print(interp: &mut Interpreter) -> Result<(), Error> {
    match interp.operands_mut().pop("print")? {
        Value::String(s) => interp.write_output(&s),
        other => Err(Error::type_mismatch(
            "print",
            format!("expected string, got {}", other.kind()),
        )),
    }
}

/// `any =`
pub(super) fn show(interp: &mut Interpreter) -> Result<(), Error> {
    let value = interp.operands_mut().pop("=")?;
    interp.write_output(&format!("{value}\n"))
}

/// `any ==`
pub(super) fn show_literal(interp: &mut Interpreter) -> Result<(), Error> {
    let value = interp.operands_mut().pop("==")?;
    interp.write_output(&format!("{}\n", value.literal()))
}

#[cfg(test)]
mod tests {
    use crate::builtinops::testing::OpTestResult::*;
    use crate::builtinops::testing::run_op_tests;

    #[test]
    fn test_output_operators_data_driven() {
        let test_cases = vec![
            ("(hello) print", Output("hello")),
            ("(a) print (b) print", Output("ab")),
            ("() print", Output("")),
            ("5 print", TypeError),
            ("print", Underflow),
            ("5 =", Output("5\n")),
            ("2.5 =", Output("2.5\n")),
            ("9 3 div =", Output("3.0\n")),
            ("true =", Output("true\n")),
            ("(hi there) =", Output("hi there\n")),
            ("/x =", Output("/x\n")),
            ("[1 2 foo] =", Output("[1 2 foo]\n")),
            ("{ 1 2 add } =", Output("{1 2 add}\n")),
            ("1 dict =", Output("-dict-\n")),
            ("(hi there) ==", Output("(hi there)\n")),
            ("42 ==", Output("42\n")),
            ("false ==", Output("false\n")),
            ("=", Underflow),
            ("==", Underflow),
        ];

        run_op_tests(test_cases);
    }
}
