//! End-to-end scenarios driven through the public interpreter API.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use psinterp::environment::CodeBlock;
use psinterp::{Config, Error, Interpreter, Scoping, Value, tokenize};

#[derive(Clone, Default)]
struct Captured(Rc<RefCell<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn session(scoping: Scoping) -> (Interpreter, Captured) {
    let output = Captured::default();
    let interp = Interpreter::with_output(Config { scoping }, Box::new(output.clone()));
    (interp, output)
}

fn process_all(interp: &mut Interpreter, tokens: &[&str]) {
    for token in tokens {
        interp.process(token);
    }
}

fn stack_debug(interp: &Interpreter) -> String {
    format!("{:?}", interp.operands().as_slice())
}

#[test]
fn test_arithmetic_scenarios() {
    let cases: Vec<(&[&str], &str)> = vec![
        (&["2", "3", "add"], "[Integer(5)]"),
        (&["10", "4", "sub"], "[Integer(6)]"),
        (&["9", "2", "idiv"], "[Integer(4)]"),
        (&["9", "2", "mod"], "[Integer(1)]"),
        (&["9", "3", "div"], "[Float(3.0)]"),
    ];

    for (tokens, expected) in cases {
        let (mut interp, _) = session(Scoping::Dynamic);
        process_all(&mut interp, tokens);
        assert_eq!(stack_debug(&interp), expected, "{tokens:?}");
    }
}

#[test]
fn test_underflow_leaves_empty_stack_empty() {
    let (mut interp, _) = session(Scoping::Dynamic);
    assert_eq!(interp.eval_token("1"), Ok(()));
    assert!(matches!(
        interp.eval_token("add"),
        Err(Error::StackUnderflow { op: "add", .. })
    ));
    assert_eq!(interp.operands().as_slice(), &[Value::Integer(1)]);

    let (mut interp, _) = session(Scoping::Dynamic);
    process_all(&mut interp, &["add"]);
    assert!(interp.operands().is_empty());
}

#[test]
fn test_definition_lookup_round_trip() {
    let (mut interp, _) = session(Scoping::Dynamic);
    process_all(&mut interp, &["/x", "2", "def", "x"]);
    assert_eq!(interp.operands().as_slice(), &[Value::Integer(2)]);
}

#[test]
fn test_code_block_token_round_trip() {
    let tokens = tokenize("{ 1 2 add }");
    assert_eq!(tokens, vec!["{ 1 2 add }"]);

    let (mut interp, _) = session(Scoping::Dynamic);
    interp.process(&tokens[0]);
    match interp.operands().as_slice() {
        [Value::Block(block)] => assert_eq!(block.tokens(), ["1", "2", "add"]),
        other => panic!("expected a single code block, got {other:?}"),
    }
}

#[test]
fn test_copy_properties() {
    let (mut interp, _) = session(Scoping::Dynamic);
    interp.run_line("1 2 3");
    let before = stack_debug(&interp);

    interp.run_line("0 copy");
    assert_eq!(stack_debug(&interp), before);

    assert!(matches!(
        interp.eval_token("4").and_then(|()| interp.eval_token("copy")),
        Err(Error::StackUnderflow { op: "copy", .. })
    ));
    interp.run_line("pop");
    assert_eq!(stack_debug(&interp), before);
}

#[test]
fn test_for_pushes_control_values_in_order() {
    let (mut interp, _) = session(Scoping::Dynamic);
    interp.run_line("1 1 3 { } for");
    assert_eq!(stack_debug(&interp), "[Integer(1), Integer(2), Integer(3)]");
}

/// Bind a block, then bind a name it refers to after the block was read.
const LATE_BINDING: &str = "/show-y { y } def /y (late) def show-y";

#[test]
fn test_dynamic_scoping_sees_late_binding() {
    let (mut interp, _) = session(Scoping::Dynamic);
    interp.run_line(LATE_BINDING);
    assert_eq!(interp.operands().as_slice(), &[Value::from("late")]);
}

#[test]
fn test_lexical_scoping_ignores_late_binding() {
    let (mut interp, _) = session(Scoping::Lexical);
    interp.run_line(LATE_BINDING);
    assert!(interp.operands().is_empty());

    // The name itself is still bound at top level
    interp.run_line("y");
    assert_eq!(interp.operands().as_slice(), &[Value::from("late")]);
}

#[test]
fn test_lexical_scoping_sees_value_at_capture() {
    let script = "/x (outer) def /get-x { x } def 1 dict begin /x (inner) def get-x end";

    let (mut dynamic, _) = session(Scoping::Dynamic);
    dynamic.run_line(script);
    assert_eq!(dynamic.operands().as_slice(), &[Value::from("inner")]);

    let (mut lexical, _) = session(Scoping::Lexical);
    lexical.run_line(script);
    assert_eq!(lexical.operands().as_slice(), &[Value::from("outer")]);
}

#[test]
fn test_lexical_block_definitions_do_not_leak() {
    let (mut interp, _) = session(Scoping::Lexical);
    interp.run_line("/setter { /leaked 1 def } def setter");
    assert!(matches!(
        interp.eval_token("leaked"),
        Err(Error::UndefinedName(name)) if name == "leaked"
    ));
    assert_eq!(interp.dictionaries().depth(), 1);
}

#[test]
fn test_execute_block_directly() {
    let (mut interp, _) = session(Scoping::Dynamic);
    let block = CodeBlock::new(
        vec!["6".to_owned(), "7".to_owned(), "mul".to_owned()],
        interp.dictionaries(),
    );
    assert_eq!(interp.execute(&block), Ok(()));
    assert_eq!(interp.operands().as_slice(), &[Value::Integer(42)]);
}

#[test]
fn test_program_output() {
    let (mut interp, output) = session(Scoping::Dynamic);
    let program = [
        "% squares of 1..4",
        "/square { dup mul } def",
        "1 1 4 { square = } for",
        "(done) print",
        "(a string) ==",
        "2 sqrt 2 sqrt mul round =",
        "1 0 div",
        "(still running) print",
    ];
    for line in program {
        interp.run_line(line);
    }
    assert_eq!(
        output.text(),
        "1\n4\n9\n16\ndone(a string)\n2\nstill running"
    );
    assert!(interp.operands().is_empty());
}

#[test]
fn test_named_block_as_loop_body() {
    let (mut interp, output) = session(Scoping::Dynamic);
    // Block literals do not nest, so loop bodies call other blocks by name
    interp.run_line("/tick { dup = 1 sub } def");
    interp.run_line("3 3 { tick } repeat pop");
    assert_eq!(output.text(), "3\n2\n1\n");
    assert!(interp.operands().is_empty());
}

#[test]
fn test_runaway_recursion_recovers() {
    let (mut interp, _) = session(Scoping::Dynamic);
    interp.run_line("/forever { forever } def forever 1 2 add");
    assert_eq!(interp.operands().as_slice(), &[Value::Integer(3)]);
}
