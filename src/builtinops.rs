//! Built-in operator registry.
//!
//! Every operator is a plain function over the interpreter state. The registry records
//! each one once, together with its minimum operand count; the evaluator checks that
//! count before invoking the function, so an operator may assume its operands are
//! present and concentrate on type and domain validation.
//!
//! ```text
//! 2 3 add          % -> 5
//! /x 10 def x      % -> 10
//! 1 1 3 { } for    % -> 1 2 3
//! ```
//!
//! ## Operand consumption
//!
//! Operators pop their operands before validating their kinds. A `typecheck` or
//! `rangecheck` failure therefore leaves the offending operands consumed. `copy` is the
//! exception: it checks both its count and the stack depth before touching anything.
//!
//! ## Strictness
//!
//! - **No coercion**: strings never become numbers and nothing is "truthy"
//! - **Overflow detection**: integer arithmetic reports overflow as a range error
//! - **Like kinds**: ordering comparisons reject mixed kinds other than integer/float

use std::sync::LazyLock;

use crate::Error;
use crate::environment::Dictionary;
use crate::evaluator::Interpreter;
use crate::value::Value;

mod container;
mod control;
mod dict;
mod io;
mod logic;
mod math;
mod stack;

/// Signature shared by all built-in operators
pub type OperatorFn = fn(&mut Interpreter) -> Result<(), Error>;

/// Definition of a built-in operator
#[derive(Debug)]
pub struct Operator {
    /// Name the operator is bound to in the base dictionary
    pub name: &'static str,
    /// Minimum number of operands that must be on the stack
    pub arity: usize,
    pub func: OperatorFn,
}

/// Global registry of all built-in operators, in base dictionary order.
static OPERATORS: LazyLock<Vec<Operator>> = LazyLock::new(|| {
    fn op(name: &'static str, arity: usize, func: OperatorFn) -> Operator {
        Operator { name, arity, func }
    }

    vec![
        // Stack manipulation
        op("exch", 2, stack::exch),
        op("pop", 1, stack::pop),
        op("copy", 1, stack::copy),
        op("dup", 1, stack::dup),
        op("clear", 0, stack::clear),
        op("count", 0, stack::count),
        // Arithmetic
        op("add", 2, math::add),
        op("sub", 2, math::sub),
        op("mul", 2, math::mul),
        op("div", 2, math::div),
        op("idiv", 2, math::idiv),
        op("mod", 2, math::modulo),
        op("abs", 1, math::abs),
        op("neg", 1, math::neg),
        op("ceiling", 1, math::ceiling),
        op("floor", 1, math::floor),
        op("round", 1, math::round),
        op("sqrt", 1, math::sqrt),
        // Dictionaries
        op("dict", 1, dict::dict),
        op("length", 1, dict::length),
        op("maxlength", 1, dict::maxlength),
        op("begin", 1, dict::begin),
        op("end", 0, dict::end),
        op("def", 2, dict::def),
        // Strings and arrays
        op("get", 2, container::get),
        op("getinterval", 3, container::getinterval),
        op("putinterval", 3, container::putinterval),
        // Comparison and boolean
        op("eq", 2, logic::eq),
        op("ne", 2, logic::ne),
        op("ge", 2, logic::ge),
        op("gt", 2, logic::gt),
        op("le", 2, logic::le),
        op("lt", 2, logic::lt),
        op("and", 2, logic::and),
        op("or", 2, logic::or),
        op("not", 1, logic::not),
        // Control flow
        op("if", 2, control::if_),
        op("ifelse", 3, control::ifelse),
        op("repeat", 2, control::repeat),
        op("for", 4, control::for_),
        // Output
        op("print", 1, io::print),
        op("=", 1, io::show),
        op("==", 1, io::show_literal),
    ]
});

/// All built-in operators
pub fn operators() -> &'static [Operator] {
    OPERATORS.as_slice()
}

/// A fresh base dictionary holding every built-in operator
pub fn base_dictionary() -> Dictionary {
    let mut dict = Dictionary::new();
    for op in operators() {
        dict.define(op.name, Value::Operator(op));
    }
    dict
}
