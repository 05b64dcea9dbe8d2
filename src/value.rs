//! This module defines the [`Value`] type held on the operand stack and in dictionaries,
//! together with the two textual renderings used by the output operators: the
//! human-readable form produced by `Display` (used by `=`) and the literal form produced
//! by [`Value::literal`] (used by `==`). Conversion traits for common Rust types and small
//! helpers such as [`val`] and [`name`] keep construction terse in code and tests.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::Error;
use crate::NAME_MARKER;
use crate::builtinops::Operator;
use crate::environment::{CodeBlock, Dictionary};

/// Type alias for integer values in the interpreter
pub type IntType = i64;

/// Shared, mutable token sequence backing an array value
pub type ArrayRef = Rc<RefCell<Vec<String>>>;

/// Shared, mutable dictionary backing a dictionary value
pub type DictRef = Rc<RefCell<Dictionary>>;

/// Core value type of the interpreter
///
/// Arrays and dictionaries are reference types: copies made by `dup`, `def` or `begin`
/// all observe the same underlying container. Strings are immutable; operators that
/// "modify" a string produce a new value.
#[derive(Clone)]
pub enum Value {
    Integer(IntType),
    Float(f64),
    Bool(bool),
    /// String contents without the surrounding parentheses
    String(String),
    /// Literal name, stored with its leading `/`
    Name(String),
    /// Raw token text, classified only when an operator reads an element
    Array(ArrayRef),
    /// Deferred code plus the environment captured when it was read
    Block(Rc<CodeBlock>),
    Dictionary(DictRef),
    Operator(&'static Operator),
}

impl Value {
    /// Construct an array value from its raw tokens.
    pub fn array<I, S>(tokens: I) -> Value
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::Array(Rc::new(RefCell::new(
            tokens.into_iter().map(Into::into).collect(),
        )))
    }

    /// Construct a dictionary value.
    pub fn dictionary(dict: Dictionary) -> Value {
        Value::Dictionary(Rc::new(RefCell::new(dict)))
    }

    /// Short kind name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Bool(_) => "boolean",
            Value::String(_) => "string",
            Value::Name(_) => "name",
            Value::Array(_) => "array",
            Value::Block(_) => "code block",
            Value::Dictionary(_) => "dictionary",
            Value::Operator(_) => "operator",
        }
    }

    /// Numeric view of the value, if it is a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Consume the value as an integer, or fail with a TypeMismatch naming `op`.
    pub fn into_integer(self, op: &'static str) -> Result<IntType, Error> {
        match self {
            Value::Integer(n) => Ok(n),
            other => Err(Error::type_mismatch(
                op,
                format!("expected integer, got {}", other.kind()),
            )),
        }
    }

    pub fn into_bool(self, op: &'static str) -> Result<bool, Error> {
        match self {
            Value::Bool(b) => Ok(b),
            other => Err(Error::type_mismatch(
                op,
                format!("expected boolean, got {}", other.kind()),
            )),
        }
    }

    pub fn into_block(self, op: &'static str) -> Result<Rc<CodeBlock>, Error> {
        match self {
            Value::Block(block) => Ok(block),
            other => Err(Error::type_mismatch(
                op,
                format!("expected code block, got {}", other.kind()),
            )),
        }
    }

    pub fn into_dictionary(self, op: &'static str) -> Result<DictRef, Error> {
        match self {
            Value::Dictionary(dict) => Ok(dict),
            other => Err(Error::type_mismatch(
                op,
                format!("expected dictionary, got {}", other.kind()),
            )),
        }
    }

    /// Literal rendering used by `==`: strings keep their parentheses.
    pub fn literal(&self) -> Literal<'_> {
        Literal(self)
    }
}

/// Format a float the way the interpreter prints it: integral values keep a `.0`
/// suffix, very large or very small magnitudes use exponent notation.
pub(crate) fn format_real(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_owned();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_owned();
    }
    let magnitude = x.abs();
    if magnitude >= 1e16 || (magnitude != 0.0 && magnitude < 1e-4) {
        format!("{x:e}")
    } else if x.fract() == 0.0 {
        format!("{x:.1}")
    } else {
        format!("{x}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{}", format_real(*x)),
            Value::Bool(b) => write!(f, "{b}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Name(s) => write!(f, "{s}"),
            Value::Array(tokens) => write!(f, "[{}]", tokens.borrow().join(" ")),
            Value::Block(block) => write!(f, "{{{}}}", block.tokens().join(" ")),
            Value::Dictionary(_) => write!(f, "-dict-"),
            Value::Operator(op) => write!(f, "--{}--", op.name),
        }
    }
}

/// Display adapter for the `==` rendering of a value
pub struct Literal<'a>(&'a Value);

impl fmt::Display for Literal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::String(s) => write!(f, "({s})"),
            other => write!(f, "{other}"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "Integer({n})"),
            Value::Float(x) => write!(f, "Float({x:?})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Name(s) => write!(f, "Name({s})"),
            Value::Array(tokens) => write!(f, "Array({:?})", tokens.borrow()),
            Value::Block(block) => write!(f, "Block({:?})", block.tokens()),
            Value::Dictionary(dict) => write!(f, "Dictionary(len={})", dict.borrow().len()),
            Value::Operator(op) => write!(f, "Operator({})", op.name),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            // Integers and floats compare numerically
            (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
                self.as_f64() == other.as_f64()
            }
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Name(a), Value::Name(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            // Dictionaries can hold each other, so only the same dictionary is equal to itself
            (Value::Dictionary(a), Value::Dictionary(b)) => Rc::ptr_eq(a, b),
            // Blocks carry a private environment, so only the same block is equal to itself
            (Value::Block(a), Value::Block(b)) => Rc::ptr_eq(a, b),
            (Value::Operator(a), Value::Operator(b)) => a.name == b.name,
            _ => false,
        }
    }
}

// From trait implementations for Value - enables .into() conversion
impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

macro_rules! impl_from_integer {
    ($int_type:ty) => {
        impl From<$int_type> for Value {
            fn from(n: $int_type) -> Self {
                Value::Integer(n as IntType)
            }
        }
    };
}

impl_from_integer!(i8);
impl_from_integer!(i16);
impl_from_integer!(i32);
impl_from_integer!(IntType);
impl_from_integer!(u8);
impl_from_integer!(u16);
impl_from_integer!(u32);

/// Helper function for creating Values from Rust literals
#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn val<T: Into<Value>>(value: T) -> Value {
    value.into()
}

/// Helper function for creating literal names; the `/` marker is added if missing
#[cfg_attr(not(test), expect(dead_code))]
pub(crate) fn name<S: AsRef<str>>(key: S) -> Value {
    let key = key.as_ref();
    if key.starts_with(NAME_MARKER) {
        Value::Name(key.to_owned())
    } else {
        Value::Name(format!("{NAME_MARKER}{key}"))
    }
}
