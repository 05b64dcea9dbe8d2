//! Classification of a single raw token as a literal value.
//!
//! Interpretations are tried in a fixed order and the first one that succeeds wins:
//! string, boolean, number, code block, name, array. A token that matches none of
//! them is not an error as such: [`Error::ParseFailed`] tells the evaluator to fall
//! back to dictionary lookup.

use std::rc::Rc;

use tracing::trace;

use crate::Error;
use crate::NAME_MARKER;
use crate::environment::{CodeBlock, DictionaryStack};
use crate::value::{IntType, Value};

type Classifier = fn(&str, &DictionaryStack) -> Option<Value>;

/// Literal interpretations in priority order
const CLASSIFIERS: [(&str, Classifier); 6] = [
    ("string", |token, _| parse_string(token)),
    ("boolean", |token, _| parse_bool(token)),
    ("number", |token, _| parse_number(token)),
    ("code block", parse_code_block),
    ("name", |token, _| parse_name(token)),
    ("array", |token, _| parse_array(token)),
];

/// Classify `token` as a literal. Code blocks capture a snapshot of `env`.
pub fn parse_literal(token: &str, env: &DictionaryStack) -> Result<Value, Error> {
    for (kind, classify) in CLASSIFIERS {
        match classify(token, env) {
            Some(value) => return Ok(value),
            None => trace!(token, kind, "not a literal of this kind"),
        }
    }
    Err(Error::ParseFailed(token.to_owned()))
}

/// Strip `open` and `close` from a token that is at least two characters long.
fn delimited(token: &str, open: char, close: char) -> Option<&str> {
    token.strip_prefix(open)?.strip_suffix(close)
}

/// `(text)` -> the text between the parentheses
fn parse_string(token: &str) -> Option<Value> {
    delimited(token, '(', ')').map(|inner| Value::String(inner.to_owned()))
}

fn parse_bool(token: &str) -> Option<Value> {
    match token {
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        _ => None,
    }
}

/// Anything that parses as a float is a number; integral values become integers.
fn parse_number(token: &str) -> Option<Value> {
    if let Ok(n) = token.parse::<IntType>() {
        return Some(Value::Integer(n));
    }
    let x = token.parse::<f64>().ok()?;
    // i64::MAX is not representable as f64; the bound below is exactly 2^63
    if x.is_finite() && x.fract() == 0.0 && x >= IntType::MIN as f64 && x < -(IntType::MIN as f64)
    {
        Some(Value::Integer(x as IntType))
    } else {
        Some(Value::Float(x))
    }
}

/// `{ t1 t2 ... }` -> a block of whitespace-separated tokens, closing over `env`
fn parse_code_block(token: &str, env: &DictionaryStack) -> Option<Value> {
    let inner = delimited(token, '{', '}')?;
    let tokens = inner.split_whitespace().map(str::to_owned).collect();
    Some(Value::Block(Rc::new(CodeBlock::new(tokens, env))))
}

fn parse_name(token: &str) -> Option<Value> {
    token
        .starts_with(NAME_MARKER)
        .then(|| Value::Name(token.to_owned()))
}

/// `[ t1 t2 ... ]` -> an array of raw, unclassified tokens
fn parse_array(token: &str) -> Option<Value> {
    let inner = delimited(token, '[', ']')?;
    Some(Value::array(inner.split_whitespace()))
}
