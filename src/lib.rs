//! psinterp - a small PostScript-style stack language interpreter
//!
//! This crate implements a minimal stack language in the PostScript tradition: source
//! lines are split into tokens, each token is either classified as a literal and pushed
//! onto the operand stack, or looked up in the dictionary stack and executed.
//!
//! ```text
//! 2 3 add =                 % prints 5
//! /square { dup mul } def
//! 7 square =                % prints 49
//! 1 1 3 { = } for           % prints 1, 2 and 3
//! ```
//!
//! ## Scoping
//!
//! Code blocks (`{ ... }`) capture a copy of the dictionary stack when they are read.
//! Whether that captured environment is used is decided once, when the interpreter is
//! created:
//!
//! - **Dynamic** (default): blocks run against the live dictionary stack at call time.
//! - **Lexical**: blocks run against a fresh copy of the stack they captured; the live
//!   stack is restored afterwards, whatever happened during execution.
//!
//! ## Error Recovery
//!
//! Operators report failures through [`Error`]. The evaluator reports an error raised by
//! a single token and moves on to the next one, so one bad token never aborts a line or
//! a running block.
//!
//! ## Modules
//!
//! - `tokenizer`: splitting a source line into raw tokens
//! - `parser`: classifying a single token as a literal value
//! - `environment`: dictionaries, the dictionary stack and code block closures
//! - `evaluator`: interpreter state and token dispatch
//! - `builtinops`: the built-in operator library

use thiserror::Error;

/// Maximum nesting of code block executions.
/// Deeper recursion is reported as [`Error::DepthExceeded`] instead of exhausting the native stack.
pub const MAX_EXEC_DEPTH: usize = 256;

/// Marker character that turns a token into a name literal (`/x`).
pub const NAME_MARKER: char = '/';

/// Error types for the interpreter
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A token is not a literal. Recovered by the evaluator, which falls back to lookup.
    #[error("not a literal: {0}")]
    ParseFailed(String),
    /// A bare token was not bound in any searched dictionary.
    #[error("undefined: {0}")]
    UndefinedName(String),
    #[error("stackunderflow in {op}: needs {needed}, found {found}")]
    StackUnderflow {
        op: &'static str,
        needed: usize,
        found: usize,
    },
    #[error("typecheck in {op}: {message}")]
    TypeMismatch { op: &'static str, message: String },
    #[error("rangecheck in {op}: {message}")]
    DomainError { op: &'static str, message: String },
    #[error("execution depth limit exceeded (max: {0})")]
    DepthExceeded(usize),
    #[error("I/O error: {0}")]
    Io(String),
}

impl Error {
    /// Create a TypeMismatch for an operator
    pub fn type_mismatch(op: &'static str, message: impl Into<String>) -> Self {
        Error::TypeMismatch {
            op,
            message: message.into(),
        }
    }

    /// Create a DomainError for an operator
    pub fn domain(op: &'static str, message: impl Into<String>) -> Self {
        Error::DomainError {
            op,
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub mod builtinops;
pub mod environment;
pub mod evaluator;
pub mod parser;
pub mod tokenizer;
pub mod value;

pub use environment::Scoping;
pub use evaluator::{Config, Interpreter};
pub use tokenizer::tokenize;
pub use value::Value;
