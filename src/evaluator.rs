use std::io::Write;
use std::ops::{Deref, DerefMut};

use tracing::{debug, error};

use crate::Error;
use crate::MAX_EXEC_DEPTH;
use crate::builtinops::base_dictionary;
use crate::environment::{CodeBlock, DictionaryStack, Scoping};
use crate::parser::parse_literal;
use crate::tokenizer::tokenize;
use crate::value::Value;

/// Startup configuration; fixed once the interpreter is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    pub scoping: Scoping,
}

/// The operand stack shared by every operator
#[derive(Debug, Clone, Default)]
pub struct OperandStack {
    values: Vec<Value>,
}

impl OperandStack {
    pub fn new() -> Self {
        OperandStack { values: Vec::new() }
    }

    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    /// Fail with StackUnderflow unless at least `needed` operands are present.
    pub fn require(&self, op: &'static str, needed: usize) -> Result<(), Error> {
        if self.values.len() < needed {
            return Err(Error::StackUnderflow {
                op,
                needed,
                found: self.values.len(),
            });
        }
        Ok(())
    }

    pub fn pop(&mut self, op: &'static str) -> Result<Value, Error> {
        self.values.pop().ok_or(Error::StackUnderflow {
            op,
            needed: 1,
            found: 0,
        })
    }

    /// Borrow the value `depth` entries below the top (0 is the top).
    pub fn peek(&self, depth: usize) -> Option<&Value> {
        self.values.iter().rev().nth(depth)
    }

    /// Duplicate the top `n` values, keeping their order.
    pub(crate) fn duplicate_top(&mut self, n: usize) {
        let start = self.values.len().saturating_sub(n);
        self.values.extend_from_within(start..);
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values from bottom to top
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }
}

/// Interpreter state: both stacks, the scoping policy and the output stream.
///
/// All evaluation is synchronous. A call to [`Interpreter::process`] returns only after
/// the token and every block it triggers have run to completion.
pub struct Interpreter {
    operands: OperandStack,
    dictionaries: DictionaryStack,
    config: Config,
    output: Box<dyn Write>,
    depth: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Dynamic scoping, writing to standard output
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_output(config, Box::new(std::io::stdout()))
    }

    /// Create an interpreter writing operator output to `output`.
    pub fn with_output(config: Config, output: Box<dyn Write>) -> Self {
        Interpreter {
            operands: OperandStack::new(),
            dictionaries: DictionaryStack::new(base_dictionary()),
            config,
            output,
            depth: 0,
        }
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn operands(&self) -> &OperandStack {
        &self.operands
    }

    pub(crate) fn operands_mut(&mut self) -> &mut OperandStack {
        &mut self.operands
    }

    pub fn dictionaries(&self) -> &DictionaryStack {
        &self.dictionaries
    }

    pub(crate) fn dictionaries_mut(&mut self) -> &mut DictionaryStack {
        &mut self.dictionaries
    }

    /// Tokenize a line and process every token in order.
    pub fn run_line(&mut self, line: &str) {
        for token in tokenize(line) {
            self.process(&token);
        }
    }

    /// Process one token, reporting any error and carrying on.
    ///
    /// This is the recovery boundary: a failing token leaves the operand stack in
    /// whatever state the failing operator left it, and the caller continues with the
    /// next token.
    pub fn process(&mut self, token: &str) {
        if let Err(err) = self.eval_token(token) {
            error!(token, "{err}");
        }
    }

    /// Process one token, returning the first error instead of reporting it.
    pub fn eval_token(&mut self, token: &str) -> Result<(), Error> {
        match parse_literal(token, &self.dictionaries) {
            Ok(value) => {
                debug!(token, kind = value.kind(), "literal");
                self.operands.push(value);
                Ok(())
            }
            Err(Error::ParseFailed(_)) => {
                let value = self.lookup(token)?;
                self.execute_value(value)
            }
            Err(err) => Err(err),
        }
    }

    /// Resolve a bare token against the current dictionary stack.
    pub fn lookup(&self, token: &str) -> Result<Value, Error> {
        self.dictionaries
            .lookup(token)
            .ok_or_else(|| Error::UndefinedName(token.to_owned()))
    }

    /// Run whatever a name resolved to: operators are invoked, blocks executed,
    /// anything else is pushed as data.
    fn execute_value(&mut self, value: Value) -> Result<(), Error> {
        match value {
            Value::Operator(op) => {
                debug!(op = op.name, "invoke");
                self.operands.require(op.name, op.arity)?;
                (op.func)(self)
            }
            Value::Block(block) => self.execute(&block),
            other => {
                self.operands.push(other);
                Ok(())
            }
        }
    }

    /// Execute a code block's tokens under the configured scoping policy.
    ///
    /// Errors raised by individual tokens are reported and skipped; only exceeding
    /// [`MAX_EXEC_DEPTH`] fails the call itself.
    pub fn execute(&mut self, block: &CodeBlock) -> Result<(), Error> {
        if self.depth >= MAX_EXEC_DEPTH {
            return Err(Error::DepthExceeded(MAX_EXEC_DEPTH));
        }
        debug!(depth = self.depth, tokens = block.tokens().len(), "enter block");

        let mut scope = match self.config.scoping {
            Scoping::Dynamic => ExecScope::enter(self, None),
            Scoping::Lexical => {
                let captured = DictionaryStack::from_snapshot(block.captured());
                ExecScope::enter(self, Some(captured))
            }
        };
        for token in block.tokens() {
            scope.process(token);
        }
        Ok(())
    }

    pub(crate) fn write_output(&mut self, text: &str) -> Result<(), Error> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()?;
        Ok(())
    }
}

/// One level of block execution.
///
/// Tracks nesting depth and, under lexical scoping, swaps the captured dictionary
/// stack in for the live one. Dropping the scope undoes both, including when a token
/// inside the block panics.
struct ExecScope<'a> {
    interp: &'a mut Interpreter,
    saved: Option<DictionaryStack>,
}

impl<'a> ExecScope<'a> {
    fn enter(interp: &'a mut Interpreter, substitute: Option<DictionaryStack>) -> Self {
        interp.depth += 1;
        let saved = substitute.map(|stack| std::mem::replace(&mut interp.dictionaries, stack));
        ExecScope { interp, saved }
    }
}

impl Deref for ExecScope<'_> {
    type Target = Interpreter;

    fn deref(&self) -> &Interpreter {
        self.interp
    }
}

impl DerefMut for ExecScope<'_> {
    fn deref_mut(&mut self) -> &mut Interpreter {
        self.interp
    }
}

impl Drop for ExecScope<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.interp.dictionaries = saved;
        }
        self.interp.depth -= 1;
        debug!(depth = self.interp.depth, "leave block");
    }
}
