//! Dictionaries, the dictionary stack and code block closures.
//!
//! The dictionary stack is the scope chain: the bottom entry is the permanent base
//! dictionary holding the built-in operators, the top entry receives new definitions.
//! A [`CodeBlock`] records a copy of every dictionary on the stack at the moment it is
//! read, which is what lexical scoping executes against.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::Error;
use crate::value::{DictRef, Value};

/// Name resolution policy, fixed for the lifetime of an interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scoping {
    /// Blocks run against the live dictionary stack
    #[default]
    Dynamic,
    /// Blocks run against a fresh copy of the stack captured when they were read
    Lexical,
}

/// A mapping from names (without the `/` marker) to values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dictionary {
    bindings: HashMap<String, Value>,
}

impl Dictionary {
    pub fn new() -> Self {
        Dictionary {
            bindings: HashMap::new(),
        }
    }

    pub fn define(&mut self, key: impl Into<String>, value: Value) {
        self.bindings.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.bindings.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.bindings.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// The scope chain searched by name lookup, top to bottom
#[derive(Debug, Clone)]
pub struct DictionaryStack {
    frames: Vec<DictRef>,
}

impl DictionaryStack {
    /// Create a stack holding only `base`. The base entry can never be removed.
    pub fn new(base: Dictionary) -> Self {
        DictionaryStack {
            frames: vec![Rc::new(RefCell::new(base))],
        }
    }

    /// Rebuild a live stack from a captured snapshot. Every dictionary is copied again,
    /// so definitions made while the result is live never reach the snapshot.
    pub fn from_snapshot(snapshot: &[Dictionary]) -> Self {
        DictionaryStack {
            frames: snapshot
                .iter()
                .map(|dict| Rc::new(RefCell::new(dict.clone())))
                .collect(),
        }
    }

    /// Copy every dictionary currently on the stack, bottom first.
    pub fn snapshot(&self) -> Vec<Dictionary> {
        self.frames.iter().map(|dict| dict.borrow().clone()).collect()
    }

    /// Return the value bound to `key` in the topmost dictionary that defines it.
    pub fn lookup(&self, key: &str) -> Option<Value> {
        self.frames
            .iter()
            .rev()
            .find_map(|dict| dict.borrow().get(key).cloned())
    }

    /// Bind `key` in the top dictionary.
    pub fn define(&self, key: impl Into<String>, value: Value) {
        if let Some(top) = self.frames.last() {
            top.borrow_mut().define(key, value);
        }
    }

    /// Push a dictionary; it becomes the target of new definitions.
    pub fn begin(&mut self, dict: DictRef) {
        self.frames.push(dict);
    }

    /// Pop the top dictionary. Popping the base dictionary is an error.
    pub fn end(&mut self) -> Result<DictRef, Error> {
        if self.frames.len() > 1
            && let Some(dict) = self.frames.pop()
        {
            return Ok(dict);
        }
        Err(Error::StackUnderflow {
            op: "end",
            needed: 2,
            found: self.frames.len(),
        })
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn top(&self) -> Option<&DictRef> {
        self.frames.last()
    }
}

/// Deferred code: the raw tokens of a `{ ... }` literal plus the environment captured
/// when it was read. Neither part changes after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    tokens: Vec<String>,
    captured: Vec<Dictionary>,
}

impl CodeBlock {
    pub fn new(tokens: Vec<String>, env: &DictionaryStack) -> Self {
        CodeBlock {
            tokens,
            captured: env.snapshot(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The dictionaries that were on the stack when the block was read, bottom first
    pub fn captured(&self) -> &[Dictionary] {
        &self.captured
    }
}
