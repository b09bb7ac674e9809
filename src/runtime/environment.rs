use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::runtime::Value;

/// Variable storage for a running program
///
/// There is exactly one set of current bindings. A function call saves a
/// snapshot of it on the call stack and restores that snapshot on return,
/// so a callee sees every caller binding while anything it binds is
/// discarded afterwards.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// Current bindings
    variables: HashMap<String, Value>,
    /// Saved bindings, one per active call
    call_stack: Vec<HashMap<String, Value>>,
}

impl Environment {
    /// Creates an empty environment
    pub fn new() -> Self {
        Environment::default()
    }

    /// Binds `name`, replacing any previous binding
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    /// Gets the value of a variable by name
    pub fn get(&self, name: &str) -> Result<&Value> {
        self.variables
            .get(name)
            .ok_or_else(|| Error::UndefinedVariable {
                name: name.to_string(),
            })
    }

    /// Mutable access to an existing binding
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Value> {
        self.variables
            .get_mut(name)
            .ok_or_else(|| Error::UndefinedVariable {
                name: name.to_string(),
            })
    }

    /// Checks if a variable is bound
    pub fn exists(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Copy of the current bindings. Arrays in the copy share their cells
    /// with the originals.
    pub fn snapshot(&self) -> HashMap<String, Value> {
        self.variables.clone()
    }

    /// Saves the current bindings before a call. The bindings themselves
    /// are left in place.
    pub fn enter_call(&mut self) {
        let saved = self.snapshot();
        self.call_stack.push(saved);
    }

    /// Replaces the current bindings with the snapshot taken by the
    /// matching [`enter_call`](Self::enter_call)
    pub fn exit_call(&mut self) {
        if let Some(saved) = self.call_stack.pop() {
            self.variables = saved;
        }
    }

    /// Number of calls in progress (0 at top level)
    pub fn call_depth(&self) -> usize {
        self.call_stack.len()
    }
}
