//! Call tracking for nested translations.

use crate::interpreter::EvalError;

/// Tracks the chain of messages currently being rendered.
///
/// Each nested translation pushes its key before rendering and pops it
/// afterwards. A key that is already on the stack is a cycle.
#[derive(Debug)]
pub struct CallStack {
    /// Keys currently being rendered, outermost first.
    keys: Vec<String>,
    /// Maximum allowed nesting depth (default 32).
    max_depth: usize,
}

impl Default for CallStack {
    fn default() -> Self {
        Self::with_max_depth(32)
    }
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            keys: Vec::new(),
            max_depth,
        }
    }

    /// Enter `key`, failing on a cycle or when too deep.
    pub fn push(&mut self, key: &str) -> Result<(), EvalError> {
        if self.keys.iter().any(|k| k == key) {
            let mut chain = self.keys.clone();
            chain.push(key.to_string());
            return Err(EvalError::CyclicReference { chain });
        }
        if self.keys.len() >= self.max_depth {
            return Err(EvalError::MaxDepthExceeded);
        }
        self.keys.push(key.to_string());
        Ok(())
    }

    pub fn pop(&mut self) {
        self.keys.pop();
    }

    pub fn depth(&self) -> usize {
        self.keys.len()
    }
}
