// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Environment for variable bindings.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::interp::RuntimeError;
use crate::value::Value;

struct Binding {
    value: Value,
    mutable: bool,
}

/// One frame of bindings with an optional enclosing frame.
#[derive(Default)]
struct Frame {
    bindings: IndexMap<String, Binding>,
    parent: Option<Environment>,
}

/// A chain of binding frames. Closures capture the environment they were
/// created in, so frames are shared.
#[derive(Clone, Default)]
pub(crate) struct Environment(Rc<RefCell<Frame>>);

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new frame whose parent is `self`.
    pub fn child(&self) -> Self {
        Environment(Rc::new(RefCell::new(Frame {
            bindings: IndexMap::new(),
            parent: Some(self.clone()),
        })))
    }

    /// Define a variable in this frame, replacing any earlier binding of
    /// the same name.
    pub fn define(&self, name: impl Into<String>, value: Value, mutable: bool) {
        self.0.borrow_mut().bindings.insert(name.into(), Binding { value, mutable });
    }

    /// Look up a variable through the frame chain.
    pub fn get(&self, name: &str) -> Option<Value> {
        let frame = self.0.borrow();
        match frame.bindings.get(name) {
            Some(binding) => Some(binding.value.clone()),
            None => frame.parent.as_ref().and_then(|parent| parent.get(name)),
        }
    }

    /// Assign to the nearest binding of `name`. Assigning a name that was
    /// never declared creates it in the outermost frame.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), RuntimeError> {
        let parent = {
            let mut frame = self.0.borrow_mut();
            if let Some(binding) = frame.bindings.get_mut(name) {
                if !binding.mutable {
                    return Err(RuntimeError::type_error("Assignment to constant variable."));
                }
                binding.value = value;
                return Ok(());
            }
            frame.parent.clone()
        };
        match parent {
            Some(parent) => parent.assign(name, value),
            None => {
                self.define(name, value, true);
                Ok(())
            }
        }
    }

    pub fn has(&self, name: &str) -> bool {
        let frame = self.0.borrow();
        frame.bindings.contains_key(name) || frame.parent.as_ref().is_some_and(|p| p.has(name))
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.0.borrow();
        f.debug_struct("Environment")
            .field("names", &frame.bindings.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// The global evaluation scope: one mutable namespace, seeded with the
/// builtins, that outlives every evaluation run against it.
#[derive(Debug, Clone)]
pub struct Scope {
    pub(crate) env: Environment,
}

impl Scope {
    pub fn new() -> Self {
        let env = Environment::new();
        crate::builtins::install_globals(&env);
        Self { env }
    }

    /// Bind `name` in the global frame, replacing any earlier binding.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.env.define(name, value, true);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.env.get(name)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_frames_shadow_and_fall_through() {
        let global = Environment::new();
        global.define("a", Value::Number(1.0), true);
        let inner = global.child();
        inner.define("b", Value::Number(2.0), true);
        assert!(matches!(inner.get("a"), Some(Value::Number(n)) if n == 1.0));
        assert!(global.get("b").is_none());

        inner.assign("a", Value::Number(3.0)).unwrap();
        assert!(matches!(global.get("a"), Some(Value::Number(n)) if n == 3.0));
    }

    #[test]
    fn undeclared_assignment_lands_in_outermost_frame() {
        let global = Environment::new();
        let inner = global.child().child();
        inner.assign("late", Value::Bool(true)).unwrap();
        assert!(global.has("late"));
    }

    #[test]
    fn constants_reject_assignment() {
        let env = Environment::new();
        env.define("k", Value::Number(1.0), false);
        let err = env.assign("k", Value::Number(2.0)).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: Assignment to constant variable.");
    }

    #[test]
    fn scope_has_builtins() {
        let scope = Scope::new();
        assert!(scope.get("Promise").is_some());
        assert!(scope.get("Error").is_some());
        assert!(scope.get("missing").is_none());
    }
}
