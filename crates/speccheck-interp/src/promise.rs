// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Promises as explicit deferred tasks.
//!
//! A promise is either settled or pending with a [`Reaction`] describing
//! the work that settles it. Nothing runs until the interpreter settles
//! the promise, which executes the reaction chain depth-first.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::value::Value;

/// Shared handle to a promise.
#[derive(Clone)]
pub struct Promise(Rc<RefCell<PromiseState>>);

/// Observable state of a promise.
pub enum PromiseState {
    Pending(Reaction),
    Fulfilled(Value),
    Rejected(Value),
}

/// Deferred work that settles a pending promise.
pub enum Reaction {
    /// Created by `new Promise(...)`; waits for its resolving functions.
    Unresolved,
    /// Settles the same way as another promise.
    Adopt(Promise),
    /// `source.then(on_fulfilled, on_rejected)`
    Then {
        source: Promise,
        on_fulfilled: Option<Value>,
        on_rejected: Option<Value>,
    },
    /// `Promise.all(items)`
    All(Vec<Value>),
    /// The reaction is being executed; reaching it again is a cycle.
    Running,
}

impl Promise {
    pub fn fulfilled(value: Value) -> Self {
        Self::with_state(PromiseState::Fulfilled(value))
    }

    pub fn rejected(reason: Value) -> Self {
        Self::with_state(PromiseState::Rejected(reason))
    }

    pub fn pending(reaction: Reaction) -> Self {
        Self::with_state(PromiseState::Pending(reaction))
    }

    fn with_state(state: PromiseState) -> Self {
        Promise(Rc::new(RefCell::new(state)))
    }

    pub fn ptr_eq(&self, other: &Promise) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    /// The outcome if settled, `None` while pending.
    pub fn outcome(&self) -> Option<Result<Value, Value>> {
        match &*self.0.borrow() {
            PromiseState::Pending(_) => None,
            PromiseState::Fulfilled(v) => Some(Ok(v.clone())),
            PromiseState::Rejected(e) => Some(Err(e.clone())),
        }
    }

    /// Take the pending reaction, leaving `Running` in its place.
    /// Returns the outcome instead when already settled.
    pub(crate) fn take_reaction(&self) -> Result<Reaction, Result<Value, Value>> {
        let mut state = self.0.borrow_mut();
        match &mut *state {
            PromiseState::Pending(reaction) => Ok(std::mem::replace(reaction, Reaction::Running)),
            PromiseState::Fulfilled(v) => Err(Ok(v.clone())),
            PromiseState::Rejected(e) => Err(Err(e.clone())),
        }
    }

    pub(crate) fn finish(&self, outcome: Result<Value, Value>) {
        *self.0.borrow_mut() = match outcome {
            Ok(v) => PromiseState::Fulfilled(v),
            Err(e) => PromiseState::Rejected(e),
        };
    }

    /// Apply a resolving function. Only a promise still waiting on its
    /// resolving functions is affected; later calls are ignored.
    pub(crate) fn resolve_with(&self, outcome: Result<Value, Value>) {
        let mut state = self.0.borrow_mut();
        if !matches!(&*state, PromiseState::Pending(Reaction::Unresolved)) {
            return;
        }
        *state = match outcome {
            Ok(Value::Promise(inner)) if inner.ptr_eq(self) => PromiseState::Rejected(Value::error(
                "TypeError",
                "Chaining cycle detected for promise #<Promise>",
            )),
            Ok(Value::Promise(inner)) => PromiseState::Pending(Reaction::Adopt(inner)),
            Ok(v) => PromiseState::Fulfilled(v),
            Err(e) => PromiseState::Rejected(e),
        };
    }

    pub(crate) fn with_state_ref<R>(&self, f: impl FnOnce(&PromiseState) -> R) -> R {
        f(&self.0.borrow())
    }
}

impl fmt::Debug for Promise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::inspect::inspect(&Value::Promise(self.clone())))
    }
}
