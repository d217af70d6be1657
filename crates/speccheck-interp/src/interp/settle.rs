// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Settling promises.

use crate::promise::{Promise, Reaction};
use crate::value::Value;

use super::{Interpreter, RuntimeError};

impl Interpreter {
    /// Await a value: run whatever deferred work settles it and return the
    /// fulfilled value or the rejection reason. Non-promises are returned
    /// as fulfilled.
    pub fn settle(&mut self, value: &Value) -> Result<Value, Value> {
        match value {
            Value::Promise(promise) => self.settle_promise(promise),
            other => Ok(other.clone()),
        }
    }

    pub(crate) fn settle_promise(&mut self, promise: &Promise) -> Result<Value, Value> {
        let reaction = match promise.take_reaction() {
            Ok(reaction) => reaction,
            Err(outcome) => return outcome,
        };

        let outcome = match reaction {
            Reaction::Running => Err(Value::error(
                "TypeError",
                "Chaining cycle detected for promise #<Promise>",
            )),
            // Nothing can resolve it any more once it is being awaited
            Reaction::Unresolved => Err(Value::error("Error", "Promise was never settled")),
            Reaction::Adopt(inner) => self.settle_promise(&inner),
            Reaction::Then { source, on_fulfilled, on_rejected } => match self.settle_promise(&source) {
                Ok(value) => match on_fulfilled {
                    Some(handler) => self.run_handler(&handler, value),
                    None => Ok(value),
                },
                Err(reason) => match on_rejected {
                    Some(handler) => self.run_handler(&handler, reason),
                    None => Err(reason),
                },
            },
            Reaction::All(items) => self.settle_all(items),
        };

        promise.finish(outcome.clone());
        outcome
    }

    fn settle_all(&mut self, items: Vec<Value>) -> Result<Value, Value> {
        let mut values = Vec::with_capacity(items.len());
        for item in &items {
            values.push(self.settle(item)?);
        }
        Ok(Value::array(values))
    }

    /// Run a `then`/`catch` handler; a returned promise is adopted.
    fn run_handler(&mut self, handler: &Value, arg: Value) -> Result<Value, Value> {
        match self.call_value(handler, vec![arg]) {
            Ok(value) => self.settle(&value),
            Err(RuntimeError::Thrown(reason)) => Err(reason),
            Err(RuntimeError::Return(value)) => Ok(value),
        }
    }
}
