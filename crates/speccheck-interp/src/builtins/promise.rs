// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `Promise` statics, the constructor, and `then`/`catch`.

use crate::interp::{Interpreter, RuntimeError};
use crate::promise::{Promise, Reaction};
use crate::value::Value;

use super::Builtin;

const METHODS: &[&str] = &["then", "catch"];

pub(crate) fn method(receiver: &Value, key: &str) -> Option<Value> {
    super::bind_method(receiver, key, METHODS)
}

/// `Promise.resolve(v)`: a promise is returned unchanged.
pub(super) fn resolve(value: Value) -> Value {
    match value {
        Value::Promise(_) => value,
        other => Value::Promise(Promise::fulfilled(other)),
    }
}

/// `Promise.all(items)`
pub(super) fn all(items: &Value) -> Value {
    match items {
        Value::Array(items) => Value::Promise(Promise::pending(Reaction::All(items.borrow().clone()))),
        other => Value::Promise(Promise::rejected(Value::error(
            "TypeError",
            format!("{} is not iterable", crate::inspect::inspect(other)),
        ))),
    }
}

/// `new Promise(executor)`. The executor runs immediately; a throw from it
/// rejects the promise unless it was already resolved.
pub(super) fn construct(interp: &mut Interpreter, args: Vec<Value>) -> Result<Value, RuntimeError> {
    let executor = args.into_iter().next().unwrap_or(Value::Undefined);
    if !executor.is_callable() {
        return Err(RuntimeError::type_error(format!(
            "Promise resolver {} is not a function",
            crate::inspect::inspect(&executor)
        )));
    }

    let promise = Promise::pending(Reaction::Unresolved);
    let resolve = Value::native(Builtin::Resolver { promise: promise.clone(), rejects: false });
    let reject = Value::native(Builtin::Resolver { promise: promise.clone(), rejects: true });
    match interp.call_value(&executor, vec![resolve, reject]) {
        Ok(_) | Err(RuntimeError::Return(_)) => {}
        Err(RuntimeError::Thrown(reason)) => promise.resolve_with(Err(reason)),
    }
    Ok(Value::Promise(promise))
}

/// `then(onFulfilled, onRejected)` and `catch(onRejected)`. Handlers that
/// are not functions pass the outcome through.
pub(super) fn call(source: &Promise, name: &str, args: &[Value]) -> Value {
    let handler = |i: usize| args.get(i).filter(|v| v.is_callable()).cloned();
    let (on_fulfilled, on_rejected) = match name {
        "catch" => (None, handler(0)),
        _ => (handler(0), handler(1)),
    };
    Value::Promise(Promise::pending(Reaction::Then {
        source: source.clone(),
        on_fulfilled,
        on_rejected,
    }))
}
