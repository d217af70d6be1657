// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The evaluation capability the engine runs blocks against.

use indexmap::IndexMap;
use speccheck_interp::{Interpreter, Scope, Value};

/// Outcome of awaiting a value.
#[derive(Debug, Clone)]
pub enum Settled<V> {
    Fulfilled(V),
    Rejected(V),
}

/// A language the engine can check.
///
/// The engine treats values as opaque. It asks the evaluator to run code
/// against a scope, to await results, to read the two or three properties
/// the comparison forms need, and to compare and render values.
///
/// Contract for raising: `evaluate` returns `Err` with the raised value for
/// every raise, whether or not it is an error object. The engine captures
/// it as the block's current result; a raise never aborts the run.
pub trait Evaluator {
    type Value: Clone;
    type Scope;

    /// A fresh scope with the language's globals installed.
    fn new_scope(&mut self) -> Self::Scope;

    /// Install a name in the scope before any block runs.
    fn bind(&mut self, scope: &mut Self::Scope, name: &str, value: Self::Value);

    fn evaluate(&mut self, code: &str, scope: &mut Self::Scope) -> Result<Self::Value, Self::Value>;

    /// Await a value. Values that are not asynchronous settle fulfilled
    /// with themselves.
    fn settle(&mut self, value: &Self::Value, scope: &mut Self::Scope) -> Settled<Self::Value>;

    /// Read a named property. Reading from a value that cannot have
    /// properties raises.
    fn property(&mut self, value: &Self::Value, key: &str) -> Result<Self::Value, Self::Value>;

    /// Build `{ tag: value }`.
    fn record(&mut self, tag: &str, value: Self::Value) -> Self::Value;

    fn string(&mut self, text: &str) -> Self::Value;

    /// String conversion as used by string concatenation.
    fn to_display(&self, value: &Self::Value) -> String;

    /// Message of a raised value, for diagnostics.
    fn error_message(&self, raised: &Self::Value) -> String;

    fn deep_equal(&self, a: &Self::Value, b: &Self::Value) -> bool;

    /// Stable single-line rendering for diagnostics.
    fn inspect(&self, value: &Self::Value) -> String;
}

impl Evaluator for Interpreter {
    type Value = Value;
    type Scope = Scope;

    fn new_scope(&mut self) -> Scope {
        Scope::new()
    }

    fn bind(&mut self, scope: &mut Scope, name: &str, value: Value) {
        scope.define(name, value);
    }

    fn evaluate(&mut self, code: &str, scope: &mut Scope) -> Result<Value, Value> {
        self.eval_source(code, scope)
    }

    fn settle(&mut self, value: &Value, _scope: &mut Scope) -> Settled<Value> {
        match Interpreter::settle(self, value) {
            Ok(v) => Settled::Fulfilled(v),
            Err(e) => Settled::Rejected(e),
        }
    }

    fn property(&mut self, value: &Value, key: &str) -> Result<Value, Value> {
        self.get_property(value, key)
    }

    fn record(&mut self, tag: &str, value: Value) -> Value {
        let mut props = IndexMap::new();
        props.insert(tag.to_string(), value);
        Value::object(props)
    }

    fn string(&mut self, text: &str) -> Value {
        Value::string(text)
    }

    fn to_display(&self, value: &Value) -> String {
        value.to_js_string()
    }

    fn error_message(&self, raised: &Value) -> String {
        match raised {
            Value::Error(err) => err.borrow().message.clone(),
            other => speccheck_interp::inspect(other),
        }
    }

    fn deep_equal(&self, a: &Value, b: &Value) -> bool {
        speccheck_interp::deep_equal(a, b)
    }

    fn inspect(&self, value: &Value) -> String {
        speccheck_interp::inspect(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settle_plain_and_promise() {
        let mut interp = Interpreter::new();
        let mut scope = Evaluator::new_scope(&mut interp);
        let plain = interp.evaluate("5", &mut scope).unwrap();
        assert!(matches!(Evaluator::settle(&mut interp, &plain, &mut scope), Settled::Fulfilled(Value::Number(n)) if n == 5.0));

        let rejected = interp.evaluate("Promise.reject(new Error('no'))", &mut scope).unwrap();
        match Evaluator::settle(&mut interp, &rejected, &mut scope) {
            Settled::Rejected(e) => assert_eq!(interp.error_message(&e), "no"),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn raises_are_values() {
        let mut interp = Interpreter::new();
        let mut scope = Evaluator::new_scope(&mut interp);
        let raised = interp.evaluate("throw 'plain'", &mut scope).unwrap_err();
        assert_eq!(interp.error_message(&raised), "'plain'");
        let raised = interp.evaluate("missing", &mut scope).unwrap_err();
        assert_eq!(interp.error_message(&raised), "missing is not defined");
    }

    #[test]
    fn record_and_inspect() {
        let mut interp = Interpreter::new();
        let v = Value::from(42.0);
        let rec = interp.record("Resolve", v);
        assert_eq!(interp.inspect(&rec), "{ Resolve: 42 }");
    }

    #[test]
    fn bindings_are_visible() {
        let mut interp = Interpreter::new();
        let mut scope = Evaluator::new_scope(&mut interp);
        interp.bind(&mut scope, "answer", Value::from(42.0));
        let v = interp.evaluate("answer + 1", &mut scope).unwrap();
        assert_eq!(interp.inspect(&v), "43");
    }
}
