// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Function calls, construction and property reads.

use speccheck_ast::expr::ArrowBody;

use crate::builtins::{self, Builtin};
use crate::value::{Closure, Value};

use super::eval_expr::array_index;
use super::{Interpreter, RuntimeError, MAX_CALL_DEPTH};

impl Interpreter {
    pub(crate) fn call_value(&mut self, callee: &Value, args: Vec<Value>) -> Result<Value, RuntimeError> {
        match callee {
            Value::Function(closure) => self.call_closure(closure, args),
            Value::Native(builtin) => self.call_builtin(builtin, args),
            other => Err(RuntimeError::type_error(format!(
                "{} is not a function",
                crate::inspect::inspect(other)
            ))),
        }
    }

    fn call_closure(&mut self, closure: &Closure, args: Vec<Value>) -> Result<Value, RuntimeError> {
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::range_error("Maximum call stack size exceeded"));
        }
        self.call_depth += 1;

        let env = closure.env.child();
        let mut args = args.into_iter();
        for param in &closure.func.params {
            env.define(param.clone(), args.next().unwrap_or(Value::Undefined), true);
        }

        let result = match &closure.func.body {
            ArrowBody::Expr(expr) => self.eval_expr(expr, &env),
            ArrowBody::Block(stmts) => match self.exec_stmts(stmts, &env) {
                Ok(_) => Ok(Value::Undefined),
                Err(RuntimeError::Return(value)) => Ok(value),
                Err(err) => Err(err),
            },
        };

        self.call_depth -= 1;
        result
    }

    /// `new callee(args)`. `name` is the callee as written, for messages.
    pub(crate) fn construct(
        &mut self,
        callee: &Value,
        args: Vec<Value>,
        name: &str,
    ) -> Result<Value, RuntimeError> {
        match callee {
            Value::Native(builtin) if builtin.is_constructor() => self.construct_builtin(builtin, args),
            _ => Err(RuntimeError::type_error(format!("{} is not a constructor", name))),
        }
    }

    /// Property read. Reading from `undefined` or `null` raises a TypeError.
    pub(crate) fn member(&mut self, target: &Value, key: &str) -> Result<Value, RuntimeError> {
        let found = match target {
            Value::Undefined | Value::Null => {
                return Err(RuntimeError::type_error(format!(
                    "Cannot read properties of {} (reading '{}')",
                    target.to_js_string(),
                    key
                )));
            }

            Value::Object(map) => map.borrow().get(key).cloned(),

            Value::Array(items) => match key {
                "length" => Some(Value::Number(items.borrow().len() as f64)),
                _ => match array_index(key) {
                    Some(index) => Some(items.borrow().get(index).cloned().unwrap_or(Value::Undefined)),
                    None => builtins::array::method(target, key),
                },
            },

            Value::String(s) => match key {
                "length" => Some(Value::Number(s.chars().count() as f64)),
                _ => match array_index(key) {
                    Some(index) => Some(
                        s.chars()
                            .nth(index)
                            .map(|c| Value::from(c.to_string()))
                            .unwrap_or(Value::Undefined),
                    ),
                    None => builtins::string::method(target, key),
                },
            },

            Value::Number(_) => builtins::number::method(target, key),

            Value::Error(err) => {
                let err = err.borrow();
                match key {
                    "name" => Some(Value::string(&err.name)),
                    "message" => Some(Value::string(&err.message)),
                    _ => err.props.get(key).cloned(),
                }
            }

            Value::Promise(_) => builtins::promise::method(target, key),

            Value::Function(closure) => match key {
                "name" => Some(Value::string(closure.name.as_deref().unwrap_or(""))),
                "length" => Some(Value::Number(closure.func.params.len() as f64)),
                _ => None,
            },

            Value::Native(builtin) => match key {
                "name" => Some(Value::from(builtin.name())),
                _ => builtin.static_member(key),
            },

            Value::Bool(_) => None,
        };
        Ok(found.unwrap_or(Value::Undefined))
    }

    /// Call a function argument supplied to a builtin (`map`, `then`, ...).
    pub(crate) fn call_callback(
        &mut self,
        callback: &Value,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        if !callback.is_callable() {
            return Err(RuntimeError::type_error(format!(
                "{} is not a function",
                crate::inspect::inspect(callback)
            )));
        }
        self.call_value(callback, args)
    }
}

impl Builtin {
    fn is_constructor(&self) -> bool {
        matches!(
            self,
            Builtin::ErrorCtor(_) | Builtin::Promise | Builtin::String | Builtin::Number | Builtin::Boolean
        )
    }
}
