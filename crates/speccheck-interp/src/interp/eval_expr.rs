// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression evaluation.

use std::rc::Rc;

use indexmap::IndexMap;
use speccheck_ast::expr::{Expr, ExprKind, LogicalOp, UnaryOp};

use crate::builtins::array;
use crate::env::Environment;
use crate::value::{Closure, Value};

use super::{operators, Interpreter, RuntimeError};

impl Interpreter {
    pub(crate) fn eval_expr(&mut self, expr: &Expr, env: &Environment) -> Result<Value, RuntimeError> {
        match &expr.kind {
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::String(s) => Ok(Value::string(s)),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Undefined => Ok(Value::Undefined),

            ExprKind::Ident(name) => env
                .get(name)
                .ok_or_else(|| RuntimeError::reference_error(format!("{} is not defined", name))),

            ExprKind::Array(items) => {
                let items = items
                    .iter()
                    .map(|item| self.eval_expr(item, env))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::array(items))
            }

            ExprKind::Object(props) => {
                let mut map = IndexMap::new();
                for prop in props {
                    let value = self.eval_expr(&prop.value, env)?;
                    map.insert(prop.key.clone(), value);
                }
                Ok(Value::object(map))
            }

            ExprKind::Member { object, property } => {
                let target = self.eval_expr(object, env)?;
                self.member(&target, property)
            }

            ExprKind::Index { object, index } => {
                let target = self.eval_expr(object, env)?;
                let key = self.eval_expr(index, env)?;
                self.member(&target, &property_key(&key))
            }

            ExprKind::Call { callee, args } => {
                let function = self.eval_expr(callee, env)?;
                let args = self.eval_args(args, env)?;
                if !function.is_callable() {
                    return Err(RuntimeError::type_error(format!(
                        "{} is not a function",
                        describe_callee(callee)
                    )));
                }
                self.call_value(&function, args)
            }

            ExprKind::New { callee, args } => {
                let constructor = self.eval_expr(callee, env)?;
                let args = self.eval_args(args, env)?;
                self.construct(&constructor, args, &describe_callee(callee))
            }

            ExprKind::Arrow(func) => Ok(Value::Function(Rc::new(Closure {
                name: None,
                func: Rc::clone(func),
                env: env.clone(),
            }))),

            ExprKind::Unary { op, operand } => {
                // typeof tolerates undeclared names
                if let (UnaryOp::Typeof, ExprKind::Ident(name)) = (op, &operand.kind) {
                    if !env.has(name) {
                        return Ok(Value::string("undefined"));
                    }
                }
                let value = self.eval_expr(operand, env)?;
                Ok(match op {
                    UnaryOp::Not => Value::Bool(!value.is_truthy()),
                    UnaryOp::Neg => Value::Number(-value.to_number()),
                    UnaryOp::Plus => Value::Number(value.to_number()),
                    UnaryOp::Typeof => Value::string(value.type_of()),
                })
            }

            ExprKind::Binary { op, left, right } => {
                let left = self.eval_expr(left, env)?;
                let right = self.eval_expr(right, env)?;
                Ok(operators::binary(*op, &left, &right))
            }

            ExprKind::Logical { op, left, right } => {
                let left = self.eval_expr(left, env)?;
                let short_circuit = match op {
                    LogicalOp::And => !left.is_truthy(),
                    LogicalOp::Or => left.is_truthy(),
                    LogicalOp::Nullish => !left.is_nullish(),
                };
                if short_circuit {
                    Ok(left)
                } else {
                    self.eval_expr(right, env)
                }
            }

            ExprKind::Conditional { cond, then_branch, else_branch } => {
                if self.eval_expr(cond, env)?.is_truthy() {
                    self.eval_expr(then_branch, env)
                } else {
                    self.eval_expr(else_branch, env)
                }
            }

            ExprKind::Assign { target, op, value } => self.eval_assign(target, *op, value, env),
        }
    }

    fn eval_args(&mut self, args: &[Expr], env: &Environment) -> Result<Vec<Value>, RuntimeError> {
        args.iter().map(|arg| self.eval_expr(arg, env)).collect()
    }

    fn eval_assign(
        &mut self,
        target: &Expr,
        op: Option<speccheck_ast::expr::BinOp>,
        value: &Expr,
        env: &Environment,
    ) -> Result<Value, RuntimeError> {
        match &target.kind {
            ExprKind::Ident(name) => {
                let new_value = match op {
                    Some(op) => {
                        let current = env.get(name).ok_or_else(|| {
                            RuntimeError::reference_error(format!("{} is not defined", name))
                        })?;
                        let rhs = self.eval_expr(value, env)?;
                        operators::binary(op, &current, &rhs)
                    }
                    None => self.eval_expr(value, env)?,
                };
                env.assign(name, new_value.clone())?;
                Ok(new_value)
            }

            ExprKind::Member { object, property } => {
                let target = self.eval_expr(object, env)?;
                self.assign_property(&target, property, op, value, env)
            }

            ExprKind::Index { object, index } => {
                let target = self.eval_expr(object, env)?;
                let key = property_key(&self.eval_expr(index, env)?);
                self.assign_property(&target, &key, op, value, env)
            }

            _ => Err(RuntimeError::syntax_error("Invalid left-hand side in assignment")),
        }
    }

    fn assign_property(
        &mut self,
        target: &Value,
        key: &str,
        op: Option<speccheck_ast::expr::BinOp>,
        value: &Expr,
        env: &Environment,
    ) -> Result<Value, RuntimeError> {
        let new_value = match op {
            Some(op) => {
                let current = self.member(target, key)?;
                let rhs = self.eval_expr(value, env)?;
                operators::binary(op, &current, &rhs)
            }
            None => self.eval_expr(value, env)?,
        };
        set_property(target, key, new_value.clone())?;
        Ok(new_value)
    }
}

/// Property key for a computed member access (`a[key]`).
pub(crate) fn property_key(key: &Value) -> String {
    key.to_js_string()
}

/// Write a property. Writes to primitives are silently dropped.
pub(crate) fn set_property(target: &Value, key: &str, value: Value) -> Result<(), RuntimeError> {
    match target {
        Value::Undefined | Value::Null => Err(RuntimeError::type_error(format!(
            "Cannot set properties of {} (setting '{}')",
            target.to_js_string(),
            key
        ))),
        Value::Object(map) => {
            map.borrow_mut().insert(key.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            let mut items = items.borrow_mut();
            if key == "length" {
                array::resize(&mut items, value.to_number())?;
            } else if let Some(index) = array_index(key) {
                if index >= items.len() {
                    array::resize(&mut items, index as f64 + 1.0)?;
                }
                items[index] = value;
            }
            Ok(())
        }
        Value::Error(err) => {
            let mut err = err.borrow_mut();
            match key {
                "name" => err.name = value.to_js_string(),
                "message" => err.message = value.to_js_string(),
                _ => {
                    err.props.insert(key.to_string(), value);
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Canonical array index: digits only, no leading zeros.
pub(crate) fn array_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

/// Source-like rendering of a callee for "is not a function" messages.
fn describe_callee(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Ident(name) => name.clone(),
        ExprKind::Member { object, property } => format!("{}.{}", describe_callee(object), property),
        ExprKind::Index { object, .. } => format!("{}[...]", describe_callee(object)),
        ExprKind::Call { callee, .. } => format!("{}(...)", describe_callee(callee)),
        _ => "expression".to_string(),
    }
}
