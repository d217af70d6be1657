// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement execution.

use std::rc::Rc;

use speccheck_ast::expr::ExprKind;
use speccheck_ast::stmt::{Stmt, StmtKind};

use crate::env::Environment;
use crate::value::{Closure, Value};

use super::{Interpreter, RuntimeError};

impl Interpreter {
    /// Execute statements in order. Returns the completion value: the value
    /// of the last expression statement that ran, if any.
    pub(crate) fn exec_stmts(
        &mut self,
        stmts: &[Stmt],
        env: &Environment,
    ) -> Result<Option<Value>, RuntimeError> {
        let mut completion = None;
        for stmt in stmts {
            if let Some(value) = self.exec_stmt(stmt, env)? {
                completion = Some(value);
            }
        }
        Ok(completion)
    }

    fn exec_stmt(&mut self, stmt: &Stmt, env: &Environment) -> Result<Option<Value>, RuntimeError> {
        match &stmt.kind {
            StmtKind::Expr(expr) => Ok(Some(self.eval_expr(expr, env)?)),

            StmtKind::Decl { kind, name, init } => {
                let value = match init {
                    // `const f = () => ...` names the function `f`
                    Some(expr) => match &expr.kind {
                        ExprKind::Arrow(func) => Value::Function(Rc::new(Closure {
                            name: Some(name.clone()),
                            func: Rc::clone(func),
                            env: env.clone(),
                        })),
                        _ => self.eval_expr(expr, env)?,
                    },
                    None => Value::Undefined,
                };
                env.define(name.clone(), value, !kind.is_const());
                Ok(None)
            }

            StmtKind::Throw(expr) => Err(RuntimeError::Thrown(self.eval_expr(expr, env)?)),

            StmtKind::Return(expr) => {
                let value = match expr {
                    Some(expr) => self.eval_expr(expr, env)?,
                    None => Value::Undefined,
                };
                Err(RuntimeError::Return(value))
            }

            StmtKind::If { cond, then_branch, else_branch } => {
                if self.eval_expr(cond, env)?.is_truthy() {
                    self.exec_stmts(then_branch, &env.child())
                } else if let Some(else_branch) = else_branch {
                    self.exec_stmts(else_branch, &env.child())
                } else {
                    Ok(None)
                }
            }

            StmtKind::Block(stmts) => self.exec_stmts(stmts, &env.child()),
        }
    }
}
