// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The interpreter implementation.
//!
//! A tree-walk interpreter over the AST. Raised values travel as
//! [`RuntimeError::Thrown`]; `return` unwinds as [`RuntimeError::Return`].

mod call;
mod eval_expr;
mod exec_stmt;
pub(crate) mod operators;
mod settle;

use std::{io, panic, thread};

use speccheck_ast::stmt::Program;

use crate::env::Scope;
use crate::value::Value;

/// Calls nested deeper than this raise a RangeError instead of
/// overflowing the native stack.
pub const MAX_CALL_DEPTH: usize = 10_000;

/// Native stack needed to reach [`MAX_CALL_DEPTH`] nested calls.
pub const EVAL_STACK_SIZE: usize = 1 << 30;

/// Run `f` on a thread with an [`EVAL_STACK_SIZE`] stack.
///
/// Deep recursion in evaluated code can exhaust a default thread stack
/// long before [`MAX_CALL_DEPTH`] is reached. A panic in `f` resumes on
/// the calling thread.
pub fn with_eval_stack<F, R>(f: F) -> io::Result<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let handle = thread::Builder::new()
        .name("speccheck-eval".to_string())
        .stack_size(EVAL_STACK_SIZE)
        .spawn(f)?;
    match handle.join() {
        Ok(result) => Ok(result),
        Err(payload) => panic::resume_unwind(payload),
    }
}

/// The tree-walk interpreter.
///
/// Holds no bindings of its own: every evaluation runs against a
/// [`Scope`] handed in by the caller.
#[derive(Debug, Default)]
pub struct Interpreter {
    call_depth: usize,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate source text in `scope`.
    ///
    /// Returns the completion value of the program, or the raised value.
    /// Syntax errors are raised as `SyntaxError` objects.
    pub fn eval_source(&mut self, source: &str, scope: &Scope) -> Result<Value, Value> {
        let program = speccheck_parser::parse_source(source)
            .map_err(|err| Value::error("SyntaxError", err.message))?;
        self.eval_program(&program, scope)
    }

    /// Evaluate an already parsed program in `scope`.
    pub fn eval_program(&mut self, program: &Program, scope: &Scope) -> Result<Value, Value> {
        match self.exec_stmts(&program.stmts, &scope.env) {
            Ok(completion) => Ok(completion.unwrap_or(Value::Undefined)),
            Err(RuntimeError::Thrown(value)) => Err(value),
            Err(RuntimeError::Return(_)) => Err(Value::error("SyntaxError", "Illegal return statement")),
        }
    }

    /// Read a property the way a member expression does.
    pub fn get_property(&mut self, target: &Value, key: &str) -> Result<Value, Value> {
        self.member(target, key).map_err(RuntimeError::into_value)
    }
}

/// Runtime errors.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// A raised value: `throw`, or a fault such as a ReferenceError.
    #[error("{}", describe_thrown(.0))]
    Thrown(Value),

    // Control flow (not an actual error)
    #[error("return")]
    Return(Value),
}

impl RuntimeError {
    pub fn type_error(message: impl Into<String>) -> Self {
        RuntimeError::Thrown(Value::error("TypeError", message))
    }

    pub fn reference_error(message: impl Into<String>) -> Self {
        RuntimeError::Thrown(Value::error("ReferenceError", message))
    }

    pub fn range_error(message: impl Into<String>) -> Self {
        RuntimeError::Thrown(Value::error("RangeError", message))
    }

    pub fn syntax_error(message: impl Into<String>) -> Self {
        RuntimeError::Thrown(Value::error("SyntaxError", message))
    }

    /// The value carried by this error.
    pub fn into_value(self) -> Value {
        match self {
            RuntimeError::Thrown(v) | RuntimeError::Return(v) => v,
        }
    }
}

fn describe_thrown(value: &Value) -> String {
    match value {
        Value::Error(_) => value.to_js_string(),
        other => format!("Uncaught {}", crate::inspect::inspect(other)),
    }
}

#[cfg(test)]
mod tests;
