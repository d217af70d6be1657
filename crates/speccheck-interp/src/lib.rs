// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Tree-walk interpreter for the speccheck evaluation language.
//!
//! Values are reference-counted and single-threaded. A [`Scope`] is the
//! long-lived global namespace; every evaluation receives it explicitly.
//! Promises never run on their own: their deferred work happens only when
//! [`Interpreter::settle`] is asked for the outcome.

mod builtins;
mod env;
mod equal;
mod inspect;
mod interp;
mod json;
mod promise;
mod value;

pub use builtins::Builtin;
pub use env::Scope;
pub use equal::deep_equal;
pub use inspect::inspect;
pub use interp::{with_eval_stack, Interpreter, RuntimeError, EVAL_STACK_SIZE, MAX_CALL_DEPTH};
pub use json::from_json;
pub use promise::{Promise, PromiseState, Reaction};
pub use value::{format_number, Closure, ErrorObject, Value};
