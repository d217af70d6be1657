// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Built-in globals and methods.
//!
//! Every built-in function is a [`Builtin`] variant wrapped in
//! `Value::Native`. Methods read off a value (`[1, 2].map`) are bound to
//! their receiver as [`Builtin::Method`].

pub(crate) mod array;
mod errors;
mod math;
pub(crate) mod number;
mod object;
pub(crate) mod promise;
pub(crate) mod string;

use indexmap::IndexMap;

use crate::env::Environment;
use crate::interp::{Interpreter, RuntimeError};
use crate::promise::Promise;
use crate::value::Value;

/// A built-in function.
#[derive(Debug)]
pub enum Builtin {
    /// `Error`, `TypeError`, ... (callable with or without `new`)
    ErrorCtor(&'static str),
    Promise,
    PromiseResolve,
    PromiseReject,
    PromiseAll,
    /// A resolving function handed to a `new Promise` executor.
    Resolver { promise: Promise, rejects: bool },
    Object,
    ObjectKeys,
    ObjectValues,
    ObjectEntries,
    Array,
    ArrayIsArray,
    String,
    Number,
    Boolean,
    Math(&'static str),
    JsonStringify,
    JsonParse,
    /// A method bound to the value it was read from.
    Method { receiver: Value, name: &'static str },
}

const ERROR_CONSTRUCTORS: &[&str] = &["Error", "TypeError", "RangeError", "ReferenceError", "SyntaxError"];

/// Seed the global frame.
pub(crate) fn install_globals(env: &Environment) {
    for &name in ERROR_CONSTRUCTORS {
        env.define(name, Value::native(Builtin::ErrorCtor(name)), true);
    }
    env.define("Promise", Value::native(Builtin::Promise), true);
    env.define("Object", Value::native(Builtin::Object), true);
    env.define("Array", Value::native(Builtin::Array), true);
    env.define("String", Value::native(Builtin::String), true);
    env.define("Number", Value::native(Builtin::Number), true);
    env.define("Boolean", Value::native(Builtin::Boolean), true);
    env.define("Math", math::namespace(), true);

    let mut json = IndexMap::new();
    json.insert("stringify".to_string(), Value::native(Builtin::JsonStringify));
    json.insert("parse".to_string(), Value::native(Builtin::JsonParse));
    env.define("JSON", Value::object(json), true);

    env.define("NaN", Value::Number(f64::NAN), false);
    env.define("Infinity", Value::Number(f64::INFINITY), false);
}

impl Builtin {
    /// The function's `name`.
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::ErrorCtor(name) | Builtin::Math(name) => *name,
            Builtin::Method { name, .. } => *name,
            Builtin::Promise => "Promise",
            Builtin::PromiseResolve => "resolve",
            Builtin::PromiseReject => "reject",
            Builtin::PromiseAll => "all",
            Builtin::Resolver { .. } => "",
            Builtin::Object => "Object",
            Builtin::ObjectKeys => "keys",
            Builtin::ObjectValues => "values",
            Builtin::ObjectEntries => "entries",
            Builtin::Array => "Array",
            Builtin::ArrayIsArray => "isArray",
            Builtin::String => "String",
            Builtin::Number => "Number",
            Builtin::Boolean => "Boolean",
            Builtin::JsonStringify => "stringify",
            Builtin::JsonParse => "parse",
        }
    }

    /// Static members of constructor namespaces (`Promise.resolve`, ...).
    pub(crate) fn static_member(&self, key: &str) -> Option<Value> {
        let member = match (self, key) {
            (Builtin::Promise, "resolve") => Builtin::PromiseResolve,
            (Builtin::Promise, "reject") => Builtin::PromiseReject,
            (Builtin::Promise, "all") => Builtin::PromiseAll,
            (Builtin::Object, "keys") => Builtin::ObjectKeys,
            (Builtin::Object, "values") => Builtin::ObjectValues,
            (Builtin::Object, "entries") => Builtin::ObjectEntries,
            (Builtin::Array, "isArray") => Builtin::ArrayIsArray,
            _ => return None,
        };
        Some(Value::native(member))
    }
}

impl Interpreter {
    pub(crate) fn call_builtin(&mut self, builtin: &Builtin, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let arg = |i: usize| args.get(i).cloned().unwrap_or(Value::Undefined);
        match builtin {
            Builtin::ErrorCtor(name) => Ok(errors::construct(name, &args)),
            Builtin::Promise => Err(RuntimeError::type_error(
                "Promise constructor cannot be invoked without 'new'",
            )),
            Builtin::PromiseResolve => Ok(promise::resolve(arg(0))),
            Builtin::PromiseReject => Ok(Value::Promise(Promise::rejected(arg(0)))),
            Builtin::PromiseAll => Ok(promise::all(&arg(0))),
            Builtin::Resolver { promise, rejects } => {
                let value = arg(0);
                promise.resolve_with(if *rejects { Err(value) } else { Ok(value) });
                Ok(Value::Undefined)
            }
            Builtin::Object => {
                let value = arg(0);
                Ok(if value.is_nullish() { Value::object(IndexMap::new()) } else { value })
            }
            Builtin::ObjectKeys => object::keys(&arg(0)),
            Builtin::ObjectValues => object::values(&arg(0)),
            Builtin::ObjectEntries => object::entries(&arg(0)),
            Builtin::Array => array::construct(&args),
            Builtin::ArrayIsArray => Ok(Value::Bool(matches!(arg(0), Value::Array(_)))),
            Builtin::String => Ok(match args.first() {
                Some(value) => Value::from(value.to_js_string()),
                None => Value::string(""),
            }),
            Builtin::Number => Ok(Value::Number(args.first().map_or(0.0, Value::to_number))),
            Builtin::Boolean => Ok(Value::Bool(arg(0).is_truthy())),
            Builtin::Math(name) => Ok(math::call(name, &args)),
            Builtin::JsonStringify => {
                let indent = match arg(2) {
                    Value::Number(n) if n >= 1.0 => " ".repeat(n.min(10.0) as usize),
                    Value::String(s) => s.chars().take(10).collect(),
                    _ => String::new(),
                };
                Ok(crate::json::stringify(&arg(0), &indent)?
                    .map(Value::from)
                    .unwrap_or(Value::Undefined))
            }
            Builtin::JsonParse => crate::json::parse(&arg(0).to_js_string())
                .map_err(RuntimeError::syntax_error),
            Builtin::Method { receiver, name } => self.call_method(receiver, name, args),
        }
    }

    pub(crate) fn construct_builtin(&mut self, builtin: &Builtin, args: Vec<Value>) -> Result<Value, RuntimeError> {
        match builtin {
            Builtin::Promise => promise::construct(self, args),
            other => self.call_builtin(other, args),
        }
    }

    fn call_method(&mut self, receiver: &Value, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        match receiver {
            Value::Array(items) => array::call(self, items, name, args),
            Value::String(s) => string::call(s, name, &args),
            Value::Number(n) => number::call(*n, name, &args),
            Value::Promise(p) => Ok(promise::call(p, name, &args)),
            other => Err(RuntimeError::type_error(format!(
                "{} is not a function",
                name_of_method(other, name)
            ))),
        }
    }
}

fn name_of_method(receiver: &Value, name: &str) -> String {
    format!("{}.{}", receiver.type_of(), name)
}

/// Bind `key` to `receiver` if it is one of `methods`.
pub(crate) fn bind_method(receiver: &Value, key: &str, methods: &[&'static str]) -> Option<Value> {
    methods
        .iter()
        .find(|m| **m == key)
        .map(|&name| Value::native(Builtin::Method { receiver: receiver.clone(), name }))
}
