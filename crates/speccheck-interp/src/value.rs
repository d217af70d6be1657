// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Runtime values.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use speccheck_ast::expr::ArrowFn;

use crate::builtins::Builtin;
use crate::env::Environment;
use crate::promise::Promise;

/// A runtime value in the interpreter.
///
/// Composite values share their storage: cloning a `Value` clones the
/// handle, not the contents.
#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    /// Every number is an f64
    Number(f64),
    String(Rc<str>),
    Array(Rc<RefCell<Vec<Value>>>),
    /// Plain object with insertion-ordered keys
    Object(Rc<RefCell<IndexMap<String, Value>>>),
    Error(Rc<RefCell<ErrorObject>>),
    /// User-defined arrow function
    Function(Rc<Closure>),
    /// Built-in function or bound method
    Native(Rc<Builtin>),
    Promise(Promise),
}

/// An error object: `name`, `message` and any extra properties.
#[derive(Debug, Clone)]
pub struct ErrorObject {
    pub name: String,
    pub message: String,
    pub props: IndexMap<String, Value>,
}

/// An arrow function together with the environment it closes over.
pub struct Closure {
    /// Name inferred from the declaration it was bound by, if any.
    pub name: Option<String>,
    pub func: Rc<ArrowFn>,
    pub(crate) env: Environment,
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("name", &self.name)
            .field("params", &self.func.params)
            .finish_non_exhaustive()
    }
}

impl Value {
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Rc::from(s.as_ref()))
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn object(props: IndexMap<String, Value>) -> Self {
        Value::Object(Rc::new(RefCell::new(props)))
    }

    /// Build an error object with the given constructor name.
    pub fn error(name: &str, message: impl Into<String>) -> Self {
        Value::Error(Rc::new(RefCell::new(ErrorObject {
            name: name.to_string(),
            message: message.into(),
            props: IndexMap::new(),
        })))
    }

    pub fn native(builtin: Builtin) -> Self {
        Value::Native(Rc::new(builtin))
    }

    /// Result of the `typeof` operator.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) | Value::Native(_) => "function",
            Value::Array(_) | Value::Object(_) | Value::Error(_) | Value::Promise(_) => "object",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_) | Value::Native(_))
    }

    /// Whether this is a primitive (not a reference) value.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Value::Undefined | Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
        )
    }

    /// Numeric conversion (`Number(x)`).
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => string_to_number(s),
            Value::Array(_) => string_to_number(&self.to_js_string()),
            _ => f64::NAN,
        }
    }

    /// String conversion (`String(x)`).
    pub fn to_js_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.to_string(),
            Value::Array(items) => items
                .borrow()
                .iter()
                .map(|v| if v.is_nullish() { String::new() } else { v.to_js_string() })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => "[object Object]".to_string(),
            Value::Error(err) => {
                let err = err.borrow();
                if err.message.is_empty() {
                    err.name.clone()
                } else {
                    format!("{}: {}", err.name, err.message)
                }
            }
            Value::Function(_) | Value::Native(_) => crate::inspect::inspect(self),
            Value::Promise(_) => "[object Promise]".to_string(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::inspect::inspect(self))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

/// Format a number the way `String(n)` does.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let abs = n.abs();
    if abs >= 1e21 || abs < 1e-6 {
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        };
    }
    format!("{}", n)
}

fn string_to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).map(|n| n as f64).unwrap_or(f64::NAN);
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    // Rust accepts spellings like "inf" and "nan" that are not numbers here
    if !s.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')) {
        return f64::NAN;
    }
    s.parse().unwrap_or(f64::NAN)
}
