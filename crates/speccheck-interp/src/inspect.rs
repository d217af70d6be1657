// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Single-line, Node-style rendering of values for diagnostics.

use std::rc::Rc;

use crate::promise::PromiseState;
use crate::value::{format_number, Value};

/// Render a value the way Node's `util.inspect` does, on one line.
///
/// ```text
/// 'str'   [ 1, 2 ]   { a: 1 }   [Error: boom] { code: 'E' }   Promise { 42 }
/// ```
pub fn inspect(value: &Value) -> String {
    let mut out = String::new();
    Inspector::default().write(value, &mut out);
    out
}

#[derive(Default)]
struct Inspector {
    /// Addresses of the containers currently being written.
    stack: Vec<usize>,
}

impl Inspector {
    fn write(&mut self, value: &Value, out: &mut String) {
        match value {
            Value::Undefined => out.push_str("undefined"),
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) if *n == 0.0 && n.is_sign_negative() => out.push_str("-0"),
            Value::Number(n) => out.push_str(&format_number(*n)),
            Value::String(s) => out.push_str(&quote(s)),

            Value::Array(items) => {
                let addr = Rc::as_ptr(items) as *const () as usize;
                if self.enter(addr, out) {
                    let items = items.borrow();
                    if items.is_empty() {
                        out.push_str("[]");
                    } else {
                        out.push_str("[ ");
                        for (i, item) in items.iter().enumerate() {
                            if i > 0 {
                                out.push_str(", ");
                            }
                            self.write(item, out);
                        }
                        out.push_str(" ]");
                    }
                    self.stack.pop();
                }
            }

            Value::Object(map) => {
                let addr = Rc::as_ptr(map) as *const () as usize;
                if self.enter(addr, out) {
                    let map = map.borrow();
                    self.write_props(map.iter(), out);
                    if map.is_empty() {
                        out.push_str("{}");
                    }
                    self.stack.pop();
                }
            }

            Value::Error(err) => {
                let addr = Rc::as_ptr(err) as *const () as usize;
                if self.enter(addr, out) {
                    let err = err.borrow();
                    out.push('[');
                    out.push_str(&err.name);
                    if !err.message.is_empty() {
                        out.push_str(": ");
                        out.push_str(&err.message);
                    }
                    out.push(']');
                    if !err.props.is_empty() {
                        out.push(' ');
                        self.write_props(err.props.iter(), out);
                    }
                    self.stack.pop();
                }
            }

            Value::Function(closure) => match closure.name.as_deref() {
                Some(name) if !name.is_empty() => out.push_str(&format!("[Function: {}]", name)),
                _ => out.push_str("[Function (anonymous)]"),
            },
            Value::Native(builtin) => match builtin.name() {
                "" => out.push_str("[Function (anonymous)]"),
                name => out.push_str(&format!("[Function: {}]", name)),
            },

            Value::Promise(promise) => {
                let addr = promise.addr();
                if self.enter(addr, out) {
                    out.push_str("Promise { ");
                    promise.with_state_ref(|state| match state {
                        PromiseState::Pending(_) => out.push_str("<pending>"),
                        PromiseState::Fulfilled(v) => self.write(v, out),
                        PromiseState::Rejected(e) => {
                            out.push_str("<rejected> ");
                            self.write(e, out);
                        }
                    });
                    out.push_str(" }");
                    self.stack.pop();
                }
            }
        }
    }

    /// `{ key: value, ... }`; writes nothing for an empty set.
    fn write_props<'a>(&mut self, props: impl Iterator<Item = (&'a String, &'a Value)>, out: &mut String) {
        let mut first = true;
        for (key, value) in props {
            out.push_str(if first { "{ " } else { ", " });
            first = false;
            if is_identifier(key) {
                out.push_str(key);
            } else {
                out.push_str(&quote(key));
            }
            out.push_str(": ");
            self.write(value, out);
        }
        if !first {
            out.push_str(" }");
        }
    }

    /// Push a container; on a cycle write the marker and return false.
    fn enter(&mut self, addr: usize, out: &mut String) -> bool {
        if self.stack.contains(&addr) {
            out.push_str("[Circular]");
            return false;
        }
        self.stack.push(addr);
        true
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Quote a string, preferring single quotes, then double, then backticks.
fn quote(s: &str) -> String {
    let delim = if !s.contains('\'') {
        '\''
    } else if !s.contains('"') {
        '"'
    } else if !s.contains('`') {
        '`'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(delim);
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}
