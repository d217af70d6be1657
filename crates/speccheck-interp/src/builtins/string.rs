// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! String methods. Indices count chars.

use crate::interp::RuntimeError;
use crate::value::{format_number, Value};

use super::array::relative_index;

/// Longest string `repeat` will build.
const MAX_STRING_LENGTH: f64 = ((1 << 29) - 24) as f64;

const METHODS: &[&str] = &[
    "toUpperCase",
    "toLowerCase",
    "trim",
    "trimStart",
    "trimEnd",
    "split",
    "includes",
    "startsWith",
    "endsWith",
    "slice",
    "indexOf",
    "charAt",
    "repeat",
];

pub(crate) fn method(receiver: &Value, key: &str) -> Option<Value> {
    super::bind_method(receiver, key, METHODS)
}

pub(super) fn call(s: &str, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    let text_arg = |i: usize| args.get(i).map(Value::to_js_string).unwrap_or_else(|| "undefined".to_string());
    Ok(match name {
        "toUpperCase" => Value::from(s.to_uppercase()),
        "toLowerCase" => Value::from(s.to_lowercase()),
        "trim" => Value::from(s.trim()),
        "trimStart" => Value::from(s.trim_start()),
        "trimEnd" => Value::from(s.trim_end()),
        "split" => split(s, args.first()),
        "includes" => Value::Bool(s.contains(text_arg(0).as_str())),
        "startsWith" => Value::Bool(s.starts_with(text_arg(0).as_str())),
        "endsWith" => Value::Bool(s.ends_with(text_arg(0).as_str())),
        "slice" => {
            let chars: Vec<char> = s.chars().collect();
            let start = relative_index(args.first(), chars.len(), 0);
            let end = relative_index(args.get(1), chars.len(), chars.len());
            Value::from(chars.get(start..end.max(start)).unwrap_or_default().iter().collect::<String>())
        }
        "indexOf" => {
            let needle = text_arg(0);
            match s.find(needle.as_str()) {
                Some(pos) => Value::Number(s[..pos].chars().count() as f64),
                None => Value::Number(-1.0),
            }
        }
        "charAt" => {
            let index = args.first().map_or(0.0, Value::to_number);
            let c = if index >= 0.0 { s.chars().nth(index as usize) } else { None };
            Value::from(c.map(String::from).unwrap_or_default())
        }
        "repeat" => {
            let count = args.first().map_or(0.0, Value::to_number);
            let count = if count.is_nan() { 0.0 } else { count };
            if count < 0.0 || count.is_infinite() {
                return Err(RuntimeError::range_error(format!(
                    "Invalid count value: {}",
                    format_number(count)
                )));
            }
            if s.chars().count() as f64 * count.trunc() > MAX_STRING_LENGTH {
                return Err(RuntimeError::range_error("Invalid string length"));
            }
            Value::from(s.repeat(count as usize))
        }
        _ => Value::Undefined,
    })
}

fn split(s: &str, separator: Option<&Value>) -> Value {
    let parts: Vec<Value> = match separator {
        None | Some(Value::Undefined) => vec![Value::from(s)],
        Some(sep) => {
            let sep = sep.to_js_string();
            if sep.is_empty() {
                s.chars().map(|c| Value::from(c.to_string())).collect()
            } else {
                s.split(sep.as_str()).map(Value::from).collect()
            }
        }
    };
    Value::array(parts)
}
