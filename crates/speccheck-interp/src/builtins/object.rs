// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `Object.keys`, `Object.values` and `Object.entries`.

use crate::interp::RuntimeError;
use crate::value::Value;

/// Own enumerable properties in order.
fn own_entries(target: &Value) -> Result<Vec<(String, Value)>, RuntimeError> {
    Ok(match target {
        Value::Undefined | Value::Null => {
            return Err(RuntimeError::type_error("Cannot convert undefined or null to object"));
        }
        Value::Object(map) => map.borrow().iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        Value::Array(items) => items
            .borrow()
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v.clone()))
            .collect(),
        Value::String(s) => s
            .chars()
            .enumerate()
            .map(|(i, c)| (i.to_string(), Value::from(c.to_string())))
            .collect(),
        Value::Error(err) => err.borrow().props.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        _ => Vec::new(),
    })
}

pub(super) fn keys(target: &Value) -> Result<Value, RuntimeError> {
    let entries = own_entries(target)?;
    Ok(Value::array(entries.into_iter().map(|(k, _)| Value::from(k)).collect()))
}

pub(super) fn values(target: &Value) -> Result<Value, RuntimeError> {
    let entries = own_entries(target)?;
    Ok(Value::array(entries.into_iter().map(|(_, v)| v).collect()))
}

pub(super) fn entries(target: &Value) -> Result<Value, RuntimeError> {
    let entries = own_entries(target)?;
    Ok(Value::array(
        entries
            .into_iter()
            .map(|(k, v)| Value::array(vec![Value::from(k), v]))
            .collect(),
    ))
}
