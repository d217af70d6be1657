// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Conversion between runtime values and JSON.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Number as JsonNumber, Value as Json};

use crate::interp::RuntimeError;
use crate::value::Value;

/// Largest integer an f64 holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Build a runtime value from parsed JSON.
pub fn from_json(json: &Json) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        Json::String(s) => Value::string(s),
        Json::Array(items) => Value::array(items.iter().map(from_json).collect()),
        Json::Object(map) => Value::object(
            map.iter()
                .map(|(k, v)| (k.clone(), from_json(v)))
                .collect::<IndexMap<_, _>>(),
        ),
    }
}

struct Circular;

/// `None` for values JSON cannot represent (`undefined`, functions).
fn convert(value: &Value, stack: &mut Vec<usize>) -> Result<Option<Json>, Circular> {
    let json = match value {
        Value::Undefined | Value::Function(_) | Value::Native(_) => return Ok(None),
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Number(n) => number(*n),
        Value::String(s) => Json::String(s.to_string()),
        Value::Array(items) => {
            let addr = std::rc::Rc::as_ptr(items) as *const () as usize;
            enter(stack, addr)?;
            let mut out = Vec::new();
            for item in items.borrow().iter() {
                out.push(convert(item, stack)?.unwrap_or(Json::Null));
            }
            stack.pop();
            Json::Array(out)
        }
        Value::Object(map) => {
            let addr = std::rc::Rc::as_ptr(map) as *const () as usize;
            enter(stack, addr)?;
            let out = convert_entries(map.borrow().iter(), stack)?;
            stack.pop();
            Json::Object(out)
        }
        // Only extra properties are enumerable on errors
        Value::Error(err) => Json::Object(convert_entries(err.borrow().props.iter(), stack)?),
        Value::Promise(_) => Json::Object(Map::new()),
    };
    Ok(Some(json))
}

fn convert_entries<'a>(
    entries: impl Iterator<Item = (&'a String, &'a Value)>,
    stack: &mut Vec<usize>,
) -> Result<Map<String, Json>, Circular> {
    let mut out = Map::new();
    for (key, value) in entries {
        if let Some(json) = convert(value, stack)? {
            out.insert(key.clone(), json);
        }
    }
    Ok(out)
}

fn enter(stack: &mut Vec<usize>, addr: usize) -> Result<(), Circular> {
    if stack.contains(&addr) {
        return Err(Circular);
    }
    stack.push(addr);
    Ok(())
}

fn number(n: f64) -> Json {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Json::Number(JsonNumber::from(n as i64))
    } else {
        JsonNumber::from_f64(n).map(Json::Number).unwrap_or(Json::Null)
    }
}

/// `JSON.stringify(value, null, indent)`
pub(crate) fn stringify(value: &Value, indent: &str) -> Result<Option<String>, RuntimeError> {
    let json = match convert(value, &mut Vec::new()) {
        Ok(Some(json)) => json,
        Ok(None) => return Ok(None),
        Err(Circular) => return Err(RuntimeError::type_error("Converting circular structure to JSON")),
    };
    if indent.is_empty() {
        return Ok(Some(json.to_string()));
    }
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    json.serialize(&mut serializer)
        .map_err(|err| RuntimeError::type_error(err.to_string()))?;
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// `JSON.parse(text)`
pub(crate) fn parse(text: &str) -> Result<Value, String> {
    serde_json::from_str::<Json>(text)
        .map(|json| from_json(&json))
        .map_err(|_| format!("\"{}\" is not valid JSON", text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stringify_keeps_key_order_and_integers() {
        let value = from_json(&serde_json::json!({ "b": 1, "a": [1.5, null, "x"] }));
        assert_eq!(stringify(&value, "").unwrap().unwrap(), r#"{"b":1,"a":[1.5,null,"x"]}"#);
    }

    #[test]
    fn stringify_skips_unrepresentable_values() {
        let value = crate::Interpreter::new()
            .eval_source("({ f: () => 1, u: undefined, n: NaN, list: [undefined] })", &crate::Scope::new())
            .unwrap();
        assert_eq!(stringify(&value, "").unwrap().unwrap(), r#"{"n":null,"list":[null]}"#);
        assert!(stringify(&Value::Undefined, "").unwrap().is_none());
    }

    #[test]
    fn stringify_with_indent() {
        let value = from_json(&serde_json::json!({ "a": 1 }));
        assert_eq!(stringify(&value, "  ").unwrap().unwrap(), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn circular_structures_are_rejected() {
        let value = crate::Interpreter::new()
            .eval_source("const o = {}; o.self = o; o", &crate::Scope::new())
            .unwrap();
        assert!(stringify(&value, "").is_err());
    }

    #[test]
    fn parse_errors_mention_the_input() {
        assert_eq!(parse("nope").unwrap_err(), "\"nope\" is not valid JSON");
    }
}
