// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Array methods.

use std::cell::RefCell;
use std::rc::Rc;

use crate::interp::operators::{same_value_zero, strict_equals};
use crate::interp::{Interpreter, RuntimeError};
use crate::value::Value;

const METHODS: &[&str] = &[
    "push", "pop", "map", "filter", "reduce", "forEach", "find", "some", "every", "join", "includes",
    "indexOf", "slice", "concat", "reverse",
];

pub(crate) fn method(receiver: &Value, key: &str) -> Option<Value> {
    super::bind_method(receiver, key, METHODS)
}

/// Largest array length.
const MAX_ARRAY_LENGTH: f64 = 4_294_967_295.0;

/// `Array(n)` or `Array(a, b, ...)`
pub(super) fn construct(args: &[Value]) -> Result<Value, RuntimeError> {
    match args {
        [Value::Number(n)] => {
            let mut items = Vec::new();
            resize(&mut items, *n)?;
            Ok(Value::array(items))
        }
        _ => Ok(Value::array(args.to_vec())),
    }
}

/// Set the length of `items`, filling new slots with `undefined`.
pub(crate) fn resize(items: &mut Vec<Value>, len: f64) -> Result<(), RuntimeError> {
    if !(0.0..=MAX_ARRAY_LENGTH).contains(&len) || len.fract() != 0.0 {
        return Err(RuntimeError::range_error("Invalid array length"));
    }
    let len = len as usize;
    if len > items.len() && items.try_reserve_exact(len - items.len()).is_err() {
        return Err(RuntimeError::range_error("Array buffer allocation failed"));
    }
    items.resize(len, Value::Undefined);
    Ok(())
}

/// Resolve a possibly negative `slice` index against `len`.
pub(crate) fn relative_index(arg: Option<&Value>, len: usize, default: usize) -> usize {
    let n = match arg {
        None | Some(Value::Undefined) => return default,
        Some(v) => v.to_number(),
    };
    if n.is_nan() {
        return 0;
    }
    let n = n.trunc();
    if n < 0.0 {
        (len as f64 + n).max(0.0) as usize
    } else {
        n.min(len as f64) as usize
    }
}

pub(super) fn call(
    interp: &mut Interpreter,
    items: &Rc<RefCell<Vec<Value>>>,
    name: &str,
    args: Vec<Value>,
) -> Result<Value, RuntimeError> {
    let receiver = Value::Array(Rc::clone(items));
    // Callbacks may mutate the array, so iterate over a snapshot
    let snapshot = items.borrow().clone();
    let arg = |i: usize| args.get(i).cloned().unwrap_or(Value::Undefined);

    match name {
        "push" => {
            let mut items = items.borrow_mut();
            items.extend(args.iter().cloned());
            Ok(Value::Number(items.len() as f64))
        }
        "pop" => Ok(items.borrow_mut().pop().unwrap_or(Value::Undefined)),
        "map" => {
            let f = arg(0);
            let mut out = Vec::with_capacity(snapshot.len());
            for (i, item) in snapshot.into_iter().enumerate() {
                out.push(interp.call_callback(&f, vec![item, Value::Number(i as f64), receiver.clone()])?);
            }
            Ok(Value::array(out))
        }
        "filter" => {
            let f = arg(0);
            let mut out = Vec::new();
            for (i, item) in snapshot.into_iter().enumerate() {
                let keep = interp.call_callback(&f, vec![item.clone(), Value::Number(i as f64), receiver.clone()])?;
                if keep.is_truthy() {
                    out.push(item);
                }
            }
            Ok(Value::array(out))
        }
        "forEach" => {
            let f = arg(0);
            for (i, item) in snapshot.into_iter().enumerate() {
                interp.call_callback(&f, vec![item, Value::Number(i as f64), receiver.clone()])?;
            }
            Ok(Value::Undefined)
        }
        "find" | "some" | "every" => {
            let f = arg(0);
            for (i, item) in snapshot.into_iter().enumerate() {
                let hit = interp
                    .call_callback(&f, vec![item.clone(), Value::Number(i as f64), receiver.clone()])?
                    .is_truthy();
                match (name, hit) {
                    ("find", true) => return Ok(item),
                    ("some", true) => return Ok(Value::Bool(true)),
                    ("every", false) => return Ok(Value::Bool(false)),
                    _ => {}
                }
            }
            Ok(match name {
                "find" => Value::Undefined,
                "some" => Value::Bool(false),
                _ => Value::Bool(true),
            })
        }
        "reduce" => {
            let f = arg(0);
            let mut iter = snapshot.into_iter().enumerate();
            let mut acc = match args.get(1) {
                Some(init) => init.clone(),
                None => match iter.next() {
                    Some((_, first)) => first,
                    None => {
                        return Err(RuntimeError::type_error("Reduce of empty array with no initial value"));
                    }
                },
            };
            for (i, item) in iter {
                acc = interp.call_callback(&f, vec![acc, item, Value::Number(i as f64), receiver.clone()])?;
            }
            Ok(acc)
        }
        "join" => {
            let sep = match arg(0) {
                Value::Undefined => ",".to_string(),
                other => other.to_js_string(),
            };
            let parts: Vec<String> = snapshot
                .iter()
                .map(|v| if v.is_nullish() { String::new() } else { v.to_js_string() })
                .collect();
            Ok(Value::from(parts.join(&sep)))
        }
        "includes" => {
            let needle = arg(0);
            let from = relative_index(args.get(1), snapshot.len(), 0);
            Ok(Value::Bool(snapshot[from..].iter().any(|v| same_value_zero(v, &needle))))
        }
        "indexOf" => {
            let needle = arg(0);
            let from = relative_index(args.get(1), snapshot.len(), 0);
            let pos = snapshot[from..].iter().position(|v| strict_equals(v, &needle));
            Ok(Value::Number(pos.map_or(-1.0, |p| (from + p) as f64)))
        }
        "slice" => {
            let start = relative_index(args.first(), snapshot.len(), 0);
            let end = relative_index(args.get(1), snapshot.len(), snapshot.len());
            Ok(Value::array(snapshot.get(start..end.max(start)).unwrap_or_default().to_vec()))
        }
        "concat" => {
            let mut out = snapshot;
            for arg in args {
                match arg {
                    Value::Array(more) => out.extend(more.borrow().iter().cloned()),
                    other => out.push(other),
                }
            }
            Ok(Value::array(out))
        }
        "reverse" => {
            items.borrow_mut().reverse();
            Ok(receiver)
        }
        _ => Ok(Value::Undefined),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length(v: Value) -> usize {
        match v {
            Value::Array(items) => items.borrow().len(),
            other => panic!("expected array, got {:?}", other),
        }
    }

    #[test]
    fn array_length_argument() {
        assert_eq!(length(construct(&[Value::Number(3.0)]).unwrap()), 3);
        assert_eq!(length(construct(&[Value::Number(0.0)]).unwrap()), 0);
        for bad in [-1.0, 1.5, f64::NAN, f64::INFINITY, 2f64.powi(32), 2f64.powi(62)] {
            let err = construct(&[Value::Number(bad)]).unwrap_err();
            assert_eq!(err.to_string(), "RangeError: Invalid array length", "Array({})", bad);
        }
    }

    #[test]
    fn resize_shrinks_and_grows() {
        let mut items = vec![Value::Number(1.0), Value::Number(2.0)];
        resize(&mut items, 1.0).unwrap();
        assert_eq!(items.len(), 1);
        resize(&mut items, 3.0).unwrap();
        assert!(matches!(items[2], Value::Undefined));
    }
}
