// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Number methods.

use crate::interp::RuntimeError;
use crate::value::{format_number, Value};

const METHODS: &[&str] = &["toFixed", "toString"];

pub(crate) fn method(receiver: &Value, key: &str) -> Option<Value> {
    super::bind_method(receiver, key, METHODS)
}

pub(super) fn call(n: f64, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
    match name {
        "toFixed" => {
            let digits = args.first().map_or(0.0, Value::to_number);
            let digits = if digits.is_nan() { 0.0 } else { digits.trunc() };
            if !(0.0..=100.0).contains(&digits) {
                return Err(RuntimeError::range_error(
                    "toFixed() digits argument must be between 0 and 100",
                ));
            }
            if !n.is_finite() {
                return Ok(Value::from(format_number(n)));
            }
            Ok(Value::from(format!("{:.*}", digits as usize, n)))
        }
        _ => Ok(Value::from(format_number(n))),
    }
}
