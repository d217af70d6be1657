// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The `Math` namespace.

use indexmap::IndexMap;

use super::Builtin;
use crate::value::Value;

const FUNCTIONS: &[&str] = &["max", "min", "floor", "ceil", "round", "trunc", "abs", "sqrt", "pow"];

pub(super) fn namespace() -> Value {
    let mut props = IndexMap::new();
    props.insert("PI".to_string(), Value::Number(std::f64::consts::PI));
    props.insert("E".to_string(), Value::Number(std::f64::consts::E));
    for &name in FUNCTIONS {
        props.insert(name.to_string(), Value::native(Builtin::Math(name)));
    }
    Value::object(props)
}

pub(super) fn call(name: &str, args: &[Value]) -> Value {
    let num = |i: usize| args.get(i).map_or(f64::NAN, Value::to_number);
    let result = match name {
        "max" => fold(args, f64::NEG_INFINITY, f64::max),
        "min" => fold(args, f64::INFINITY, f64::min),
        "floor" => num(0).floor(),
        "ceil" => num(0).ceil(),
        // Halves round towards +Infinity
        "round" => (num(0) + 0.5).floor(),
        "trunc" => num(0).trunc(),
        "abs" => num(0).abs(),
        "sqrt" => num(0).sqrt(),
        "pow" if num(1).is_nan() => f64::NAN,
        "pow" => num(0).powf(num(1)),
        _ => f64::NAN,
    };
    Value::Number(result)
}

/// `Math.max`/`Math.min`: any NaN argument makes the result NaN.
fn fold(args: &[Value], init: f64, pick: fn(f64, f64) -> f64) -> f64 {
    let mut acc = init;
    for arg in args {
        let n = arg.to_number();
        if n.is_nan() {
            return f64::NAN;
        }
        acc = pick(acc, n);
    }
    acc
}
