// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Binary operators.

use std::cmp::Ordering;

use speccheck_ast::expr::BinOp;

use crate::value::Value;

pub(crate) fn binary(op: BinOp, left: &Value, right: &Value) -> Value {
    match op {
        BinOp::Add => add(left, right),
        BinOp::Sub => Value::Number(left.to_number() - right.to_number()),
        BinOp::Mul => Value::Number(left.to_number() * right.to_number()),
        BinOp::Div => Value::Number(left.to_number() / right.to_number()),
        BinOp::Rem => Value::Number(left.to_number() % right.to_number()),
        BinOp::Pow => Value::Number(pow(left.to_number(), right.to_number())),
        BinOp::StrictEq => Value::Bool(strict_equals(left, right)),
        BinOp::StrictNe => Value::Bool(!strict_equals(left, right)),
        BinOp::LooseEq => Value::Bool(loose_equals(left, right)),
        BinOp::LooseNe => Value::Bool(!loose_equals(left, right)),
        BinOp::Lt => Value::Bool(compare(left, right) == Some(Ordering::Less)),
        BinOp::Gt => Value::Bool(compare(left, right) == Some(Ordering::Greater)),
        BinOp::Le => Value::Bool(matches!(compare(left, right), Some(Ordering::Less | Ordering::Equal))),
        BinOp::Ge => Value::Bool(matches!(compare(left, right), Some(Ordering::Greater | Ordering::Equal))),
    }
}

/// `+` concatenates when either side is a string or a non-primitive.
fn add(left: &Value, right: &Value) -> Value {
    let concat = |v: &Value| matches!(v, Value::String(_)) || !v.is_primitive();
    if concat(left) || concat(right) {
        Value::from(format!("{}{}", left.to_js_string(), right.to_js_string()))
    } else {
        Value::Number(left.to_number() + right.to_number())
    }
}

fn pow(base: f64, exp: f64) -> f64 {
    // powf(1, NaN) is 1, but `1 ** NaN` is NaN
    if exp.is_nan() {
        f64::NAN
    } else {
        base.powf(exp)
    }
}

/// `===`
pub(crate) fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        _ => same_reference(left, right),
    }
}

/// `includes` equality: like `===` but NaN equals NaN.
pub(crate) fn same_value_zero(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) if a.is_nan() && b.is_nan() => true,
        _ => strict_equals(left, right),
    }
}

pub(crate) fn same_reference(left: &Value, right: &Value) -> bool {
    use std::rc::Rc;
    match (left, right) {
        (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
        (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
        (Value::Error(a), Value::Error(b)) => Rc::ptr_eq(a, b),
        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
        (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(a, b),
        (Value::Promise(a), Value::Promise(b)) => a.ptr_eq(b),
        _ => false,
    }
}

/// `==`
pub(crate) fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (l, r) if l.is_nullish() && r.is_nullish() => true,
        (l, r) if l.is_nullish() || r.is_nullish() => false,
        (Value::Bool(_), _) => loose_equals(&Value::Number(left.to_number()), right),
        (_, Value::Bool(_)) => loose_equals(left, &Value::Number(right.to_number())),
        (Value::Number(a), Value::String(_)) => *a == right.to_number(),
        (Value::String(_), Value::Number(b)) => left.to_number() == *b,
        (l, r) if l.is_primitive() && !r.is_primitive() => loose_equals(l, &Value::from(r.to_js_string())),
        (l, r) if !l.is_primitive() && r.is_primitive() => loose_equals(&Value::from(l.to_js_string()), r),
        _ => strict_equals(left, right),
    }
}

/// Relational comparison. `None` when either side converts to NaN.
fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    if let (Value::String(a), Value::String(b)) = (left, right) {
        return Some(a.cmp(b));
    }
    left.to_number().partial_cmp(&right.to_number())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    #[test]
    fn addition_concatenates_strings() {
        assert!(matches!(binary(BinOp::Add, &num(1.0), &num(2.0)), Value::Number(n) if n == 3.0));
        assert!(matches!(binary(BinOp::Add, &Value::from("a"), &num(1.0)), Value::String(s) if &*s == "a1"));
        let arr = Value::array(vec![num(1.0), num(2.0)]);
        assert!(matches!(binary(BinOp::Add, &arr, &Value::from("!")), Value::String(s) if &*s == "1,2!"));
    }

    #[test]
    fn equality() {
        assert!(loose_equals(&Value::Null, &Value::Undefined));
        assert!(!strict_equals(&Value::Null, &Value::Undefined));
        assert!(loose_equals(&num(1.0), &Value::from("1")));
        assert!(loose_equals(&Value::Bool(true), &num(1.0)));
        assert!(!strict_equals(&num(f64::NAN), &num(f64::NAN)));
        assert!(same_value_zero(&num(f64::NAN), &num(f64::NAN)));

        let a = Value::array(vec![]);
        assert!(strict_equals(&a, &a.clone()));
        assert!(!strict_equals(&a, &Value::array(vec![])));
    }

    #[test]
    fn relational() {
        assert!(matches!(binary(BinOp::Lt, &num(1.0), &num(2.0)), Value::Bool(true)));
        assert!(matches!(binary(BinOp::Lt, &Value::from("b"), &Value::from("a")), Value::Bool(false)));
        assert!(matches!(binary(BinOp::Ge, &num(f64::NAN), &num(1.0)), Value::Bool(false)));
    }

    #[test]
    fn exponent_with_nan() {
        assert!(matches!(binary(BinOp::Pow, &num(1.0), &num(f64::NAN)), Value::Number(n) if n.is_nan()));
        assert!(matches!(binary(BinOp::Pow, &num(2.0), &num(10.0)), Value::Number(n) if n == 1024.0));
    }
}
