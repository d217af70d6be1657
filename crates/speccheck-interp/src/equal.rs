// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Structural equality.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::interp::operators::{loose_equals, same_reference};
use crate::value::Value;

/// Deep structural equality.
///
/// Primitives compare with `==`, so `'2'` equals `2` and `null` equals
/// `undefined`, and `NaN` is equal to itself. A primitive never equals an
/// array, object or error. Arrays compare element-wise; objects compare by key
/// set (order-insensitive) and values; errors compare name, message and
/// extra properties. Functions and promises compare by identity.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    Comparison::default().equal(a, b)
}

#[derive(Default)]
struct Comparison {
    /// Container pairs under comparison; meeting one again is assumed equal.
    pairs: Vec<(usize, usize)>,
}

impl Comparison {
    fn equal(&mut self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) if x.is_nan() && y.is_nan() => true,
            (a, b) if a.is_primitive() && b.is_primitive() => loose_equals(a, b),

            (Value::Array(x), Value::Array(y)) => {
                if Rc::ptr_eq(x, y) {
                    return true;
                }
                self.nested(addr(x), addr(y), |cmp| {
                    let (x, y) = (x.borrow(), y.borrow());
                    x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| cmp.equal(a, b))
                })
            }

            (Value::Object(x), Value::Object(y)) => {
                if Rc::ptr_eq(x, y) {
                    return true;
                }
                self.nested(addr(x), addr(y), |cmp| cmp.props_equal(&x.borrow(), &y.borrow()))
            }

            (Value::Error(x), Value::Error(y)) => {
                if Rc::ptr_eq(x, y) {
                    return true;
                }
                self.nested(addr(x), addr(y), |cmp| {
                    let (x, y) = (x.borrow(), y.borrow());
                    x.name == y.name && x.message == y.message && cmp.props_equal(&x.props, &y.props)
                })
            }

            _ => same_reference(a, b),
        }
    }

    fn props_equal(&mut self, x: &IndexMap<String, Value>, y: &IndexMap<String, Value>) -> bool {
        x.len() == y.len()
            && x.iter().all(|(key, a)| match y.get(key) {
                Some(b) => self.equal(a, b),
                None => false,
            })
    }

    fn nested(&mut self, a: usize, b: usize, compare: impl FnOnce(&mut Self) -> bool) -> bool {
        if self.pairs.contains(&(a, b)) {
            return true;
        }
        self.pairs.push((a, b));
        let equal = compare(self);
        self.pairs.pop();
        equal
    }
}

fn addr<T>(rc: &Rc<T>) -> usize {
    Rc::as_ptr(rc) as *const () as usize
}
