// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error constructors.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::value::{ErrorObject, Value};

/// `new Error(message, options)`. Every property of `options` is copied
/// onto the error, so `new Error('x', { code: 'E1' }).code` is `'E1'`.
pub(super) fn construct(name: &str, args: &[Value]) -> Value {
    let message = match args.first() {
        None | Some(Value::Undefined) => String::new(),
        Some(value) => value.to_js_string(),
    };
    let mut props = IndexMap::new();
    if let Some(Value::Object(options)) = args.get(1) {
        for (key, value) in options.borrow().iter() {
            props.insert(key.clone(), value.clone());
        }
    }
    Value::Error(Rc::new(RefCell::new(ErrorObject {
        name: name.to_string(),
        message,
        props,
    })))
}
