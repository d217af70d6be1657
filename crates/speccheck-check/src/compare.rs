// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Actual and expected values for each output form.

use crate::error::CheckError;
use crate::evaluator::{Evaluator, Settled};
use crate::statement::Statement;

/// The pair an output statement compares.
pub(crate) struct Comparison<V> {
    pub actual: V,
    pub expected: V,
}

/// Compute `(actual, expected)` for `statement` given the current result.
///
/// Only the settling forms await `current`. Any raise while computing
/// either side becomes an eval error naming the statement's payload.
pub(crate) fn comparison<E: Evaluator>(
    evaluator: &mut E,
    scope: &mut E::Scope,
    statement: &Statement,
    current: &E::Value,
) -> Result<Comparison<E::Value>, CheckError> {
    let payload = statement.payload();
    let eval_error = |evaluator: &E, raised: &E::Value| CheckError::Eval {
        code: payload.to_string(),
        message: evaluator.error_message(raised),
    };

    let (actual, expected) = match statement {
        Statement::Input(_) => return Err(CheckError::parse("input is not an expected output")),
        Statement::Output(code) => {
            let expected = evaluator.evaluate(code, scope).map_err(|e| eval_error(evaluator, &e))?;
            (current.clone(), expected)
        }
        Statement::Resolve(code) | Statement::Reject(code) => {
            let actual = match evaluator.settle(current, scope) {
                Settled::Fulfilled(v) => evaluator.record("Resolve", v),
                Settled::Rejected(e) => evaluator.record("Reject", e),
            };
            let value = evaluator.evaluate(code, scope).map_err(|e| eval_error(evaluator, &e))?;
            let tag = if matches!(statement, Statement::Resolve(_)) { "Resolve" } else { "Reject" };
            (actual, evaluator.record(tag, value))
        }
        Statement::RejectError(message) => {
            rejection(evaluator, scope, current, "Reject error", "message", message, eval_error)?
        }
        Statement::RejectErrorCode(code) => {
            rejection(evaluator, scope, current, "Reject error code", "errorCode", code, eval_error)?
        }
        Statement::Error(message) => {
            let actual = described(evaluator, current, "Error", "message").map_err(|e| eval_error(evaluator, &e))?;
            (actual, labelled(evaluator, "Error", message))
        }
        Statement::ErrorCode(code) => {
            let actual = described(evaluator, current, "Error code", "code").map_err(|e| eval_error(evaluator, &e))?;
            (actual, labelled(evaluator, "Error code", code))
        }
    };

    Ok(Comparison { actual, expected })
}

/// Settle `current` and describe the rejection reason's `key`. A fulfilled
/// result becomes `{ Resolve: value }`, which never equals a label string.
fn rejection<E: Evaluator>(
    evaluator: &mut E,
    scope: &mut E::Scope,
    current: &E::Value,
    label: &str,
    key: &str,
    literal: &str,
    eval_error: impl Fn(&E, &E::Value) -> CheckError,
) -> Result<(E::Value, E::Value), CheckError> {
    let actual = match evaluator.settle(current, scope) {
        Settled::Fulfilled(v) => evaluator.record("Resolve", v),
        Settled::Rejected(reason) => {
            described(evaluator, &reason, label, key).map_err(|e| eval_error(evaluator, &e))?
        }
    };
    Ok((actual, labelled(evaluator, label, literal)))
}

/// `"<label>: <value[key]>"`
fn described<E: Evaluator>(
    evaluator: &mut E,
    value: &E::Value,
    label: &str,
    key: &str,
) -> Result<E::Value, E::Value> {
    let prop = evaluator.property(value, key)?;
    let text = format!("{}: {}", label, evaluator.to_display(&prop));
    Ok(evaluator.string(&text))
}

fn labelled<E: Evaluator>(evaluator: &mut E, label: &str, literal: &str) -> E::Value {
    evaluator.string(&format!("{}: {}", label, literal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use speccheck_interp::{Interpreter, Scope, Value};

    fn setup() -> (Interpreter, Scope) {
        let mut interp = Interpreter::new();
        let scope = Evaluator::new_scope(&mut interp);
        (interp, scope)
    }

    fn run(statement: Statement, input: &str) -> Result<(String, String), CheckError> {
        let (mut interp, mut scope) = setup();
        let current = match interp.evaluate(input, &mut scope) {
            Ok(v) | Err(v) => v,
        };
        let c = comparison(&mut interp, &mut scope, &statement, &current)?;
        Ok((interp.inspect(&c.actual), interp.inspect(&c.expected)))
    }

    #[test]
    fn output_uses_result_as_is() {
        let (actual, expected) = run(Statement::Output("1 + 1".into()), "2").unwrap();
        assert_eq!(actual, "2");
        assert_eq!(expected, "2");
    }

    #[test]
    fn output_does_not_await() {
        let (actual, _) = run(Statement::Output("42".into()), "Promise.resolve(42)").unwrap();
        assert_eq!(actual, "Promise { 42 }");
    }

    #[test]
    fn resolve_and_reject_wrap() {
        let (actual, expected) = run(Statement::Resolve("42".into()), "Promise.resolve(42)").unwrap();
        assert_eq!(actual, "{ Resolve: 42 }");
        assert_eq!(expected, "{ Resolve: 42 }");

        let (actual, expected) = run(Statement::Reject("'no'".into()), "Promise.reject('no')").unwrap();
        assert_eq!(actual, "{ Reject: 'no' }");
        assert_eq!(expected, "{ Reject: 'no' }");

        let (actual, expected) = run(Statement::Resolve("1".into()), "Promise.reject(1)").unwrap();
        assert_eq!(actual, "{ Reject: 1 }");
        assert_eq!(expected, "{ Resolve: 1 }");
    }

    #[test]
    fn reject_error_forms() {
        let (actual, expected) =
            run(Statement::RejectError("boom".into()), "Promise.reject(new Error('boom'))").unwrap();
        assert_eq!(actual, "'Reject error: boom'");
        assert_eq!(expected, "'Reject error: boom'");

        let (actual, _) = run(
            Statement::RejectErrorCode("E_X".into()),
            "Promise.reject(new Error('x', { errorCode: 'E_X' }))",
        )
        .unwrap();
        assert_eq!(actual, "'Reject error code: E_X'");
    }

    #[test]
    fn reject_error_on_fulfilled_promise() {
        let (actual, expected) = run(Statement::RejectError("boom".into()), "Promise.resolve(1)").unwrap();
        assert_eq!(actual, "{ Resolve: 1 }");
        assert_eq!(expected, "'Reject error: boom'");
    }

    #[test]
    fn sync_error_forms() {
        let (actual, _) = run(Statement::Error("bad".into()), "throw new TypeError('bad')").unwrap();
        assert_eq!(actual, "'Error: bad'");

        let (actual, expected) =
            run(Statement::ErrorCode("E1".into()), "throw new Error('x', { code: 'E1' })").unwrap();
        assert_eq!(actual, "'Error code: E1'");
        assert_eq!(expected, "'Error code: E1'");
    }

    #[test]
    fn error_form_on_a_plain_value() {
        let (actual, _) = run(Statement::Error("bad".into()), "42").unwrap();
        assert_eq!(actual, "'Error: undefined'");

        let err = run(Statement::Error("bad".into()), "undefined").unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to eval output `bad`: Cannot read properties of undefined (reading 'message')"
        );
    }

    #[test]
    fn expected_side_raising() {
        let err = run(Statement::Output("nope".into()), "1").unwrap_err();
        assert_eq!(err, CheckError::Eval { code: "nope".into(), message: "nope is not defined".into() });
    }

    #[test]
    fn records_compare_structurally() {
        let (mut interp, _) = setup();
        let a = interp.record("Resolve", Value::from("x"));
        let b = interp.record("Resolve", Value::from("x"));
        assert!(interp.deep_equal(&a, &b));
    }
}
