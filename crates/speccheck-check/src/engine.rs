// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Running blocks and documents.

use speccheck_doc::Document;
use tracing::{debug, trace};

use crate::annotate::marker_for;
use crate::assemble::parse_block;
use crate::compare::comparison;
use crate::config::CheckConfig;
use crate::error::CheckError;
use crate::evaluator::Evaluator;
use crate::report::{BlockResult, Report, Verdict};
use crate::statement::Statement;

/// Runs blocks in order against one scope that lives as long as the engine.
pub struct Engine<E: Evaluator> {
    evaluator: E,
    scope: E::Scope,
}

impl<E: Evaluator> Engine<E> {
    pub fn new(mut evaluator: E) -> Self {
        let scope = evaluator.new_scope();
        Engine { evaluator, scope }
    }

    /// Install a binding. Call before running any block.
    pub fn bind(&mut self, name: &str, value: E::Value) {
        debug!(name, "binding");
        self.evaluator.bind(&mut self.scope, name, value);
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Run one block's text.
    pub fn run_block(&mut self, code: &str) -> Verdict {
        self.try_block(code).into()
    }

    fn try_block(&mut self, code: &str) -> Result<(), CheckError> {
        let statements = parse_block(code)?;
        if !matches!(statements.first(), Some(Statement::Input(_))) {
            return Err(CheckError::parse("at least one input required"));
        }

        let mut input = "";
        let mut current: Option<E::Value> = None;

        for statement in &statements {
            if let Statement::Input(code) = statement {
                trace!(input = %code, "evaluating");
                input = code;
                // A raise is captured like any other result.
                current = Some(match self.evaluator.evaluate(code, &mut self.scope) {
                    Ok(value) | Err(value) => value,
                });
                continue;
            }

            let Some(result) = current.as_ref() else {
                return Err(CheckError::parse("at least one input required"));
            };
            trace!(kind = statement.kind_name(), payload = statement.payload(), "comparing");
            let compared = comparison(&mut self.evaluator, &mut self.scope, statement, result)?;
            if !self.evaluator.deep_equal(&compared.actual, &compared.expected) {
                return Err(CheckError::Assertion {
                    input: input.to_string(),
                    expected: self.evaluator.inspect(&compared.expected),
                    actual: self.evaluator.inspect(&compared.actual),
                });
            }
            current = Some(compared.actual);
        }

        Ok(())
    }

    /// Check every matching block of `doc` in document order and insert a
    /// marker after each. Returns the verdicts.
    pub fn check_document(&mut self, doc: &mut Document, config: &CheckConfig) -> Report {
        if config.strip_markers {
            let removed = doc.strip_markers();
            debug!(removed, "stripped existing markers");
        }

        let blocks: Vec<(usize, usize, String)> = doc
            .code_blocks()
            .filter(|(_, block)| config.is_checked(block.lang()))
            .map(|(index, block)| (index, block.line(), block.value()))
            .collect();

        let mut report = Report::default();
        let mut markers = Vec::with_capacity(blocks.len());
        for (index, line, code) in blocks {
            debug!(line, "checking block");
            let verdict = self.run_block(&code);
            match &verdict {
                Verdict::Pass => debug!(line, "passed"),
                Verdict::Fail(message) => debug!(line, %message, "failed"),
            }
            markers.push((index, marker_for(&verdict)));
            report.add(BlockResult { line, verdict });
        }

        // Back to front so earlier node indices stay valid.
        for (index, marker) in markers.into_iter().rev() {
            doc.insert_marker(index, marker);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use speccheck_interp::{Interpreter, Value};

    fn engine() -> Engine<Interpreter> {
        Engine::new(Interpreter::new())
    }

    fn fails_with(verdict: Verdict) -> String {
        match verdict {
            Verdict::Fail(message) => message,
            Verdict::Pass => panic!("expected failure"),
        }
    }

    #[test]
    fn simple_pass() {
        assert_eq!(engine().run_block("> 1 + 1\n2"), Verdict::Pass);
    }

    #[test]
    fn assertion_diagnostic() {
        let message = fails_with(engine().run_block("> 1 + 1\n3"));
        assert_eq!(message, "1 + 1 => expected 3, but got 2");
    }

    #[test]
    fn first_statement_must_be_input() {
        let mut engine = engine();
        let message = fails_with(engine.run_block("2\n> x = 1"));
        assert_eq!(message, "at least one input required");
        // Nothing ran
        assert_eq!(fails_with(engine.run_block("> typeof x\n'number'")), "typeof x => expected 'number', but got 'undefined'");
    }

    #[test]
    fn input_without_expectations() {
        assert_eq!(engine().run_block("> let a = 1"), Verdict::Pass);
    }

    #[test]
    fn several_inputs_in_one_block() {
        let verdict = engine().run_block("> let a = [1, 2]\n> a.push(3)\n3\n> a\n[1, 2, 3]");
        assert_eq!(verdict, Verdict::Pass);
    }

    #[test]
    fn later_statements_are_skipped_after_a_failure() {
        let mut engine = engine();
        let message = fails_with(engine.run_block("> 1\n2\n> let after = 1"));
        assert_eq!(message, "1 => expected 2, but got 1");
        assert_eq!(engine.run_block("> typeof after\n'undefined'"), Verdict::Pass);
    }

    #[test]
    fn promises() {
        let mut engine = engine();
        assert_eq!(engine.run_block("> Promise.resolve(42)\nResolve: 42"), Verdict::Pass);
        assert_eq!(engine.run_block("> Promise.reject(new Error('boom'))\nReject error: boom"), Verdict::Pass);
        assert_eq!(engine.run_block("> Promise.reject(7)\nReject: 7"), Verdict::Pass);
        let message = fails_with(engine.run_block("> Promise.resolve(1)\nReject error: boom"));
        assert_eq!(message, "Promise.resolve(1) => expected 'Reject error: boom', but got { Resolve: 1 }");
    }

    #[test]
    fn result_carries_the_wrapped_value() {
        let verdict = engine().run_block("> Promise.resolve(2)\nResolve: 2\n({ Resolve: 2 })");
        assert_eq!(verdict, Verdict::Pass);
    }

    #[test]
    fn sync_errors() {
        let mut engine = engine();
        assert_eq!(engine.run_block("> null.x\nError: Cannot read properties of null (reading 'x')"), Verdict::Pass);
        assert_eq!(engine.run_block("> throw new Error('x', { code: 'E1' })\nError code: E1"), Verdict::Pass);
    }

    #[test]
    fn outputs_compare_loosely() {
        let mut engine = engine();
        assert_eq!(engine.run_block("> '2'\n2"), Verdict::Pass);
        assert_eq!(engine.run_block("> null\nundefined"), Verdict::Pass);
        assert_eq!(engine.run_block("> ({ n: '1' })\n({ n: 1 })"), Verdict::Pass);
        assert_eq!(fails_with(engine.run_block("> null\n0")), "null => expected 0, but got null");
    }

    #[test]
    fn oversized_allocations_fail_the_block_only() {
        let mut engine = engine();
        assert_eq!(
            fails_with(engine.run_block("> Array(2 ** 62)\n1")),
            "Array(2 ** 62) => expected 1, but got [RangeError: Invalid array length]"
        );
        assert_eq!(
            fails_with(engine.run_block("> 'ab'.repeat(2 ** 62)\n1")),
            "'ab'.repeat(2 ** 62) => expected 1, but got [RangeError: Invalid string length]"
        );
        assert_eq!(
            engine.run_block("> const a = []\n> a[2 ** 40] = 1\nError: Invalid array length"),
            Verdict::Pass
        );
    }

    #[test]
    fn eval_error_on_expected_side() {
        let message = fails_with(engine().run_block("> 1\nnope"));
        assert_eq!(message, "failed to eval output `nope`: nope is not defined");
    }

    #[test]
    fn continuation_error_fails_the_block() {
        let message = fails_with(engine().run_block("> f()\nError: x\n... y"));
        assert_eq!(message, "Continuation is not supported for error");
    }

    #[test]
    fn scope_outlives_blocks() {
        let mut engine = engine();
        assert_eq!(engine.run_block("> const greet = name => 'hi ' + name"), Verdict::Pass);
        assert_eq!(engine.run_block("> greet('ann')\n'hi ann'"), Verdict::Pass);
    }

    #[test]
    fn bindings() {
        let mut engine = engine();
        engine.bind("limit", Value::from(10.0));
        assert_eq!(engine.run_block("> limit * 2\n20"), Verdict::Pass);
    }

    #[test]
    fn document_run() {
        let source = "# T\n\n```js\n> 1 + 1\n2\n```\n\n```rust\nnot checked\n```\n\n```javascript\n> 1\n2\n```\n";
        let mut doc = Document::parse(source);
        let report = engine().check_document(&mut doc, &CheckConfig::default());
        assert_eq!((report.total, report.passed, report.failed), (2, 1, 1));
        assert_eq!(report.blocks[0].line, 3);
        assert_eq!(report.blocks[1].line, 12);
        assert_eq!(
            doc.render(),
            "# T\n\n```js\n> 1 + 1\n2\n```\n\n✅ `speccheck`ed\n\n```rust\nnot checked\n```\n\n```javascript\n> 1\n2\n```\n\n❌ `Error: 1 => expected 2, but got 1`\n"
        );
    }
}
