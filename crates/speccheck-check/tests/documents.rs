// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Whole-document runs through the engine and the real interpreter.

use std::path::Path;

use speccheck_check::{CheckConfig, Engine, Report, Verdict};
use speccheck_doc::Document;
use speccheck_interp::Interpreter;

fn check(source: &str, config: &CheckConfig) -> (String, Report) {
    let mut doc = Document::parse(source);
    let mut engine = Engine::new(Interpreter::new());
    let report = engine.check_document(&mut doc, config);
    (doc.render(), report)
}

fn block(lines: &str) -> String {
    format!("```js\n{}\n```\n", lines)
}

fn single(lines: &str) -> Verdict {
    let (_, report) = check(&block(lines), &CheckConfig::default());
    assert_eq!(report.total, 1);
    report.blocks[0].verdict.clone()
}

#[test]
fn documented_examples() {
    assert_eq!(single("> 1 + 1\n2"), Verdict::Pass);
    assert_eq!(single("> Promise.resolve(42)\nResolve: 42"), Verdict::Pass);
    assert_eq!(single("> Promise.reject(new Error('boom'))\nReject error: boom"), Verdict::Pass);
}

#[test]
fn deterministic_values_equal_themselves() {
    for code in ["42", "'text'", "[1, [2, 3]]", "({ a: { b: [null] } })", "NaN", "-0", "undefined", "new Error('e')"] {
        assert_eq!(single(&format!("> {}\n{}", code, code)), Verdict::Pass, "{}", code);
    }
}

#[test]
fn output_first_is_a_parse_error() {
    assert_eq!(single("2\n> 1 + 1"), Verdict::Fail("at least one input required".into()));
}

#[test]
fn continuation_after_error_forms() {
    assert_eq!(
        single("> f()\nError: boom\n... more"),
        Verdict::Fail("Continuation is not supported for error".into())
    );
    assert_eq!(
        single("> f()\nError code: E1\n... more"),
        Verdict::Fail("Continuation is not supported for error code".into())
    );
}

#[test]
fn mismatch_names_input_expected_and_actual() {
    let Verdict::Fail(message) = single("> 1 + 1\n3") else {
        panic!("expected failure");
    };
    assert!(message.contains("1 + 1"));
    assert!(message.contains("expected 3"));
    assert!(message.contains("but got 2"));
}

#[test]
fn failures_do_not_stop_later_blocks() {
    let source = format!("{}\n{}\n{}", block("> 1\n2"), block("2\n"), block("> 3\n3"));
    let (_, report) = check(&source, &CheckConfig::default());
    let verdicts: Vec<bool> = report.blocks.iter().map(|b| b.verdict.is_pass()).collect();
    assert_eq!(verdicts, vec![false, false, true]);
}

#[test]
fn scope_is_shared_across_blocks() {
    let source = format!("Setup:\n\n{}\nUse:\n\n{}", block("> let count = 2"), block("> count * 21\n42"));
    let (_, report) = check(&source, &CheckConfig::default());
    assert!(report.is_success(), "{:?}", report);
}

#[test]
fn current_result_does_not_leak_between_blocks() {
    let source = format!("{}\n{}", block("> 5"), block("5"));
    let (_, report) = check(&source, &CheckConfig::default());
    assert_eq!(report.blocks[1].verdict, Verdict::Fail("at least one input required".into()));
}

#[test]
fn annotating_twice_is_stable() {
    let source = format!(
        "# Doc\n\n{}\nText.\n{}\nMore text.\n\n{}",
        block("> 'a' + 'b'\n'ab'"),
        block("> [1, 2].length\n3"),
        block("> Promise.reject(new Error('x'))\nReject error: x"),
    );
    let config = CheckConfig::default().with_strip_markers(true);
    let (first, first_report) = check(&source, &config);
    let (second, second_report) = check(&first, &config);
    assert_eq!(first, second);
    assert_eq!(first_report.failed, 1);
    assert_eq!(second_report.failed, 1);

    let doc = Document::parse(&second);
    let pass: Vec<bool> = doc.markers().map(|m| m.is_pass()).collect();
    assert_eq!(pass, vec![true, false, true]);
}

#[test]
fn without_stripping_markers_accumulate() {
    let source = block("> 1\n1");
    let (first, _) = check(&source, &CheckConfig::default());
    let (second, _) = check(&first, &CheckConfig::default());
    assert_eq!(Document::parse(&second).markers().count(), 2);
}

#[test]
fn other_languages_are_untouched() {
    let source = "```rust\nfn main() {}\n```\n\n```\n> 1\n2\n```\n";
    let (rendered, report) = check(source, &CheckConfig::default());
    assert_eq!(report.total, 0);
    assert_eq!(rendered, source);
}

#[test]
fn extra_languages() {
    let source = "```mjs\n> 2 ** 10\n1024\n```\n";
    let (_, report) = check(source, &CheckConfig::default().with_language("mjs"));
    assert_eq!((report.total, report.passed), (1, 1));
}

#[test]
fn specification_checks_itself() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../docs/specification.md");
    let source = std::fs::read_to_string(&path).expect("failed to read docs/specification.md");
    let (rendered, report) = check(&source, &CheckConfig::default().with_strip_markers(true));
    let failures: Vec<String> = report
        .failures()
        .map(|b| format!("Line {}: {}", b.line, b.verdict.message().unwrap_or_default()))
        .collect();
    assert!(failures.is_empty(), "{}", failures.join("\n"));
    assert!(report.total > 0);
    assert_eq!(rendered, source);
}
