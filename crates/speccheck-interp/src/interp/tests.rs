// SPDX-License-Identifier: (MIT OR Apache-2.0)

use crate::{inspect, Interpreter, Scope, Value};

fn run(scope: &Scope, src: &str) -> Result<Value, Value> {
    Interpreter::new().eval_source(src, scope)
}

fn ok(src: &str) -> String {
    match run(&Scope::new(), src) {
        Ok(value) => inspect(&value),
        Err(raised) => panic!("{} raised {}", src, inspect(&raised)),
    }
}

fn raised(src: &str) -> String {
    match run(&Scope::new(), src) {
        Ok(value) => panic!("{} returned {}", src, inspect(&value)),
        Err(raised) => inspect(&raised),
    }
}

fn settled(src: &str) -> Result<String, String> {
    let scope = Scope::new();
    let mut interp = Interpreter::new();
    let value = interp.eval_source(src, &scope).map_err(|e| inspect(&e))?;
    interp.settle(&value).map(|v| inspect(&v)).map_err(|e| inspect(&e))
}

#[test]
fn arithmetic_and_strings() {
    assert_eq!(ok("1 + 1"), "2");
    assert_eq!(ok("2 ** 10 % 1000"), "24");
    assert_eq!(ok("'a' + 1 + 2"), "'a12'");
    assert_eq!(ok("'abc'.toUpperCase().length"), "3");
    assert_eq!(ok("typeof null"), "'object'");
    assert_eq!(ok("typeof notDeclared"), "'undefined'");
}

#[test]
fn completion_value_is_last_expression() {
    assert_eq!(ok(""), "undefined");
    assert_eq!(ok("let a = 1"), "undefined");
    assert_eq!(ok("let a = 1; a + 1; let b = 2"), "2");
    assert_eq!(ok("if (true) { 'yes' } else { 'no' }"), "'yes'");
}

#[test]
fn scope_persists_between_evaluations() {
    let scope = Scope::new();
    run(&scope, "const greeting = 'hi'; let counter = { count: 0 }").unwrap();
    run(&scope, "counter.count += 2").unwrap();
    let value = run(&scope, "greeting + ' ' + counter.count").unwrap();
    assert_eq!(inspect(&value), "'hi 2'");
}

#[test]
fn redeclaration_replaces_binding() {
    let scope = Scope::new();
    run(&scope, "const x = 1").unwrap();
    run(&scope, "const x = 2").unwrap();
    assert_eq!(inspect(&run(&scope, "x").unwrap()), "2");
}

#[test]
fn closures_capture_their_environment() {
    assert_eq!(
        ok("const makeCounter = () => { let n = 0; return () => { n += 1; return n } }\n\
            const next = makeCounter()\n\
            next(); next(); next()"),
        "3"
    );
    assert_eq!(ok("[1, 2, 3].map(x => x * 2).filter(x => x > 2)"), "[ 4, 6 ]");
    assert_eq!(ok("[1, 2, 3].reduce((a, b) => a + b, 0)"), "6");
}

#[test]
fn runtime_faults_raise_error_objects() {
    assert_eq!(raised("missing"), "[ReferenceError: missing is not defined]");
    assert_eq!(
        raised("undefined.message"),
        "[TypeError: Cannot read properties of undefined (reading 'message')]"
    );
    assert_eq!(raised("const k = 1; k = 2"), "[TypeError: Assignment to constant variable.]");
    assert_eq!(raised("const o = {}; o.nope()"), "[TypeError: o.nope is not a function]");
    assert_eq!(raised("1 +"), "[SyntaxError: Unexpected end of input]");
}

#[test]
fn recursion_runs_to_the_call_depth_limit() {
    let (deep, runaway) = crate::with_eval_stack(|| {
        let deep = ok("const count = n => n === 0 ? 0 : 1 + count(n - 1); count(5000)");
        let runaway = raised("const f = () => f(); f()");
        (deep, runaway)
    })
    .unwrap();
    assert_eq!(deep, "5000");
    assert_eq!(runaway, "[RangeError: Maximum call stack size exceeded]");
}

#[test]
fn throw_raises_any_value() {
    assert_eq!(raised("throw new Error('boom')"), "[Error: boom]");
    assert_eq!(raised("throw 'plain'"), "'plain'");
    assert_eq!(raised("throw { code: 42 }"), "{ code: 42 }");
}

#[test]
fn error_options_are_copied() {
    assert_eq!(ok("new Error('x', { code: 'E1' }).code"), "'E1'");
    assert_eq!(ok("const e = new Error('x'); e.errorCode = 7; e.errorCode"), "7");
    assert_eq!(ok("Error('no new').message"), "'no new'");
}

#[test]
fn promises_settle_on_demand() {
    assert_eq!(settled("Promise.resolve(42)"), Ok("42".to_string()));
    assert_eq!(settled("Promise.reject(new Error('boom'))"), Err("[Error: boom]".to_string()));
    assert_eq!(settled("Promise.resolve(1).then(x => x + 1)"), Ok("2".to_string()));
    assert_eq!(
        settled("Promise.reject(1).catch(e => e * 10).then(x => Promise.resolve(x + 1))"),
        Ok("11".to_string())
    );
    assert_eq!(
        settled("Promise.resolve(1).then(x => { throw new Error('in then') })"),
        Err("[Error: in then]".to_string())
    );
    assert_eq!(settled("7"), Ok("7".to_string()));
}

#[test]
fn promise_constructor_and_all() {
    assert_eq!(settled("new Promise((resolve) => resolve('done'))"), Ok("'done'".to_string()));
    assert_eq!(
        settled("new Promise((resolve, reject) => { throw new Error('executor') })"),
        Err("[Error: executor]".to_string())
    );
    assert_eq!(
        settled("Promise.all([1, Promise.resolve(2), Promise.resolve(3).then(x => x * 2)])"),
        Ok("[ 1, 2, 6 ]".to_string())
    );
    assert_eq!(
        settled("Promise.all([Promise.reject(new Error('first')), 2])"),
        Err("[Error: first]".to_string())
    );
}

#[test]
fn never_settled_promise_rejects_when_awaited() {
    assert_eq!(
        settled("new Promise(() => {})"),
        Err("[Error: Promise was never settled]".to_string())
    );
}

#[test]
fn deferred_resolution_is_seen_when_settled() {
    let scope = Scope::new();
    let mut interp = Interpreter::new();
    let value = interp
        .eval_source("let release; const p = new Promise(r => { release = r }); p.then(v => v + '!')", &scope)
        .unwrap();
    interp.eval_source("release('go')", &scope).unwrap();
    let outcome = interp.settle(&value).map(|v| inspect(&v)).map_err(|e| inspect(&e));
    assert_eq!(outcome, Ok("'go!'".to_string()));
}

#[test]
fn builtin_namespaces() {
    assert_eq!(ok("Math.max(1, 5, 3)"), "5");
    assert_eq!(ok("Math.round(2.5)"), "3");
    assert_eq!(ok("JSON.stringify({ a: [1, 'x'] })"), "'{\"a\":[1,\"x\"]}'");
    assert_eq!(ok("JSON.parse('{\"a\": 1}').a"), "1");
    assert_eq!(ok("Object.keys({ a: 1, b: 2 })"), "[ 'a', 'b' ]");
    assert_eq!(ok("Object.entries({ a: 1 })"), "[ [ 'a', 1 ] ]");
    assert_eq!(ok("Array.isArray([])"), "true");
    assert_eq!(ok("String(12) + Number('3') + Boolean('')"), "'123false'");
    assert_eq!(ok("'a-b-c'.split('-').join('+')"), "'a+b+c'");
    assert_eq!(ok("(3.14159).toFixed(2)"), "'3.14'");
}

#[test]
fn array_search_from_index() {
    assert_eq!(ok("[1, 2, 3].indexOf(2, -1)"), "-1");
    assert_eq!(ok("[1, 2, 3, 2].indexOf(2, 2)"), "3");
    assert_eq!(ok("[1, 2, 3].indexOf(3, -1)"), "2");
    assert_eq!(ok("[1, 2, 3].includes(1, 1)"), "false");
    assert_eq!(ok("[1, 2, 3].includes(3, 10)"), "false");
    assert_eq!(ok("[1, 2, 3].includes(1, -5)"), "true");
}

#[test]
fn array_length_is_bounded() {
    assert_eq!(raised("Array(2 ** 32)"), "[RangeError: Invalid array length]");
    assert_eq!(raised("const a = []; a.length = 2 ** 62"), "[RangeError: Invalid array length]");
    assert_eq!(raised("const a = []; a[2 ** 40] = 1"), "[RangeError: Invalid array length]");
    assert_eq!(ok("const a = [1]; a.length = 3; a"), "[ 1, undefined, undefined ]");
}

#[test]
fn property_reads_through_the_public_api() {
    let scope = Scope::new();
    let mut interp = Interpreter::new();
    let err = interp.eval_source("new Error('boom', { code: 'E2' })", &scope).unwrap();
    assert_eq!(inspect(&interp.get_property(&err, "message").unwrap()), "'boom'");
    assert_eq!(inspect(&interp.get_property(&err, "code").unwrap()), "'E2'");
    assert!(interp.get_property(&Value::Undefined, "code").is_err());
}
