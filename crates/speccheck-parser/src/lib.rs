// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser for the speccheck evaluation language.
//!
//! Transforms a token stream into a [`Program`](speccheck_ast::stmt::Program).

mod parser;

pub use parser::{ParseError, Parser};

use speccheck_ast::stmt::Program;

/// Lex and parse `source` in one step.
pub fn parse_source(source: &str) -> Result<Program, ParseError> {
    let tokens = speccheck_lexer::Lexer::new(source).tokenize()?;
    Parser::new(tokens).parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use speccheck_ast::expr::{ArrowBody, BinOp, ExprKind, LogicalOp};
    use speccheck_ast::stmt::{DeclKind, StmtKind};

    fn parse(src: &str) -> Program {
        parse_source(src).unwrap_or_else(|e| panic!("parse of {:?} failed: {}", src, e))
    }

    fn single_expr(src: &str) -> ExprKind {
        let program = parse(src);
        assert_eq!(program.stmts.len(), 1, "expected one statement in {:?}", src);
        match &program.stmts[0].kind {
            StmtKind::Expr(e) => e.kind.clone(),
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn precedence() {
        let ExprKind::Binary { op, right, .. } = single_expr("1 + 2 * 3") else {
            panic!("expected binary");
        };
        assert_eq!(op, BinOp::Add);
        assert!(matches!(right.kind, ExprKind::Binary { op: BinOp::Mul, .. }));
    }

    #[test]
    fn exponent_is_right_associative() {
        let ExprKind::Binary { op, right, .. } = single_expr("2 ** 3 ** 2") else {
            panic!("expected binary");
        };
        assert_eq!(op, BinOp::Pow);
        assert!(matches!(right.kind, ExprKind::Binary { op: BinOp::Pow, .. }));
    }

    #[test]
    fn logical_and_conditional() {
        let ExprKind::Conditional { cond, .. } = single_expr("a && b ? 1 : 2") else {
            panic!("expected conditional");
        };
        assert!(matches!(cond.kind, ExprKind::Logical { op: LogicalOp::And, .. }));
    }

    #[test]
    fn member_call_chain() {
        let ExprKind::Call { callee, args } = single_expr("Promise.resolve(42)") else {
            panic!("expected call");
        };
        assert_eq!(args.len(), 1);
        assert!(matches!(callee.kind, ExprKind::Member { ref property, .. } if property == "resolve"));
    }

    #[test]
    fn new_with_arguments() {
        let ExprKind::Call { callee, .. } = single_expr("Promise.reject(new Error('boom'))") else {
            panic!("expected call");
        };
        assert!(matches!(callee.kind, ExprKind::Member { .. }));

        let ExprKind::New { callee, args } = single_expr("new Error('boom')") else {
            panic!("expected new");
        };
        assert!(matches!(callee.kind, ExprKind::Ident(ref n) if n == "Error"));
        assert!(matches!(args[0].kind, ExprKind::String(ref s) if s == "boom"));
    }

    #[test]
    fn arrow_functions() {
        let ExprKind::Arrow(f) = single_expr("(a, b) => a + b") else {
            panic!("expected arrow");
        };
        assert_eq!(f.params, vec!["a", "b"]);
        assert!(matches!(f.body, ArrowBody::Expr(_)));

        let ExprKind::Arrow(f) = single_expr("x => { return x * 2 }") else {
            panic!("expected arrow");
        };
        assert_eq!(f.params, vec!["x"]);
        assert!(matches!(f.body, ArrowBody::Block(ref stmts) if stmts.len() == 1));

        let ExprKind::Arrow(f) = single_expr("() => 1") else {
            panic!("expected arrow");
        };
        assert!(f.params.is_empty());
    }

    #[test]
    fn parenthesised_expression_is_not_an_arrow() {
        assert!(matches!(single_expr("(1 + 2) * 3"), ExprKind::Binary { op: BinOp::Mul, .. }));
    }

    #[test]
    fn object_literal_at_statement_start() {
        let ExprKind::Object(props) = single_expr("{ a: 1, 'b-c': 2, d }") else {
            panic!("expected object");
        };
        let keys: Vec<_> = props.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b-c", "d"]);
        assert!(matches!(single_expr("{}"), ExprKind::Object(ref p) if p.is_empty()));
    }

    #[test]
    fn block_at_statement_start() {
        let program = parse("{ let a = 1; a }");
        assert!(matches!(program.stmts[0].kind, StmtKind::Block(ref s) if s.len() == 2));
    }

    #[test]
    fn declarations_and_assignment() {
        let program = parse("const x = 1; y = x + 1\nlet z");
        assert_eq!(program.stmts.len(), 3);
        assert!(matches!(
            program.stmts[0].kind,
            StmtKind::Decl { kind: DeclKind::Const, ref name, init: Some(_) } if name == "x"
        ));
        assert!(matches!(
            program.stmts[1].kind,
            StmtKind::Expr(ref e) if matches!(e.kind, ExprKind::Assign { op: None, .. })
        ));
        assert!(matches!(program.stmts[2].kind, StmtKind::Decl { init: None, .. }));
    }

    #[test]
    fn compound_assignment_to_member() {
        assert!(matches!(
            single_expr("counter.count += 2"),
            ExprKind::Assign { op: Some(BinOp::Add), .. }
        ));
    }

    #[test]
    fn if_else() {
        let program = parse("if (a) { 1 } else if (b) { 2 } else { 3 }");
        let StmtKind::If { else_branch, .. } = &program.stmts[0].kind else {
            panic!("expected if");
        };
        let else_branch = else_branch.as_ref().expect("else branch");
        assert!(matches!(else_branch[0].kind, StmtKind::If { .. }));
    }

    #[test]
    fn multiline_array_literal() {
        assert!(matches!(single_expr("[\n  1,\n  2,\n]"), ExprKind::Array(ref items) if items.len() == 2));
    }

    #[test]
    fn empty_program() {
        assert!(parse("").stmts.is_empty());
        assert!(parse("  \n ; \n").stmts.is_empty());
    }

    #[test]
    fn errors() {
        assert_eq!(parse_source("1 +").unwrap_err().message, "Unexpected end of input");
        assert_eq!(parse_source("(1").unwrap_err().message, "Unexpected end of input");
        assert_eq!(parse_source("1 = 2").unwrap_err().message, "Invalid left-hand side in assignment");
        assert_eq!(parse_source("a b").unwrap_err().message, "Unexpected identifier 'b'");
        assert_eq!(parse_source("'x").unwrap_err().message, "Invalid or unexpected token");
    }
}
