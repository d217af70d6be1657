// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement AST nodes.

use crate::expr::Expr;
use crate::Span;

/// A statement in the AST.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

/// The kind of statement.
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// Expression statement
    Expr(Expr),
    /// `let`, `const` or `var` declaration
    Decl {
        kind: DeclKind,
        name: String,
        init: Option<Expr>,
    },
    /// `throw expr`
    Throw(Expr),
    /// `return` / `return expr`
    Return(Option<Expr>),
    /// `if (cond) { ... } else { ... }`
    If {
        cond: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
    },
    /// `{ ... }`
    Block(Vec<Stmt>),
}

/// Declaration keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Let,
    Const,
    Var,
}

impl DeclKind {
    pub fn is_const(self) -> bool {
        self == DeclKind::Const
    }
}

/// A parsed program: the statements of one evaluation.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}
