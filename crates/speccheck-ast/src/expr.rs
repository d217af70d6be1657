// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression AST nodes.

use std::rc::Rc;

use crate::stmt::Stmt;
use crate::Span;

/// An expression in the AST.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Whether this expression may appear on the left of `=`.
    pub fn is_assignable(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Ident(_) | ExprKind::Member { .. } | ExprKind::Index { .. }
        )
    }
}

/// The kind of expression.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Number literal (every number is an f64)
    Number(f64),
    /// String literal
    String(String),
    /// Boolean literal
    Bool(bool),
    /// `null`
    Null,
    /// `undefined`
    Undefined,
    /// Identifier
    Ident(String),
    /// Array literal (`[1, 2, 3]`)
    Array(Vec<Expr>),
    /// Object literal (`{ a: 1, b }`)
    Object(Vec<Property>),
    /// Member access (`a.b`)
    Member {
        object: Box<Expr>,
        property: String,
    },
    /// Index access (`a[i]`)
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    /// Call (`f(a, b)`)
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// Construction (`new Error('boom')`)
    New {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// Arrow function (`(a, b) => a + b`)
    Arrow(Rc<ArrowFn>),
    /// Unary operation
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// Binary operation
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Short-circuiting operation
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Conditional (`c ? a : b`)
    Conditional {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    /// Assignment, optionally compound (`x = 1`, `x += 1`)
    Assign {
        target: Box<Expr>,
        op: Option<BinOp>,
        value: Box<Expr>,
    },
}

/// A property in an object literal.
#[derive(Debug, Clone)]
pub struct Property {
    pub key: String,
    pub value: Expr,
}

/// An arrow function. Shared behind `Rc` so closures can hold it cheaply.
#[derive(Debug)]
pub struct ArrowFn {
    pub params: Vec<String>,
    pub body: ArrowBody,
    pub span: Span,
}

/// Body of an arrow function.
#[derive(Debug)]
pub enum ArrowBody {
    /// `x => x + 1`
    Expr(Expr),
    /// `x => { return x + 1 }`
    Block(Vec<Stmt>),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    /// `==`
    LooseEq,
    /// `!=`
    LooseNe,
    /// `===`
    StrictEq,
    /// `!==`
    StrictNe,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Short-circuiting operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Nullish,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
    Typeof,
}
