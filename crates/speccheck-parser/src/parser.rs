// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The parser implementation using Pratt parsing for expressions.

use std::rc::Rc;

use speccheck_ast::expr::{ArrowBody, ArrowFn, BinOp, Expr, ExprKind, LogicalOp, Property, UnaryOp};
use speccheck_ast::stmt::{DeclKind, Program, Stmt, StmtKind};
use speccheck_ast::token::{Token, TokenKind};
use speccheck_ast::Span;
use speccheck_lexer::LexError;

/// The parser for evaluation-language source code.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Nesting depth of arrow function bodies; `return` is only legal inside one.
    function_depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0, function_depth: 0 }
    }

    /// Parse a whole program. Stops at the first error.
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut stmts = Vec::new();
        loop {
            self.skip_separators();
            if self.at_end() {
                break;
            }
            let stmt = self.parse_statement()?;
            if needs_terminator(&stmt) {
                self.expect_terminator()?;
            }
            stmts.push(stmt);
        }
        Ok(Program { stmts })
    }

    // =========================================================================
    // Token Navigation
    // =========================================================================

    fn current(&self) -> &Token {
        // The lexer always appends Eof, so the last token is a safe fallback.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek(&self, n: usize) -> &TokenKind {
        self.tokens.get(self.pos + n).map(|t| &t.kind).unwrap_or(&TokenKind::Eof)
    }

    /// The first token at or after the cursor that is not a newline.
    fn peek_past_newlines(&self) -> &TokenKind {
        let mut n = 0;
        while matches!(self.peek(n), TokenKind::Newline) {
            n += 1;
        }
        self.peek(n)
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if !self.at_end() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::unexpected(self.current()))
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(&TokenKind::Newline) {
            self.advance();
        }
    }

    fn skip_separators(&mut self) {
        while self.check(&TokenKind::Newline) || self.check(&TokenKind::Semi) {
            self.advance();
        }
    }

    fn expect_terminator(&mut self) -> Result<(), ParseError> {
        match self.current_kind() {
            TokenKind::Newline | TokenKind::Semi => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof | TokenKind::RBrace => Ok(()),
            _ => Err(ParseError::unexpected(self.current())),
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.current_kind().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(ParseError::unexpected(self.current())),
        }
    }

    /// A property name after `.` or as an object key. Keywords are allowed.
    fn expect_property_name(&mut self) -> Result<String, ParseError> {
        let name = match self.current_kind() {
            TokenKind::Ident(name) => name.clone(),
            TokenKind::Bool(b) => b.to_string(),
            TokenKind::Null => "null".to_string(),
            TokenKind::Undefined => "undefined".to_string(),
            kind if kind.symbol().chars().all(|c| c.is_ascii_alphabetic()) && !kind.symbol().is_empty() => {
                kind.symbol().to_string()
            }
            _ => return Err(ParseError::unexpected(self.current())),
        };
        self.advance();
        Ok(name)
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current().span;
        match self.current_kind() {
            TokenKind::Let | TokenKind::Const | TokenKind::Var => self.parse_decl(),

            TokenKind::Throw => {
                self.advance();
                if matches!(self.current_kind(), TokenKind::Newline | TokenKind::Eof | TokenKind::Semi) {
                    return Err(ParseError::new("Illegal newline after throw", self.current().span));
                }
                let expr = self.parse_expr()?;
                let span = start.to(expr.span);
                Ok(Stmt { kind: StmtKind::Throw(expr), span })
            }

            TokenKind::Return => {
                if self.function_depth == 0 {
                    return Err(ParseError::new("Illegal return statement", start));
                }
                self.advance();
                let value = if matches!(
                    self.current_kind(),
                    TokenKind::Newline | TokenKind::Semi | TokenKind::Eof | TokenKind::RBrace
                ) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                let span = value.as_ref().map(|e| start.to(e.span)).unwrap_or(start);
                Ok(Stmt { kind: StmtKind::Return(value), span })
            }

            TokenKind::If => self.parse_if(),

            TokenKind::LBrace if !self.looks_like_object_literal() => {
                let stmts = self.parse_block_body()?;
                let end = self.tokens[self.pos - 1].span;
                Ok(Stmt { kind: StmtKind::Block(stmts), span: start.to(end) })
            }

            _ => {
                let expr = self.parse_expr()?;
                let span = expr.span;
                Ok(Stmt { kind: StmtKind::Expr(expr), span })
            }
        }
    }

    fn parse_decl(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.advance();
        let kind = match keyword.kind {
            TokenKind::Const => DeclKind::Const,
            TokenKind::Var => DeclKind::Var,
            _ => DeclKind::Let,
        };
        let name = self.expect_ident()?;
        let init = if self.match_token(&TokenKind::Eq) {
            self.skip_newlines();
            Some(self.parse_expr()?)
        } else {
            None
        };
        if kind.is_const() && init.is_none() {
            return Err(ParseError::new("Missing initializer in const declaration", keyword.span));
        }
        let end = self.tokens[self.pos - 1].span;
        Ok(Stmt {
            kind: StmtKind::Decl { kind, name, init },
            span: keyword.span.to(end),
        })
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let start = self.expect(&TokenKind::If)?.span;
        self.expect(&TokenKind::LParen)?;
        self.skip_newlines();
        let cond = self.parse_expr()?;
        self.skip_newlines();
        self.expect(&TokenKind::RParen)?;
        self.skip_newlines();
        let then_branch = self.parse_branch()?;

        let else_branch = if matches!(self.peek_past_newlines(), TokenKind::Else) {
            self.skip_newlines();
            self.advance();
            self.skip_newlines();
            if self.check(&TokenKind::If) {
                Some(vec![self.parse_if()?])
            } else {
                Some(self.parse_branch()?)
            }
        } else {
            None
        };

        let end = self.tokens[self.pos - 1].span;
        Ok(Stmt {
            kind: StmtKind::If { cond, then_branch, else_branch },
            span: start.to(end),
        })
    }

    /// Body of an `if`/`else`: a braced block or a single statement.
    fn parse_branch(&mut self) -> Result<Vec<Stmt>, ParseError> {
        if self.check(&TokenKind::LBrace) {
            self.parse_block_body()
        } else {
            Ok(vec![self.parse_statement()?])
        }
    }

    fn parse_block_body(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        loop {
            self.skip_separators();
            if self.check(&TokenKind::RBrace) {
                break;
            }
            if self.at_end() {
                return Err(ParseError::unexpected(self.current()));
            }
            let stmt = self.parse_statement()?;
            if needs_terminator(&stmt) {
                self.expect_terminator()?;
            }
            stmts.push(stmt);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(stmts)
    }

    /// Decide whether a `{` in statement position opens an object literal.
    /// `{}`, `{ key: ...` and `{ name, ...` / `{ name }` are objects;
    /// anything else is a block.
    fn looks_like_object_literal(&self) -> bool {
        let mut n = 1;
        while matches!(self.peek(n), TokenKind::Newline) {
            n += 1;
        }
        match self.peek(n) {
            TokenKind::RBrace => true,
            TokenKind::String(_) | TokenKind::Number(_) => matches!(self.peek(n + 1), TokenKind::Colon),
            TokenKind::Ident(_) => matches!(
                self.peek(n + 1),
                TokenKind::Colon | TokenKind::Comma | TokenKind::RBrace
            ),
            _ => false,
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        if self.is_arrow_start() {
            return self.parse_arrow();
        }

        let target = self.parse_conditional()?;

        let op = match self.current_kind() {
            TokenKind::Eq => None,
            TokenKind::PlusEq => Some(BinOp::Add),
            TokenKind::MinusEq => Some(BinOp::Sub),
            TokenKind::StarEq => Some(BinOp::Mul),
            TokenKind::SlashEq => Some(BinOp::Div),
            _ => return Ok(target),
        };
        if !target.is_assignable() {
            return Err(ParseError::new("Invalid left-hand side in assignment", target.span));
        }
        self.advance();
        self.skip_newlines();
        let value = self.parse_assignment()?;
        let span = target.span.to(value.span);
        Ok(Expr::new(
            ExprKind::Assign { target: Box::new(target), op, value: Box::new(value) },
            span,
        ))
    }

    /// `x =>` or `( ... ) =>` with balanced parentheses.
    fn is_arrow_start(&self) -> bool {
        match self.current_kind() {
            TokenKind::Ident(_) => matches!(self.peek(1), TokenKind::FatArrow),
            TokenKind::LParen => {
                let mut depth = 0usize;
                let mut n = 0;
                loop {
                    match self.peek(n) {
                        TokenKind::LParen => depth += 1,
                        TokenKind::RParen => {
                            depth -= 1;
                            if depth == 0 {
                                return matches!(self.peek(n + 1), TokenKind::FatArrow);
                            }
                        }
                        TokenKind::Eof => return false,
                        _ => {}
                    }
                    n += 1;
                }
            }
            _ => false,
        }
    }

    fn parse_arrow(&mut self) -> Result<Expr, ParseError> {
        let start = self.current().span;
        let mut params = Vec::new();
        if self.check(&TokenKind::LParen) {
            self.advance();
            self.skip_newlines();
            while !self.check(&TokenKind::RParen) {
                params.push(self.expect_ident()?);
                self.skip_newlines();
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
                self.skip_newlines();
            }
            self.expect(&TokenKind::RParen)?;
        } else {
            params.push(self.expect_ident()?);
        }
        self.expect(&TokenKind::FatArrow)?;
        self.skip_newlines();

        let body = if self.check(&TokenKind::LBrace) {
            self.function_depth += 1;
            let body = self.parse_block_body();
            self.function_depth -= 1;
            ArrowBody::Block(body?)
        } else {
            ArrowBody::Expr(self.parse_assignment()?)
        };

        let span = start.to(self.tokens[self.pos - 1].span);
        Ok(Expr::new(ExprKind::Arrow(Rc::new(ArrowFn { params, body, span })), span))
    }

    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let cond = self.parse_binary(0)?;
        if !self.match_token(&TokenKind::Question) {
            return Ok(cond);
        }
        self.skip_newlines();
        let then_branch = self.parse_assignment()?;
        self.skip_newlines();
        self.expect(&TokenKind::Colon)?;
        self.skip_newlines();
        let else_branch = self.parse_assignment()?;
        let span = cond.span.to(else_branch.span);
        Ok(Expr::new(
            ExprKind::Conditional {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            span,
        ))
    }

    fn parse_binary(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;

        loop {
            self.skip_newlines_before_continuation();
            let Some((l_bp, r_bp)) = self.infix_bp() else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            let op_token = self.advance();
            self.skip_newlines();
            let rhs = self.parse_binary(r_bp)?;
            let span = lhs.span.to(rhs.span);
            let kind = match logical_op(&op_token.kind) {
                Some(op) => ExprKind::Logical { op, left: Box::new(lhs), right: Box::new(rhs) },
                None => ExprKind::Binary {
                    op: binary_op(&op_token.kind),
                    left: Box::new(lhs),
                    right: Box::new(rhs),
                },
            };
            lhs = Expr::new(kind, span);
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let start = self.current().span;
        let op = match self.current_kind() {
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Typeof => Some(UnaryOp::Typeof),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let operand = self.parse_unary()?;
            let span = start.to(operand.span);
            return Ok(Expr::new(ExprKind::Unary { op, operand: Box::new(operand) }, span));
        }

        let primary = self.parse_primary()?;
        self.parse_postfix(primary)
    }

    fn parse_postfix(&mut self, mut lhs: Expr) -> Result<Expr, ParseError> {
        loop {
            match self.current_kind() {
                TokenKind::LParen => {
                    let args = self.parse_args()?;
                    let span = lhs.span.to(self.tokens[self.pos - 1].span);
                    lhs = Expr::new(ExprKind::Call { callee: Box::new(lhs), args }, span);
                }
                TokenKind::Dot => {
                    self.advance();
                    let property = self.expect_property_name()?;
                    let span = lhs.span.to(self.tokens[self.pos - 1].span);
                    lhs = Expr::new(ExprKind::Member { object: Box::new(lhs), property }, span);
                }
                TokenKind::LBracket => {
                    self.advance();
                    self.skip_newlines();
                    let index = self.parse_expr()?;
                    self.skip_newlines();
                    self.expect(&TokenKind::RBracket)?;
                    let span = lhs.span.to(self.tokens[self.pos - 1].span);
                    lhs = Expr::new(ExprKind::Index { object: Box::new(lhs), index: Box::new(index) }, span);
                }
                // Leading-dot method chains continue across lines
                TokenKind::Newline if matches!(self.peek_past_newlines(), TokenKind::Dot) => {
                    self.skip_newlines();
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        self.skip_newlines();
        let mut args = Vec::new();
        while !self.check(&TokenKind::RParen) {
            args.push(self.parse_assignment()?);
            self.skip_newlines();
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.current().clone();
        let span = token.span;
        let kind = match token.kind {
            TokenKind::Number(n) => ExprKind::Number(n),
            TokenKind::String(s) => ExprKind::String(s),
            TokenKind::Bool(b) => ExprKind::Bool(b),
            TokenKind::Null => ExprKind::Null,
            TokenKind::Undefined => ExprKind::Undefined,
            TokenKind::Ident(name) => ExprKind::Ident(name),
            TokenKind::LParen => {
                self.advance();
                self.skip_newlines();
                let inner = self.parse_expr()?;
                self.skip_newlines();
                self.expect(&TokenKind::RParen)?;
                return Ok(inner);
            }
            TokenKind::LBracket => return self.parse_array_literal(),
            TokenKind::LBrace => return self.parse_object_literal(),
            TokenKind::New => return self.parse_new(),
            _ => return Err(ParseError::unexpected(&token)),
        };
        self.advance();
        Ok(Expr::new(kind, span))
    }

    fn parse_array_literal(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect(&TokenKind::LBracket)?.span;
        self.skip_newlines();
        let mut elements = Vec::new();
        while !self.check(&TokenKind::RBracket) {
            elements.push(self.parse_assignment()?);
            self.skip_newlines();
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        let end = self.expect(&TokenKind::RBracket)?.span;
        Ok(Expr::new(ExprKind::Array(elements), start.to(end)))
    }

    fn parse_object_literal(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect(&TokenKind::LBrace)?.span;
        self.skip_newlines();
        let mut properties = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let key_token = self.current().clone();
            let key = match &key_token.kind {
                TokenKind::String(s) => {
                    self.advance();
                    s.clone()
                }
                TokenKind::Number(n) => {
                    self.advance();
                    format_number_key(*n)
                }
                _ => self.expect_property_name()?,
            };

            let value = if self.match_token(&TokenKind::Colon) {
                self.skip_newlines();
                self.parse_assignment()?
            } else if matches!(key_token.kind, TokenKind::Ident(_)) {
                Expr::new(ExprKind::Ident(key.clone()), key_token.span)
            } else {
                return Err(ParseError::unexpected(self.current()));
            };

            properties.push(Property { key, value });
            self.skip_newlines();
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        let end = self.expect(&TokenKind::RBrace)?.span;
        Ok(Expr::new(ExprKind::Object(properties), start.to(end)))
    }

    /// `new Callee(args)`. The callee is a member chain without calls.
    fn parse_new(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect(&TokenKind::New)?.span;
        let mut callee = self.parse_primary()?;
        loop {
            match self.current_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let property = self.expect_property_name()?;
                    let span = callee.span.to(self.tokens[self.pos - 1].span);
                    callee = Expr::new(ExprKind::Member { object: Box::new(callee), property }, span);
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(&TokenKind::RBracket)?;
                    let span = callee.span.to(self.tokens[self.pos - 1].span);
                    callee = Expr::new(ExprKind::Index { object: Box::new(callee), index: Box::new(index) }, span);
                }
                _ => break,
            }
        }
        let args = if self.check(&TokenKind::LParen) {
            self.parse_args()?
        } else {
            Vec::new()
        };
        let span = start.to(self.tokens[self.pos - 1].span);
        Ok(Expr::new(ExprKind::New { callee: Box::new(callee), args }, span))
    }

    /// Newlines end an expression unless the next line continues it with a
    /// binary operator, `.` or `?`.
    fn skip_newlines_before_continuation(&mut self) {
        if !self.check(&TokenKind::Newline) {
            return;
        }
        let continues = matches!(self.peek_past_newlines(), TokenKind::Question)
            || infix_bp_of(self.peek_past_newlines()).is_some();
        if continues {
            self.skip_newlines();
        }
    }

    // =========================================================================
    // Operator Precedence
    // =========================================================================

    fn infix_bp(&self) -> Option<(u8, u8)> {
        infix_bp_of(self.current_kind())
    }
}

fn infix_bp_of(kind: &TokenKind) -> Option<(u8, u8)> {
    match kind {
        TokenKind::QuestionQuestion => Some((1, 2)),
        TokenKind::PipePipe => Some((3, 4)),
        TokenKind::AmpAmp => Some((5, 6)),
        TokenKind::EqEq | TokenKind::BangEq | TokenKind::EqEqEq | TokenKind::BangEqEq => Some((7, 8)),
        TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq => Some((9, 10)),
        TokenKind::Plus | TokenKind::Minus => Some((11, 12)),
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some((13, 14)),
        // Right-associative
        TokenKind::StarStar => Some((16, 15)),
        _ => None,
    }
}

fn logical_op(kind: &TokenKind) -> Option<LogicalOp> {
    match kind {
        TokenKind::AmpAmp => Some(LogicalOp::And),
        TokenKind::PipePipe => Some(LogicalOp::Or),
        TokenKind::QuestionQuestion => Some(LogicalOp::Nullish),
        _ => None,
    }
}

/// Map an infix token to its operator. Only called for tokens `infix_bp_of`
/// accepts and `logical_op` rejects.
fn binary_op(kind: &TokenKind) -> BinOp {
    match kind {
        TokenKind::Plus => BinOp::Add,
        TokenKind::Minus => BinOp::Sub,
        TokenKind::Star => BinOp::Mul,
        TokenKind::Slash => BinOp::Div,
        TokenKind::Percent => BinOp::Rem,
        TokenKind::StarStar => BinOp::Pow,
        TokenKind::EqEq => BinOp::LooseEq,
        TokenKind::BangEq => BinOp::LooseNe,
        TokenKind::EqEqEq => BinOp::StrictEq,
        TokenKind::BangEqEq => BinOp::StrictNe,
        TokenKind::Lt => BinOp::Lt,
        TokenKind::LtEq => BinOp::Le,
        TokenKind::Gt => BinOp::Gt,
        _ => BinOp::Ge,
    }
}

/// Statements ending in `}` do not need a separator before the next one.
fn needs_terminator(stmt: &Stmt) -> bool {
    !matches!(stmt.kind, StmtKind::If { .. } | StmtKind::Block(_))
}

fn format_number_key(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// A syntax error with location.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub span: Span,
    pub message: String,
}

impl ParseError {
    fn new(message: impl Into<String>, span: Span) -> Self {
        Self { span, message: message.into() }
    }

    fn unexpected(token: &Token) -> Self {
        let message = match &token.kind {
            TokenKind::Eof => "Unexpected end of input".to_string(),
            TokenKind::Newline => "Unexpected end of line".to_string(),
            TokenKind::Ident(name) => format!("Unexpected identifier '{}'", name),
            TokenKind::Number(_) => "Unexpected number".to_string(),
            TokenKind::String(_) => "Unexpected string".to_string(),
            TokenKind::Bool(b) => format!("Unexpected token '{}'", b),
            TokenKind::Null => "Unexpected token 'null'".to_string(),
            TokenKind::Undefined => "Unexpected token 'undefined'".to_string(),
            other => format!("Unexpected token '{}'", other.symbol()),
        };
        Self::new(message, token.span)
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        Self { span: err.span, message: err.message }
    }
}
