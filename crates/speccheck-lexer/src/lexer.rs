// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The lexer implementation using logos.

use logos::Logos;
use speccheck_ast::token::{Token, TokenKind};
use speccheck_ast::Span;

/// Raw token type for logos - we parse values in a second pass.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\f]+")] // Skip horizontal whitespace (not newlines)
enum RawToken {
    // === Keywords ===
    #[token("let")]
    Let,
    #[token("const")]
    Const,
    #[token("var")]
    Var,
    #[token("new")]
    New,
    #[token("throw")]
    Throw,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("typeof")]
    Typeof,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("undefined")]
    Undefined,

    // === Operators (order matters - longer first) ===
    #[token("===")]
    EqEqEq,
    #[token("!==")]
    BangEqEq,

    #[token("**")]
    StarStar,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("??")]
    QuestionQuestion,
    #[token("=>")]
    FatArrow,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("!")]
    Bang,
    #[token("?")]
    Question,
    #[token(".")]
    Dot,

    // === Delimiters ===
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,

    // === Newline (terminates statements) ===
    #[token("\n")]
    #[token("\r\n")]
    Newline,

    // === Comments (skip them) ===
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    // === Literals ===
    #[regex(r"0[xX][0-9a-fA-F]+")]
    HexNumber,

    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    Number,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    DoubleString,

    #[regex(r"'([^'\\\n]|\\.)*'")]
    SingleString,

    // === Identifier (must come after keywords) ===
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,
}

/// Skip block comments. They do not nest: `/* /* */` closes at the first `*/`.
fn block_comment(lexer: &mut logos::Lexer<RawToken>) -> logos::Skip {
    let remainder = lexer.remainder();
    let consumed = match remainder.find("*/") {
        Some(pos) => pos + 2,
        None => remainder.len(),
    };
    lexer.bump(consumed);
    logos::Skip
}

/// The lexer for evaluation-language source code.
pub struct Lexer<'a> {
    source: &'a str,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Tokenize the entire source. Stops at the first error, which is what
    /// an evaluation needs: a single `SyntaxError`.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut logos_lexer = RawToken::lexer(self.source);

        while let Some(result) = logos_lexer.next() {
            let span = logos_lexer.span();
            let slice = logos_lexer.slice();

            let kind = match result {
                Ok(raw) => convert_token(raw, slice, span.start, span.end)?,
                Err(()) => {
                    let ch = self.source[span.start..].chars().next().unwrap_or('?');
                    return Err(LexError::unexpected_char(ch, span.start));
                }
            };

            tokens.push(Token {
                kind,
                span: Span::new(span.start, span.end),
            });
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            span: Span::new(self.source.len(), self.source.len()),
        });

        Ok(tokens)
    }
}

/// Convert a raw logos token to our TokenKind, parsing literals.
fn convert_token(raw: RawToken, slice: &str, start: usize, end: usize) -> Result<TokenKind, LexError> {
    Ok(match raw {
        // Keywords
        RawToken::Let => TokenKind::Let,
        RawToken::Const => TokenKind::Const,
        RawToken::Var => TokenKind::Var,
        RawToken::New => TokenKind::New,
        RawToken::Throw => TokenKind::Throw,
        RawToken::Return => TokenKind::Return,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::Typeof => TokenKind::Typeof,
        RawToken::True => TokenKind::Bool(true),
        RawToken::False => TokenKind::Bool(false),
        RawToken::Null => TokenKind::Null,
        RawToken::Undefined => TokenKind::Undefined,

        // Operators
        RawToken::EqEqEq => TokenKind::EqEqEq,
        RawToken::BangEqEq => TokenKind::BangEqEq,
        RawToken::StarStar => TokenKind::StarStar,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::BangEq => TokenKind::BangEq,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::QuestionQuestion => TokenKind::QuestionQuestion,
        RawToken::FatArrow => TokenKind::FatArrow,
        RawToken::PlusEq => TokenKind::PlusEq,
        RawToken::MinusEq => TokenKind::MinusEq,
        RawToken::StarEq => TokenKind::StarEq,
        RawToken::SlashEq => TokenKind::SlashEq,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Eq => TokenKind::Eq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::Bang => TokenKind::Bang,
        RawToken::Question => TokenKind::Question,
        RawToken::Dot => TokenKind::Dot,

        // Delimiters
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Semi => TokenKind::Semi,
        RawToken::Comma => TokenKind::Comma,

        RawToken::Newline => TokenKind::Newline,

        // Literals - parse the values
        RawToken::HexNumber => {
            let value = u64::from_str_radix(&slice[2..], 16)
                .map_err(|_| LexError::invalid_number(start, end))?;
            TokenKind::Number(value as f64)
        }
        RawToken::Number => {
            let value = slice
                .parse::<f64>()
                .map_err(|_| LexError::invalid_number(start, end))?;
            TokenKind::Number(value)
        }
        RawToken::DoubleString | RawToken::SingleString => {
            let inner = &slice[1..slice.len() - 1];
            TokenKind::String(parse_string(inner, start)?)
        }
        RawToken::Ident => TokenKind::Ident(slice.to_string()),

        RawToken::LineComment | RawToken::BlockComment => {
            unreachable!("comments are skipped")
        }
    })
}

/// Parse a string literal body (handling escape sequences).
fn parse_string(s: &str, pos: usize) -> Result<String, LexError> {
    let mut result = String::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            result.push(parse_escape(&mut chars, pos)?);
        } else {
            result.push(c);
        }
    }

    Ok(result)
}

/// Parse an escape sequence.
fn parse_escape(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, pos: usize) -> Result<char, LexError> {
    match chars.next() {
        Some('n') => Ok('\n'),
        Some('r') => Ok('\r'),
        Some('t') => Ok('\t'),
        Some('b') => Ok('\u{8}'),
        Some('f') => Ok('\u{c}'),
        Some('v') => Ok('\u{b}'),
        Some('0') => Ok('\0'),
        Some('u') => parse_unicode_escape(chars, pos),
        // `\\`, `\'`, `\"` and any other escaped character stand for themselves
        Some(c) => Ok(c),
        None => Err(LexError::invalid_escape(pos)),
    }
}

/// Parse `\u{X..}` (1-6 hex digits) or `\uXXXX`.
fn parse_unicode_escape(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, pos: usize) -> Result<char, LexError> {
    let mut hex = String::new();
    if chars.peek() == Some(&'{') {
        chars.next();
        loop {
            match chars.next() {
                Some('}') => break,
                Some(c) if c.is_ascii_hexdigit() && hex.len() < 6 => hex.push(c),
                _ => return Err(LexError::invalid_escape(pos)),
            }
        }
    } else {
        for _ in 0..4 {
            match chars.next() {
                Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                _ => return Err(LexError::invalid_escape(pos)),
            }
        }
    }

    if hex.is_empty() {
        return Err(LexError::invalid_escape(pos));
    }

    let code_point = u32::from_str_radix(&hex, 16).map_err(|_| LexError::invalid_escape(pos))?;
    char::from_u32(code_point).ok_or(LexError::invalid_escape(pos))
}

/// A lexer error with location and message.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct LexError {
    pub span: Span,
    pub message: String,
}

impl LexError {
    fn unexpected_char(ch: char, pos: usize) -> Self {
        let message = if ch == '\'' || ch == '"' {
            "Invalid or unexpected token".to_string()
        } else {
            format!("Invalid or unexpected token '{}'", ch)
        };
        Self {
            span: Span::new(pos, pos + ch.len_utf8()),
            message,
        }
    }

    fn invalid_escape(pos: usize) -> Self {
        Self {
            span: Span::new(pos, pos + 1),
            message: "Invalid escape sequence".to_string(),
        }
    }

    fn invalid_number(start: usize, end: usize) -> Self {
        Self {
            span: Span::new(start, end),
            message: "Invalid number".to_string(),
        }
    }
}
