// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Abstract Syntax Tree types for the speccheck evaluation language.
//!
//! The evaluation language is a small JavaScript-flavoured expression
//! language. This crate defines the nodes shared between the lexer, the
//! parser and the interpreter.

pub mod span;
pub mod token;
pub mod expr;
pub mod stmt;

pub use span::{LineMap, Span};
