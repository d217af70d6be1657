// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Executable documentation checks.
//!
//! Fenced code blocks tagged `js` or `javascript` hold a small line-based
//! language of inputs and expectations. Each block is run against a scope
//! shared by the whole document, and a pass or fail marker is inserted
//! after it.
//!
//! # Line Format
//!
//! ```text
//! > <code>                   input: evaluate and keep the result
//! Resolve: <code>            result settles fulfilled with <code>'s value
//! Reject: <code>             result settles rejected with <code>'s value
//! Reject error: <message>    result settles rejected with this message
//! Reject error code: <code>  result settles rejected with this errorCode
//! Error: <message>           input raised an error with this message
//! Error code: <code>         input raised an error with this code
//! ... <more>                 continues the previous input or expression
//! <code>                     result deep-equals <code>'s value
//! ```
//!
//! The [`Evaluator`] trait is the only thing the engine knows about the
//! language being checked; [`speccheck_interp::Interpreter`] implements it.

mod annotate;
mod assemble;
mod compare;
mod config;
mod engine;
mod error;
mod evaluator;
mod report;
mod statement;

pub use annotate::marker_for;
pub use assemble::parse_block;
pub use config::CheckConfig;
pub use engine::Engine;
pub use error::CheckError;
pub use evaluator::{Evaluator, Settled};
pub use report::{BlockResult, Report, Verdict};
pub use statement::{classify, Line, Statement};
