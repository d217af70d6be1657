// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Folding continuation lines into statements.

use crate::error::CheckError;
use crate::statement::{classify, Line, Statement};

/// Split a block's text into statements, merging `... ` lines into the
/// statement before them.
///
/// Line endings are `\n`; a trailing `\r` left by CRLF input is dropped.
/// Neither the first-statement check nor any evaluation happens here.
pub fn parse_block(code: &str) -> Result<Vec<Statement>, CheckError> {
    let mut statements: Vec<Statement> = Vec::new();

    for raw in code.split('\n') {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        match classify(raw) {
            Line::Statement(statement) => statements.push(statement),
            Line::Continuation(rest) => {
                let Some(last) = statements.last_mut() else {
                    return Err(CheckError::parse(
                        "Continuation must be preceded by input or expected output",
                    ));
                };
                if !last.accepts_continuation() {
                    return Err(CheckError::parse(format!(
                        "Continuation is not supported for {}",
                        last.kind_name()
                    )));
                }
                let payload = last.payload_mut();
                *payload = format!("{} {}", payload.trim(), rest.trim());
            }
        }
    }

    Ok(statements)
}
