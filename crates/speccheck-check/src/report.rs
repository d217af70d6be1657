// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Per-block verdicts and the run summary.

use serde::Serialize;

use crate::error::CheckError;

/// Pass or fail of one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail(String),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    /// Diagnostic of a failing block.
    pub fn message(&self) -> Option<&str> {
        match self {
            Verdict::Pass => None,
            Verdict::Fail(message) => Some(message),
        }
    }
}

impl From<Result<(), CheckError>> for Verdict {
    fn from(result: Result<(), CheckError>) -> Self {
        match result {
            Ok(()) => Verdict::Pass,
            Err(err) => Verdict::Fail(err.to_string()),
        }
    }
}

/// Result of running a single block.
#[derive(Debug, Clone, Serialize)]
pub struct BlockResult {
    /// 1-based line of the block's opening fence
    pub line: usize,
    #[serde(flatten)]
    pub verdict: Verdict,
}

/// Everything a document run produced, in document order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub blocks: Vec<BlockResult>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl Report {
    pub fn add(&mut self, result: BlockResult) {
        self.total += 1;
        if result.verdict.is_pass() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.blocks.push(result);
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &BlockResult> {
        self.blocks.iter().filter(|b| !b.verdict.is_pass())
    }
}
