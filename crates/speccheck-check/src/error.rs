// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Block-level failures.

/// Why a block failed. Each one ends its block; none ends the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    /// The block's lines do not form a valid statement sequence.
    #[error("{0}")]
    Parse(String),

    /// The expected side of a comparison could not be evaluated.
    #[error("failed to eval output `{code}`: {message}")]
    Eval { code: String, message: String },

    /// Actual and expected differ.
    #[error("{input} => expected {expected}, but got {actual}")]
    Assertion {
        /// The input that produced the result
        input: String,
        expected: String,
        actual: String,
    },
}

impl CheckError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        CheckError::Parse(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(CheckError::parse("at least one input required").to_string(), "at least one input required");
        let eval = CheckError::Eval { code: "nope".into(), message: "nope is not defined".into() };
        assert_eq!(eval.to_string(), "failed to eval output `nope`: nope is not defined");
        let assertion = CheckError::Assertion { input: "1 + 1".into(), expected: "3".into(), actual: "2".into() };
        assert_eq!(assertion.to_string(), "1 + 1 => expected 3, but got 2");
    }
}
