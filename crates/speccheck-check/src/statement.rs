// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Line classification.

/// One statement of a block. The payload is code, except for the
/// message/code forms whose payload is compared as literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `> code`
    Input(String),
    /// Any unprefixed line: an expression expected to equal the result
    Output(String),
    /// `Resolve: code`
    Resolve(String),
    /// `Reject: code`
    Reject(String),
    /// `Reject error: message`
    RejectError(String),
    /// `Reject error code: code`
    RejectErrorCode(String),
    /// `Error: message`
    Error(String),
    /// `Error code: code`
    ErrorCode(String),
}

impl Statement {
    pub fn payload(&self) -> &str {
        match self {
            Statement::Input(s)
            | Statement::Output(s)
            | Statement::Resolve(s)
            | Statement::Reject(s)
            | Statement::RejectError(s)
            | Statement::RejectErrorCode(s)
            | Statement::Error(s)
            | Statement::ErrorCode(s) => s,
        }
    }

    pub(crate) fn payload_mut(&mut self) -> &mut String {
        match self {
            Statement::Input(s)
            | Statement::Output(s)
            | Statement::Resolve(s)
            | Statement::Reject(s)
            | Statement::RejectError(s)
            | Statement::RejectErrorCode(s)
            | Statement::Error(s)
            | Statement::ErrorCode(s) => s,
        }
    }

    /// Lower-case kind name used in messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::Input(_) => "input",
            Statement::Output(_) => "output",
            Statement::Resolve(_) => "resolve",
            Statement::Reject(_) => "reject",
            Statement::RejectError(_) => "reject error",
            Statement::RejectErrorCode(_) => "reject error code",
            Statement::Error(_) => "error",
            Statement::ErrorCode(_) => "error code",
        }
    }

    /// Whether continuation lines may extend this statement. The literal
    /// message/code forms cannot be continued.
    pub fn accepts_continuation(&self) -> bool {
        !matches!(
            self,
            Statement::RejectError(_) | Statement::RejectErrorCode(_) | Statement::Error(_) | Statement::ErrorCode(_)
        )
    }
}

/// A classified line: a statement or a continuation of the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Statement(Statement),
    Continuation(String),
}

/// Prefixes in match order; the first that matches wins.
const PREFIXES: &[(&str, fn(String) -> Line)] = &[
    ("> ", |s| Line::Statement(Statement::Input(s))),
    ("Resolve: ", |s| Line::Statement(Statement::Resolve(s))),
    ("Reject: ", |s| Line::Statement(Statement::Reject(s))),
    ("Reject error: ", |s| Line::Statement(Statement::RejectError(s))),
    ("Reject error code: ", |s| Line::Statement(Statement::RejectErrorCode(s))),
    ("Error: ", |s| Line::Statement(Statement::Error(s))),
    ("Error code: ", |s| Line::Statement(Statement::ErrorCode(s))),
    ("... ", Line::Continuation),
];

/// Classify one raw line. Every line classifies: anything without a known
/// prefix is an [`Statement::Output`] holding the whole line.
pub fn classify(line: &str) -> Line {
    for (prefix, build) in PREFIXES {
        if let Some(rest) = line.strip_prefix(prefix) {
            return build(rest.to_string());
        }
    }
    Line::Statement(Statement::Output(line.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement(line: &str) -> Statement {
        match classify(line) {
            Line::Statement(s) => s,
            Line::Continuation(rest) => panic!("{:?} classified as continuation {:?}", line, rest),
        }
    }

    #[test]
    fn prefixes() {
        assert_eq!(statement("> 1 + 1"), Statement::Input("1 + 1".into()));
        assert_eq!(statement("Resolve: 42"), Statement::Resolve("42".into()));
        assert_eq!(statement("Reject: 'no'"), Statement::Reject("'no'".into()));
        assert_eq!(statement("Reject error: boom"), Statement::RejectError("boom".into()));
        assert_eq!(statement("Reject error code: E1"), Statement::RejectErrorCode("E1".into()));
        assert_eq!(statement("Error: boom"), Statement::Error("boom".into()));
        assert_eq!(statement("Error code: E2"), Statement::ErrorCode("E2".into()));
        assert_eq!(classify("... + 1"), Line::Continuation("+ 1".into()));
    }

    #[test]
    fn everything_else_is_output() {
        assert_eq!(statement("2"), Statement::Output("2".into()));
        assert_eq!(statement(""), Statement::Output("".into()));
        // Prefixes are case-sensitive and need their trailing space
        assert_eq!(statement(">1"), Statement::Output(">1".into()));
        assert_eq!(statement("error: x"), Statement::Output("error: x".into()));
        assert_eq!(statement("...x"), Statement::Output("...x".into()));
    }

    #[test]
    fn payloads_are_not_trimmed() {
        assert_eq!(statement(">  spaced  "), Statement::Input(" spaced  ".into()));
        assert_eq!(statement("  2"), Statement::Output("  2".into()));
    }

    #[test]
    fn kind_names() {
        assert_eq!(statement("Reject error code: x").kind_name(), "reject error code");
        assert!(!statement("Error: x").accepts_continuation());
        assert!(statement("Resolve: x").accepts_continuation());
    }
}
