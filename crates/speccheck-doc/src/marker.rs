// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Pass/fail marker paragraphs.

/// Leading text of a pass marker.
pub const PASS_PREFIX: &str = "✅ ";
/// Leading text of a fail marker.
pub const FAIL_PREFIX: &str = "❌ ";
/// The complete pass marker paragraph.
pub const PASS_TEXT: &str = "✅ `speccheck`ed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Pass,
    Fail,
}

/// A one-line paragraph placed after a checked code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    kind: MarkerKind,
    /// Paragraph text without line ending
    text: String,
}

impl Marker {
    pub fn pass() -> Self {
        Marker { kind: MarkerKind::Pass, text: PASS_TEXT.to_string() }
    }

    /// A fail marker: ``❌ `Error: <message>` ``. Newlines in the message
    /// are folded to spaces so the marker stays one line.
    pub fn fail(message: &str) -> Self {
        let folded = message.replace("\r\n", " ").replace(['\n', '\r'], " ");
        let text = format!("{}{}", FAIL_PREFIX, inline_code(&format!("Error: {}", folded)));
        Marker { kind: MarkerKind::Fail, text }
    }

    /// Recognize a marker paragraph line (line ending already removed).
    pub fn parse(line: &str) -> Option<Self> {
        let kind = if line.starts_with(PASS_PREFIX) {
            MarkerKind::Pass
        } else if line.starts_with(FAIL_PREFIX) {
            MarkerKind::Fail
        } else {
            return None;
        };
        Some(Marker { kind, text: line.to_string() })
    }

    pub fn kind(&self) -> MarkerKind {
        self.kind
    }

    pub fn is_pass(&self) -> bool {
        self.kind == MarkerKind::Pass
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Wrap `content` in an inline code span, widening the backtick fence past
/// the longest backtick run inside it.
fn inline_code(content: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in content.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    let fence = "`".repeat(longest + 1);
    if content.starts_with('`') || content.ends_with('`') {
        format!("{fence} {content} {fence}")
    } else {
        format!("{fence}{content}{fence}")
    }
}
