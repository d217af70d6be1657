// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Byte-preserving document tree.

use std::fmt;

use crate::fence::{trim_eol, Fence};
use crate::marker::Marker;

/// A top-level piece of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Anything that is not a code block or a marker
    Text(String),
    Code(CodeBlock),
    /// A marker paragraph; `raw` holds the separating blank line and the
    /// paragraph exactly as they appear in the document.
    Marker { marker: Marker, raw: String },
}

/// A fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Line of the opening fence (1-indexed)
    line: usize,
    fence: Fence,
    open: String,
    body: Vec<String>,
    /// `None` when the fence runs to the end of the document
    close: Option<String>,
}

impl CodeBlock {
    pub fn line(&self) -> usize {
        self.line
    }

    /// Language identifier: the first word of the info string.
    pub fn lang(&self) -> Option<&str> {
        self.fence.lang()
    }

    pub fn info(&self) -> &str {
        &self.fence.info
    }

    pub fn is_closed(&self) -> bool {
        self.close.is_some()
    }

    /// The code inside the fence: the opening fence's indentation removed
    /// from each line, line endings removed, lines joined with `\n`.
    pub fn value(&self) -> String {
        self.body
            .iter()
            .map(|line| {
                let line = trim_eol(line);
                let strip = line.len() - line.trim_start_matches(' ').len();
                &line[strip.min(self.fence.indent)..]
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn write_raw(&self, out: &mut String) {
        out.push_str(&self.open);
        for line in &self.body {
            out.push_str(line);
        }
        if let Some(close) = &self.close {
            out.push_str(close);
        }
    }

    /// Line ending used by the block.
    fn newline(&self) -> &'static str {
        if self.open.ends_with("\r\n") {
            "\r\n"
        } else {
            "\n"
        }
    }

    fn ends_with_newline(&self) -> bool {
        let last = self.close.as_ref().or(self.body.last()).unwrap_or(&self.open);
        last.ends_with('\n')
    }
}

/// A parsed markdown document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Split markdown source into nodes. Never fails: anything that is not
    /// a fenced code block or a marker after one is text.
    pub fn parse(source: &str) -> Self {
        let lines: Vec<&str> = source.split_inclusive('\n').collect();
        let mut nodes = Vec::new();
        let mut text = String::new();
        let mut i = 0;

        while i < lines.len() {
            let Some(fence) = Fence::open(trim_eol(lines[i])) else {
                text.push_str(lines[i]);
                i += 1;
                continue;
            };

            if !text.is_empty() {
                nodes.push(Node::Text(std::mem::take(&mut text)));
            }

            let line = i + 1;
            let open = lines[i].to_string();
            i += 1;

            let mut body = Vec::new();
            let mut close = None;
            while i < lines.len() {
                let current = lines[i];
                i += 1;
                if fence.is_closed_by(trim_eol(current)) {
                    close = Some(current.to_string());
                    break;
                }
                body.push(current.to_string());
            }

            let closed = close.is_some();
            nodes.push(Node::Code(CodeBlock { line, fence, open, body, close }));

            // Markers: a blank line, then a marker paragraph, repeated
            while closed && i + 1 < lines.len() && trim_eol(lines[i]).trim().is_empty() {
                let Some(marker) = Marker::parse(trim_eol(lines[i + 1])) else {
                    break;
                };
                let raw = format!("{}{}", lines[i], lines[i + 1]);
                nodes.push(Node::Marker { marker, raw });
                i += 2;
            }
        }

        if !text.is_empty() {
            nodes.push(Node::Text(text));
        }
        Document { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Code blocks with their node index.
    pub fn code_blocks(&self) -> impl Iterator<Item = (usize, &CodeBlock)> {
        self.nodes.iter().enumerate().filter_map(|(i, node)| match node {
            Node::Code(block) => Some((i, block)),
            _ => None,
        })
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Marker { marker, .. } => Some(marker),
            _ => None,
        })
    }

    /// Remove every marker. Returns how many were removed.
    pub fn strip_markers(&mut self) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|node| !matches!(node, Node::Marker { .. }));
        before - self.nodes.len()
    }

    /// Insert `marker` directly after the code block at node `index`,
    /// separated from it and from what follows by blank lines. Returns
    /// false, inserting nothing, if `index` is not a code block.
    pub fn insert_marker(&mut self, index: usize, marker: Marker) -> bool {
        let Some(Node::Code(block)) = self.nodes.get(index) else {
            return false;
        };
        let nl = block.newline();

        let mut raw = String::new();
        if !block.ends_with_newline() {
            raw.push_str(nl);
        }
        raw.push_str(nl);
        raw.push_str(marker.text());
        raw.push_str(nl);

        let needs_gap = match self.nodes.get(index + 1) {
            Some(Node::Text(text)) => !starts_with_blank_line(text),
            Some(Node::Code(_)) => true,
            Some(Node::Marker { .. }) | None => false,
        };
        if needs_gap {
            raw.push_str(nl);
        }

        self.nodes.insert(index + 1, Node::Marker { marker, raw });
        true
    }

    /// Serialize back to markdown.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Code(block) => block.write_raw(&mut out),
                Node::Marker { raw, .. } => out.push_str(raw),
            }
        }
        f.write_str(&out)
    }
}

fn starts_with_blank_line(text: &str) -> bool {
    text.split_inclusive('\n')
        .next()
        .map_or(true, |line| trim_eol(line).trim().is_empty())
}
