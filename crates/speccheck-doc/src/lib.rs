// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Markdown document model for speccheck.
//!
//! A document is split into raw text, fenced code blocks and marker
//! paragraphs. Every node keeps its original bytes, so rendering a parsed
//! document reproduces the input exactly; only inserted markers add text.
//!
//! ```markdown
//! ```js
//! > 1 + 1
//! 2
//! ```
//!
//! ✅ `speccheck`ed
//! ```

mod document;
mod fence;
mod marker;

pub use document::{CodeBlock, Document, Node};
pub use marker::{Marker, MarkerKind, FAIL_PREFIX, PASS_PREFIX, PASS_TEXT};
