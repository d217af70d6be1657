// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Code fence recognition.

/// An opening code fence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fence {
    /// Leading spaces before the fence characters (0-3)
    pub indent: usize,
    /// '`' or '~'
    pub ch: char,
    /// Number of fence characters (at least 3)
    pub len: usize,
    /// Info string after the fence, trimmed
    pub info: String,
}

impl Fence {
    /// Recognize an opening fence line (line ending already removed).
    pub fn open(line: &str) -> Option<Fence> {
        let indent = line.len() - line.trim_start_matches(' ').len();
        if indent > 3 {
            return None;
        }
        let rest = &line[indent..];
        let ch = rest.chars().next().filter(|c| *c == '`' || *c == '~')?;
        let len = rest.chars().take_while(|c| *c == ch).count();
        if len < 3 {
            return None;
        }
        let info = rest[len..].trim();
        // A backtick fence's info string cannot contain backticks
        if ch == '`' && info.contains('`') {
            return None;
        }
        Some(Fence { indent, ch, len, info: info.to_string() })
    }

    /// Whether `line` closes this fence.
    pub fn is_closed_by(&self, line: &str) -> bool {
        let indent = line.len() - line.trim_start_matches(' ').len();
        if indent > 3 {
            return false;
        }
        let rest = &line[indent..];
        let run = rest.chars().take_while(|c| *c == self.ch).count();
        run >= self.len && rest[run * self.ch.len_utf8()..].trim().is_empty()
    }

    /// First word of the info string.
    pub fn lang(&self) -> Option<&str> {
        self.info.split_whitespace().next()
    }
}

/// Strip the line terminator (`\n` or `\r\n`).
pub(crate) fn trim_eol(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_fences() {
        let fence = Fence::open("```js").unwrap();
        assert_eq!((fence.ch, fence.len, fence.lang()), ('`', 3, Some("js")));
        let fence = Fence::open("  ~~~~ javascript title=x").unwrap();
        assert_eq!((fence.indent, fence.ch, fence.len), (2, '~', 4));
        assert_eq!(fence.lang(), Some("javascript"));
        assert_eq!(Fence::open("```").unwrap().lang(), None);

        assert!(Fence::open("``js").is_none());
        assert!(Fence::open("    ```js").is_none());
        assert!(Fence::open("```js `x`").is_none());
        assert!(Fence::open("text").is_none());
    }

    #[test]
    fn closing_fences() {
        let fence = Fence::open("````js").unwrap();
        assert!(fence.is_closed_by("````"));
        assert!(fence.is_closed_by("`````  "));
        assert!(!fence.is_closed_by("```"));
        assert!(!fence.is_closed_by("```` js"));
        assert!(!fence.is_closed_by("~~~~"));
    }

    #[test]
    fn line_endings() {
        assert_eq!(trim_eol("a\r\n"), "a");
        assert_eq!(trim_eol("a\n"), "a");
        assert_eq!(trim_eol("a"), "a");
    }
}
