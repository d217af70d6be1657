// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Marker text for a verdict.

use speccheck_doc::Marker;

use crate::report::Verdict;

pub fn marker_for(verdict: &Verdict) -> Marker {
    match verdict {
        Verdict::Pass => Marker::pass(),
        Verdict::Fail(message) => Marker::fail(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use speccheck_doc::PASS_TEXT;

    #[test]
    fn pass_and_fail() {
        assert_eq!(marker_for(&Verdict::Pass).text(), PASS_TEXT);
        let fail = marker_for(&Verdict::Fail("1 + 1 => expected 3, but got 2".into()));
        assert_eq!(fail.text(), "❌ `Error: 1 + 1 => expected 3, but got 2`");
    }
}
