// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Run configuration.

/// Which blocks to check and how to treat existing markers.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Fence languages that are checked. Matching is case-sensitive.
    pub languages: Vec<String>,
    /// Remove markers left by an earlier run before checking.
    pub strip_markers: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        CheckConfig {
            languages: vec!["js".to_string(), "javascript".to_string()],
            strip_markers: false,
        }
    }
}

impl CheckConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also check blocks tagged `lang`.
    pub fn with_language(mut self, lang: impl Into<String>) -> Self {
        let lang = lang.into();
        if !self.languages.contains(&lang) {
            self.languages.push(lang);
        }
        self
    }

    pub fn with_strip_markers(mut self, strip: bool) -> Self {
        self.strip_markers = strip;
        self
    }

    pub fn is_checked(&self, lang: Option<&str>) -> bool {
        lang.is_some_and(|lang| self.languages.iter().any(|l| l == lang))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_languages() {
        let config = CheckConfig::default();
        assert!(config.is_checked(Some("js")));
        assert!(config.is_checked(Some("javascript")));
        assert!(!config.is_checked(Some("JS")));
        assert!(!config.is_checked(Some("rust")));
        assert!(!config.is_checked(None));
        assert!(!config.strip_markers);
    }

    #[test]
    fn builder() {
        let config = CheckConfig::new().with_language("mjs").with_language("js").with_strip_markers(true);
        assert_eq!(config.languages, vec!["js", "javascript", "mjs"]);
        assert!(config.strip_markers);
    }
}
