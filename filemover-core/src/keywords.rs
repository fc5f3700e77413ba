//! Keyword matching over calendar event text.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_KEYWORDS;

/// Returns true if any keyword occurs (case-insensitively) in the title or description.
pub fn matches(title: &str, description: &str, keywords: &[String]) -> bool {
    let text = format!("{title} {description}").to_lowercase();
    keywords
        .iter()
        .any(|keyword| text.contains(&keyword.to_lowercase()))
}

/// Ordered list of case-insensitive keywords. Duplicates are harmless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSet(Vec<String>);

impl Default for KeywordSet {
    fn default() -> Self {
        KeywordSet(DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect())
    }
}

impl KeywordSet {
    pub fn new(keywords: Vec<String>) -> Self {
        KeywordSet(keywords)
    }

    /// Parse comma-separated input, trimming entries and dropping empty ones.
    pub fn parse_list(input: &str) -> Self {
        KeywordSet(
            input
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn matches(&self, title: &str, description: &str) -> bool {
        matches(title, description, &self.0)
    }

    /// Append keywords not already present (compared case-insensitively).
    /// Returns how many were added.
    pub fn add<I, S>(&mut self, keywords: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for keyword in keywords {
            let keyword = keyword.as_ref().trim();
            if keyword.is_empty() || self.contains(keyword) {
                continue;
            }
            self.0.push(keyword.to_string());
            added += 1;
        }
        added
    }

    /// Remove every entry equal (case-insensitively) to one of `keywords`.
    /// Returns how many entries were removed.
    pub fn remove<I, S>(&mut self, keywords: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let targets: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .collect();
        let before = self.0.len();
        self.0.retain(|k| !targets.contains(&k.to_lowercase()));
        before - self.0.len()
    }

    fn contains(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.0.iter().any(|k| k.to_lowercase() == keyword)
    }
}

impl std::fmt::Display for KeywordSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}
