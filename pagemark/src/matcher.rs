//! Literal, case-insensitive term matching.
//!
//! A [`TermMatcher`] turns a raw search string into a pattern that behaves
//! as plain substring search: every regex metacharacter is escaped, and
//! matching is case-insensitive.

use regex::{Regex, RegexBuilder};

/// One piece of a text split at match boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text outside any match, kept verbatim.
    Plain(String),
    /// A matched occurrence, in its original casing.
    Matched(String),
}

/// A compiled, literal, case-insensitive matcher for one search term.
#[derive(Debug, Clone)]
pub struct TermMatcher {
    term: String,
    regex: Regex,
}

impl TermMatcher {
    /// Compiles a matcher from a raw search string.
    ///
    /// The input is trimmed; `None` is returned when nothing is left, which
    /// is how the public entry point rejects unusable terms.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let term = raw.trim();
        if term.is_empty() {
            return None;
        }
        let regex = RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
            .ok()?;
        Some(Self {
            term: term.to_string(),
            regex,
        })
    }

    /// The trimmed term. Cycle reuse compares this with exact equality.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Returns whether `text` contains the term as a case-insensitive
    /// substring.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Splits `text` into interleaved plain and matched segments at each
    /// non-overlapping occurrence. Trailing non-matching text is kept as a
    /// final plain segment; empty segments are never produced.
    #[must_use]
    pub fn segments(&self, text: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut last = 0;
        for found in self.regex.find_iter(text) {
            if found.start() > last {
                segments.push(Segment::Plain(text[last..found.start()].to_string()));
            }
            segments.push(Segment::Matched(found.as_str().to_string()));
            last = found.end();
        }
        if last < text.len() {
            segments.push(Segment::Plain(text[last..].to_string()));
        }
        segments
    }
}
