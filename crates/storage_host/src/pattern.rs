//! Key pattern language used by pattern invalidation.
//!
//! A pattern is matched against the whole logical key. `*` matches zero or more characters; every
//! other character, including `?`, `[`, `.` and `\`, matches itself. There is no escape syntax, so
//! a literal `*` in a key can only be matched by a wildcard.

/// Wildcard token recognised by [`KeyPattern`].
pub const WILDCARD: char = '*';

#[derive(Debug, Clone, PartialEq, Eq)]
/// Parsed anchored wildcard pattern.
pub struct KeyPattern {
    source: String,
    /// Literal runs between wildcards. `segments.len() == wildcard count + 1`.
    segments: Vec<String>,
}

impl KeyPattern {
    /// Parses a pattern string. Parsing cannot fail; all non-`*` text is literal.
    pub fn new(pattern: impl Into<String>) -> Self {
        let source = pattern.into();
        let segments = source.split(WILDCARD).map(str::to_string).collect();
        Self { source, segments }
    }

    /// Pattern matching every key with the given literal prefix.
    pub fn prefix(prefix: &str) -> Self {
        Self::new(format!("{prefix}{WILDCARD}"))
    }

    /// Returns the original pattern text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns whether the pattern contains no wildcard.
    pub fn is_literal(&self) -> bool {
        self.segments.len() == 1
    }

    /// Tests `key` against the pattern as an anchored full-key match.
    pub fn matches(&self, key: &str) -> bool {
        let (first, rest) = match self.segments.split_first() {
            Some(split) => split,
            None => return key.is_empty(),
        };
        let Some(mut remaining) = key.strip_prefix(first.as_str()) else {
            return false;
        };
        let Some((last, middle)) = rest.split_last() else {
            return remaining.is_empty();
        };

        for segment in middle {
            match remaining.find(segment.as_str()) {
                Some(at) => remaining = &remaining[at + segment.len()..],
                None => return false,
            }
        }
        remaining.ends_with(last.as_str())
    }
}

impl From<&str> for KeyPattern {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}

impl std::fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}
