//! Wildcard patterns over `source.type` routing keys.
//!
//! A pattern compiles into a lower-cased prefix/suffix pair:
//!
//! | Pattern         | Prefix   | Suffix         |
//! |-----------------|----------|----------------|
//! | `*`             | `""`     | `""`           |
//! | `http.*`        | `http.`  | `""`           |
//! | `*.WorkerError` | `""`     | `.workererror` |
//! | `http.Stop`     | `http`   | `stop`         |
//!
//! A key matches when it is long enough to hold both halves, starts with the
//! prefix and ends with the suffix. Patterns without a `*` are split at the
//! first `.`, which is then part of neither half, so `http.Stop` also accepts
//! `http.NonStop` and `httpStop`.

use std::str::FromStr;

use crate::error::{BusError, BusResult};

/// A compiled, case-insensitive subscription pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    prefix: String,
    suffix: String,
}

impl Pattern {
    /// Compile a pattern string.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::InvalidPattern`] if the pattern contains neither
    /// `*` nor `.`.
    pub fn compile(pattern: &str) -> BusResult<Self> {
        let normalized = pattern.to_lowercase();

        let (prefix, suffix) = normalized
            .split_once('*')
            .or_else(|| normalized.split_once('.'))
            .ok_or_else(|| BusError::InvalidPattern {
                pattern: pattern.to_string(),
            })?;

        Ok(Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })
    }

    /// Text a key must start with (lower case).
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Text a key must end with (lower case).
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Check a routing key against this pattern, ignoring case.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        self.matches_lowercase(&key.to_lowercase())
    }

    /// Same as [`matches`](Self::matches) for a key that is already lower case.
    pub(crate) fn matches_lowercase(&self, key: &str) -> bool {
        key.len() >= self.prefix.len().saturating_add(self.suffix.len())
            && key.starts_with(&self.prefix)
            && key.ends_with(&self.suffix)
    }
}

impl FromStr for Pattern {
    type Err = BusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_wildcard_forms() {
        let all = Pattern::compile("*").unwrap();
        assert_eq!((all.prefix(), all.suffix()), ("", ""));

        let source = Pattern::compile("http.*").unwrap();
        assert_eq!((source.prefix(), source.suffix()), ("http.", ""));

        let kind = Pattern::compile("*.WorkerError").unwrap();
        assert_eq!((kind.prefix(), kind.suffix()), ("", ".workererror"));
    }

    #[test]
    fn test_compile_splits_at_first_star() {
        let p = Pattern::compile("a*b*c").unwrap();
        assert_eq!((p.prefix(), p.suffix()), ("a", "b*c"));
    }

    #[test]
    fn test_compile_literal_splits_at_first_dot() {
        let p = Pattern::compile("HTTP.Worker.Error").unwrap();
        assert_eq!((p.prefix(), p.suffix()), ("http", "worker.error"));
    }

    #[test]
    fn test_compile_rejects_plain_word() {
        let err = Pattern::compile("invalid").unwrap_err();
        assert_eq!(
            err,
            BusError::InvalidPattern {
                pattern: "invalid".to_string()
            }
        );
    }

    #[test]
    fn test_star_matches_everything() {
        let p = Pattern::compile("*").unwrap();
        assert!(p.matches("http.WorkerError"));
        assert!(p.matches("rpc.Start"));
        assert!(p.matches("x"));
    }

    #[test]
    fn test_source_wildcard() {
        let p = Pattern::compile("http.*").unwrap();
        assert!(p.matches("http.WorkerError"));
        assert!(!p.matches("rpc.WorkerError"));
        assert!(!p.matches("https.WorkerError"));
    }

    #[test]
    fn test_type_wildcard() {
        let p = Pattern::compile("*.WorkerError").unwrap();
        assert!(p.matches("http.WorkerError"));
        assert!(p.matches("rpc.WorkerError"));
        assert!(!p.matches("http.Other"));
    }

    #[test]
    fn test_matching_ignores_case() {
        let p = Pattern::compile("HTTP.*").unwrap();
        assert!(p.matches("http.WorkerError"));
        assert!(p.matches("Http.workererror"));
    }

    #[test]
    fn test_literal_pattern_keeps_loose_middle() {
        let p = Pattern::compile("source.type").unwrap();
        assert!(p.matches("source.type"));
        assert!(p.matches("sourcetype"));
        assert!(p.matches("source.subtype"));
        assert!(!p.matches("other.type"));
        assert!(!p.matches("source.typeextra"));
    }

    #[test]
    fn test_length_guard_rejects_overlap() {
        // "ab" starts with "ab" and ends with "b", but cannot hold both halves.
        let p = Pattern::compile("ab*b").unwrap();
        assert!(!p.matches("ab"));
        assert!(p.matches("abb"));
    }

    #[test]
    fn test_from_str() {
        let p: Pattern = "rpc.*".parse().unwrap();
        assert!(p.matches("rpc.Stop"));
        assert!("nodot".parse::<Pattern>().is_err());
    }
}
