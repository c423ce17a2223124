//! Segment-based path matching.
//!
//! # Responsibilities
//! - Compile a route pattern into literal and parameter segments
//! - Match a request path against a compiled pattern
//! - Extract named parameters on success
//!
//! # Design Decisions
//! - Leading and trailing `/` are ignored on both sides
//! - Segment counts must be equal (no wildcards, no optional segments)
//! - Literal segments compare byte-for-byte, case-sensitive
//! - A failed match never yields partial bindings
//! - No regex, no shared state: matching is a pure function

use crate::routing::params::PathParams;

/// Marker that turns a pattern segment into a named capture.
pub const PARAM_MARKER: char = ':';

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A route pattern compiled at registration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a pattern such as `/users/:id/posts`.
    pub fn parse(pattern: &str) -> Self {
        let segments = split_segments(pattern)
            .map(|s| match s.strip_prefix(PARAM_MARKER) {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();

        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    /// The pattern string as registered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of parameter segments in the pattern.
    pub fn param_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Param(_)))
            .count()
    }

    /// Match `path` against this pattern, returning the bindings on success.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let parts: Vec<&str> = split_segments(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::with_capacity(self.param_count());
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Param(name) => params.bind(name, part),
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
            }
        }

        Some(params)
    }
}

/// Match a single pattern string against a path.
///
/// Equivalent to `PathPattern::parse(pattern).matches(path)`; the router
/// compiles patterns once at registration and calls [`PathPattern::matches`].
pub fn match_path(pattern: &str, path: &str) -> Option<PathParams> {
    PathPattern::parse(pattern).matches(path)
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.trim_matches('/');
    // "/" and "" both mean zero segments.
    let first = if trimmed.is_empty() { None } else { Some(trimmed) };
    first.into_iter().flat_map(|t| t.split('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_match() {
        let params = match_path("/hello", "/hello").unwrap();
        assert!(params.is_empty());

        assert!(match_path("/hello", "/goodbye").is_none());
    }

    #[test]
    fn literals_are_case_sensitive() {
        assert!(match_path("/Hello", "/hello").is_none());
    }

    #[test]
    fn binds_parameters() {
        let params = match_path("/users/:id/posts/:post", "/users/42/posts/hello-world").unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.get("post"), Some("hello-world"));
    }

    #[test]
    fn separators_are_trimmed() {
        assert!(match_path("hello/", "/hello").is_some());
        assert!(match_path("/hello", "hello//").is_some());
        assert!(match_path("/", "").is_some());
        assert!(match_path("", "/").is_some());
    }

    #[test]
    fn root_does_not_match_non_root() {
        assert!(match_path("/", "/a").is_none());
        assert!(match_path("/:id", "/").is_none());
    }

    #[test]
    fn segment_count_mismatch_never_matches() {
        assert!(match_path("/a/:id", "/a").is_none());
        assert!(match_path("/a/:id", "/a/1/2").is_none());
        assert!(match_path("/:x/:y", "/only-one").is_none());
        assert!(match_path("/:x", "/one/two").is_none());
    }

    #[test]
    fn failed_match_has_no_partial_bindings() {
        // First segment binds before the literal mismatch is found.
        assert_eq!(match_path("/:id/edit", "/7/view"), None);
    }

    #[test]
    fn interior_empty_segments_are_kept() {
        assert!(match_path("/a/b", "/a//b").is_none());
        let params = match_path("/a/:gap/b", "/a//b").unwrap();
        assert_eq!(params.get("gap"), Some(""));
    }

    #[test]
    fn matching_is_deterministic() {
        let pattern = PathPattern::parse("/files/:name");
        let first = pattern.matches("/files/report.txt");
        let second = pattern.matches("/files/report.txt");
        assert_eq!(first, second);
        assert_eq!(first.unwrap().get("name"), Some("report.txt"));
    }

    #[test]
    fn pattern_metadata() {
        let pattern = PathPattern::parse("/a/:b/c/:d");
        assert_eq!(pattern.as_str(), "/a/:b/c/:d");
        assert_eq!(pattern.param_count(), 2);
    }

    #[test]
    fn every_literal_equal_path_binds_exactly_the_params() {
        let cases = [
            ("/a/:x/c", "/a/1/c", vec![("x", "1")]),
            ("/:p/:q", "/left/right", vec![("p", "left"), ("q", "right")]),
            ("/static/path", "/static/path", vec![]),
        ];

        for (pattern, path, expected) in cases {
            let params = match_path(pattern, path).unwrap();
            assert_eq!(params.len(), expected.len(), "{pattern} vs {path}");
            for (name, value) in expected {
                assert_eq!(params.get(name), Some(value));
            }
        }
    }
}
