//! Path normalization and pattern matching.
//!
//! Patterns are absolute paths whose segments are either literals,
//! parameters (`:name`) or, as the final segment only, the catch-all `*`.
//!
//! Pattern: "/products/:id"
//! Path: "/products/42"
//! Result: Some(PathMatch { params: {"id": "42"}, .. })

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Path separator.
pub const SEPARATOR: char = '/';

/// Marker that opens a parameter segment.
pub const PARAM_MARKER: char = ':';

/// Reserved segment matching any remaining path (not-found fallback only).
pub const CATCH_ALL: &str = "*";

/// Parameter name captured by the catch-all segment.
pub const CATCH_ALL_PARAM: &str = "*";

/// Regex for valid parameter names.
///
/// # Panics
///
/// Panics if the hard-coded regex literal is invalid (impossible in practice).
#[allow(clippy::expect_used)]
static VALID_PARAM_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("valid regex literal"));

/// Collapse repeated separators and force a leading separator.
///
/// Trailing separators are kept; use [`normalize_path`] for canonical paths.
pub fn collapse_separators(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 1);
    out.push(SEPARATOR);
    for ch in raw.chars() {
        if ch == SEPARATOR && out.ends_with(SEPARATOR) {
            continue;
        }
        out.push(ch);
    }
    out
}

/// Canonical form of a path: collapsed separators, leading separator,
/// no trailing separator except for the root.
pub fn normalize_path(raw: &str) -> String {
    let mut out = collapse_separators(raw);
    while out.len() > 1 && out.ends_with(SEPARATOR) {
        out.pop();
    }
    out
}

/// Join a relative child fragment to its parent with exactly one separator.
pub fn join_paths(parent: &str, child: &str) -> String {
    normalize_path(&format!("{parent}{SEPARATOR}{child}"))
}

/// Prefix handed to the children of a node: the node's path with a
/// trailing separator.
pub fn child_prefix(prefix: &str, path: &str) -> String {
    collapse_separators(&format!("{prefix}{path}{SEPARATOR}"))
}

/// Non-empty segments of a concrete path.
pub fn segments(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty()).collect()
}

/// One segment of a parsed pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    CatchAll,
}

/// A parsed route pattern.
///
/// A malformed pattern (empty or invalid parameter name, catch-all that is
/// not the final whole segment) is kept but never matches anything, so a
/// typo degrades to "route not found" instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Option<Vec<Segment>>,
}

/// Result of matching a concrete path against a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch {
    /// The normalized portion of the concrete path consumed by the pattern.
    pub pathname: String,
    /// Parameters extracted (e.g., {"id": "42"}).
    pub params: BTreeMap<String, String>,
    /// Segments left over after a prefix match (empty for exact matches).
    pub remainder: String,
}

impl PathPattern {
    /// Parse a pattern. Never fails; see [`PathPattern::is_malformed`].
    pub fn parse(pattern: &str) -> Self {
        let raw = normalize_path(pattern);
        let parts = segments(&raw);
        let last = parts.len().saturating_sub(1);

        let mut parsed = Vec::with_capacity(parts.len());
        for (idx, part) in parts.iter().enumerate() {
            let segment = if *part == CATCH_ALL {
                if idx != last {
                    return Self {
                        raw,
                        segments: None,
                    };
                }
                Segment::CatchAll
            } else if let Some(name) = part.strip_prefix(PARAM_MARKER) {
                if !VALID_PARAM_NAME.is_match(name) {
                    return Self {
                        raw,
                        segments: None,
                    };
                }
                Segment::Param(name.to_string())
            } else if part.contains(CATCH_ALL) || part.contains(PARAM_MARKER) {
                return Self {
                    raw,
                    segments: None,
                };
            } else {
                Segment::Literal((*part).to_string())
            };
            parsed.push(segment);
        }

        Self {
            raw,
            segments: Some(parsed),
        }
    }

    /// The normalized pattern text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the pattern contains a malformed marker.
    pub fn is_malformed(&self) -> bool {
        self.segments.is_none()
    }

    /// Whether the pattern ends in the catch-all segment.
    pub fn is_catch_all(&self) -> bool {
        matches!(
            self.segments.as_deref().and_then(<[Segment]>::last),
            Some(Segment::CatchAll)
        )
    }

    /// Exact match: the whole path must match the whole pattern.
    pub fn matches(&self, path: &str) -> Option<PathMatch> {
        self.match_segments(path, true)
    }

    /// Prefix match: the pattern must match a leading run of whole segments.
    pub fn match_prefix(&self, path: &str) -> Option<PathMatch> {
        self.match_segments(path, false)
    }

    fn match_segments(&self, path: &str, end: bool) -> Option<PathMatch> {
        let pattern = self.segments.as_ref()?;
        let normalized = normalize_path(path);
        let concrete = segments(&normalized);

        let mut params = BTreeMap::new();
        let mut consumed = 0;

        for segment in pattern {
            match segment {
                Segment::CatchAll => {
                    params.insert(CATCH_ALL_PARAM.to_string(), concrete[consumed..].join("/"));
                    consumed = concrete.len();
                }
                Segment::Param(name) => {
                    let actual = concrete.get(consumed)?;
                    params.insert(name.clone(), (*actual).to_string());
                    consumed += 1;
                }
                Segment::Literal(literal) => {
                    if concrete.get(consumed) != Some(&literal.as_str()) {
                        return None;
                    }
                    consumed += 1;
                }
            }
        }

        if end && consumed != concrete.len() {
            return None;
        }

        Some(PathMatch {
            pathname: normalize_path(&concrete[..consumed].join("/")),
            params,
            remainder: concrete[consumed..].join("/"),
        })
    }
}

/// Exact-match a concrete path against a pattern string.
pub fn match_path(pattern: &str, path: &str) -> Option<PathMatch> {
    PathPattern::parse(pattern).matches(path)
}
