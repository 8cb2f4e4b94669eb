use crate::error::{ErrorOrigin, StoreError};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// TreePath
///
/// A slash-delimited hierarchy location as an immutable segment sequence.
/// Paths only answer membership and intersection questions; they are never
/// mutated after construction.
///
/// There is no escaping rule for a literal separator inside a segment, so
/// `from_segments` rejects one outright rather than mis-splitting later.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct TreePath {
    segments: Vec<String>,
    separator: char,
}

impl TreePath {
    pub const DEFAULT_SEPARATOR: char = '/';

    /// Split a path string on the default separator. Leading, trailing, and
    /// doubled separators contribute no segments.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        Self::parse_with(path, Self::DEFAULT_SEPARATOR)
    }

    /// Split a path string on a configurable separator.
    #[must_use]
    pub fn parse_with(path: &str, separator: char) -> Self {
        let segments = path
            .split(separator)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            segments,
            separator,
        }
    }

    /// Build a path from pre-split segments, rejecting empty segments and
    /// segments containing the separator.
    pub fn from_segments<S, I>(segments: I, separator: char) -> Result<Self, StoreError>
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        for segment in &segments {
            if segment.is_empty() {
                return Err(StoreError::data(ErrorOrigin::Path, "empty path segment"));
            }
            if segment.contains(separator) {
                return Err(StoreError::data(
                    ErrorOrigin::Path,
                    format!("segment contains separator {separator:?}: {segment}"),
                ));
            }
        }

        Ok(Self {
            segments,
            separator,
        })
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub const fn separator(&self) -> char {
        self.separator
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Exact segment membership.
    #[must_use]
    pub fn contains(&self, segment: &str) -> bool {
        self.segments.iter().any(|candidate| candidate == segment)
    }

    /// Predicate test against the joined path string.
    #[must_use]
    pub fn contains_match(&self, predicate: impl Fn(&str) -> bool) -> bool {
        predicate(&self.join())
    }

    /// The canonical string form: segments joined by the separator.
    #[must_use]
    pub fn join(&self) -> String {
        self.segments.join(&self.separator.to_string())
    }

    /// True when every segment of `self` prefixes `other` and `other` is
    /// strictly deeper.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.len() < other.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| a == b)
    }

    /// The segment sequence common to both paths: their longest shared
    /// prefix.
    ///
    /// When `inclusive` is false and one path is fully contained in the
    /// other, the coinciding edge segment is structural - the ancestor's
    /// leaf (or its root, for a single-segment ancestor) links the two
    /// paths rather than describing shared content - and is dropped.
    #[must_use]
    pub fn intersect(&self, other: &Self, inclusive: bool) -> Vec<String> {
        let mut common: Vec<String> = self
            .segments
            .iter()
            .zip(&other.segments)
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a.clone())
            .collect();

        if !inclusive && (common.len() == self.len() || common.len() == other.len()) {
            common.pop();
        }

        common
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.join())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;

    #[test]
    fn parse_drops_empty_segments() {
        let path = TreePath::parse("/a/b/c/");
        assert_eq!(path.segments(), ["a", "b", "c"]);
        assert_eq!(TreePath::parse("//a//b").segments(), ["a", "b"]);
        assert!(TreePath::parse("/").is_empty());
    }

    #[test]
    fn parse_with_custom_separator() {
        let path = TreePath::parse_with("x.y.z", '.');
        assert_eq!(path.segments(), ["x", "y", "z"]);
        assert_eq!(path.join(), "x.y.z");
    }

    #[test]
    fn from_segments_rejects_embedded_separator() {
        let err = TreePath::from_segments(["a", "b/c"], '/').unwrap_err();
        assert_eq!(err.class, ErrorClass::Data);

        let err = TreePath::from_segments(["a", ""], '/').unwrap_err();
        assert_eq!(err.class, ErrorClass::Data);

        let path = TreePath::from_segments(["a", "b/c"], '.').unwrap();
        assert_eq!(path.segments(), ["a", "b/c"]);
    }

    #[test]
    fn membership_and_pattern_tests() {
        let path = TreePath::parse("/a/b/c");
        assert!(path.contains("b"));
        assert!(!path.contains("d"));
        assert!(path.contains_match(|joined| joined.starts_with("a/b")));
        assert!(!path.contains_match(|joined| joined.contains("x")));
    }

    #[test]
    fn intersect_siblings_keeps_shared_prefix() {
        let left = TreePath::parse("/a/b/c");
        let right = TreePath::parse("/a/b/d");

        assert_eq!(left.intersect(&right, false), ["a", "b"]);
        assert_eq!(left.intersect(&right, true), ["a", "b"]);
    }

    #[test]
    fn intersect_ancestor_descendant_drops_link_segment_when_exclusive() {
        let parent = TreePath::parse("/a/b");
        let child = TreePath::parse("/a/b/c");

        assert_eq!(parent.intersect(&child, true), ["a", "b"]);
        assert_eq!(
            parent.intersect(&child, false),
            ["a"],
            "the ancestor's leaf is structural, not content"
        );

        let root = TreePath::parse("/a");
        assert!(root.intersect(&child, false).is_empty());
        assert_eq!(root.intersect(&child, true), ["a"]);
    }

    #[test]
    fn intersect_disjoint_paths_is_empty() {
        let left = TreePath::parse("/x/y");
        let right = TreePath::parse("/a/b");
        assert!(left.intersect(&right, true).is_empty());
        assert!(left.intersect(&right, false).is_empty());
    }

    #[test]
    fn ancestry_is_strict() {
        let parent = TreePath::parse("/a/b");
        let child = TreePath::parse("/a/b/c");

        assert!(parent.is_ancestor_of(&child));
        assert!(!child.is_ancestor_of(&parent));
        assert!(!parent.is_ancestor_of(&parent.clone()));
        assert!(!TreePath::parse("/a/x").is_ancestor_of(&child));
    }
}
