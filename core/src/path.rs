//! Locations inside a data tree.

use std::fmt;

/// One step from a container to a child value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object key.
    Key(String),
    /// Array index.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Path from a root to a nested value, rendered as dot-separated segments
/// (`foo.1.bar`). The root itself renders as an empty string.
///
/// # Examples
///
/// ```
/// use fastextend_core::{PathSegment, TreePath};
///
/// let path = TreePath::from_iter([
///     PathSegment::Key("foo".into()),
///     PathSegment::Index(1),
///     PathSegment::Key("bar".into()),
/// ]);
/// assert_eq!(path.to_string(), "foo.1.bar");
/// assert!(TreePath::root().is_root());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreePath {
    segments: Vec<PathSegment>,
}

impl TreePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }

    /// Prepends a parent segment while an error unwinds toward the root.
    pub(crate) fn prepend(&mut self, segment: PathSegment) {
        self.segments.insert(0, segment);
    }
}

impl FromIterator<PathSegment> for TreePath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            if position > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
