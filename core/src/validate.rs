//! Pre-flight checks for merge sources.
//!
//! [`merge`](crate::merge) stops at the first unsupported value and keeps
//! whatever it already wrote. Scanning sources with [`check_mergeable`]
//! first lets a caller refuse the whole merge before touching the target.
//!
//! # Examples
//!
//! ```
//! use fastextend_core::*;
//!
//! let source = Tree::from(Object::from_iter([
//!     ("ok", Tree::from(1)),
//!     ("when", Tree::foreign("Date", "2015-02-01")),
//! ]));
//!
//! let problems = check_mergeable(&source);
//! assert_eq!(problems.len(), 1);
//! assert_eq!(problems[0].path.to_string(), "when");
//! assert_eq!(problems[0].type_name, "Date");
//! ```

use crate::error::{MergeError, Result};
use crate::path::{PathSegment, TreePath};
use crate::tree::Tree;

/// A value the merge engine would reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedValue {
    /// Location inside the scanned tree.
    pub path: TreePath,
    /// Constructor name of the value.
    pub type_name: String,
}

/// Reports every value in `source` that a merge would reject.
///
/// Walks the same properties a merge would visit: enumerable ones, with
/// getters evaluated. Returns an empty list when the tree is mergeable.
pub fn check_mergeable(source: &Tree) -> Vec<UnsupportedValue> {
    let mut found = Vec::new();
    let mut path = TreePath::root();
    walk(source, &mut path, &mut found);
    found
}

/// Like [`check_mergeable`] but fails on the first problem, with the error
/// a merge of `source` into a root of the same kind would raise.
///
/// # Errors
///
/// Returns [`RootMismatch`](MergeError::RootMismatch) if `source` is not an
/// array or plain object, or
/// [`UnsupportedType`](MergeError::UnsupportedType) naming the first
/// offending value and its path.
pub fn ensure_mergeable(source: &Tree) -> Result<()> {
    if !matches!(source, Tree::Array(_) | Tree::Object(_)) {
        return Err(MergeError::RootMismatch);
    }
    match check_mergeable(source).into_iter().next() {
        Some(UnsupportedValue { path, type_name }) => {
            Err(MergeError::UnsupportedType { type_name, path })
        }
        None => Ok(()),
    }
}

fn walk(value: &Tree, path: &mut TreePath, found: &mut Vec<UnsupportedValue>) {
    match value {
        Tree::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                path.push(PathSegment::Index(index));
                walk(item, path, found);
                path.pop();
            }
        }
        Tree::Object(object) => {
            for (key, item) in object.enumerable() {
                path.push(PathSegment::Key(key.to_string()));
                walk(&item, path, found);
                path.pop();
            }
        }
        Tree::Foreign(foreign) => found.push(UnsupportedValue {
            path: path.clone(),
            type_name: foreign.type_name().to_string(),
        }),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::Object;

    use super::*;

    #[test]
    fn test_check_mergeable_reports_all_offenders() {
        let source = Tree::from(Object::from_iter([
            ("a", Tree::foreign("Date", "2015-02-01")),
            (
                "b",
                Tree::from(vec![Tree::from(1), Tree::foreign("Temp", "Temp {}")]),
            ),
        ]));

        let found = check_mergeable(&source);
        let paths: Vec<_> = found.iter().map(|v| v.path.to_string()).collect();
        assert_eq!(paths, ["a", "b.1"]);
    }

    #[test]
    fn test_check_mergeable_skips_hidden_properties() {
        let mut object = Object::new();
        object.define_property("hidden", Tree::foreign("Date", "2015-02-01"), false);
        assert!(check_mergeable(&Tree::from(object)).is_empty());
    }

    #[test]
    fn test_check_mergeable_evaluates_getters() {
        let mut object = Object::new();
        object.define_getter("lazy", || Tree::foreign("Map", "{}"), true);
        let found = check_mergeable(&Tree::from(object));
        assert_eq!(found[0].type_name, "Map");
    }

    #[test]
    fn test_ensure_mergeable_matches_merge_error() {
        let source = Tree::from(Object::from_iter([(
            "x",
            Tree::foreign("Date", "2015-02-01"),
        )]));
        let err = ensure_mergeable(&source).unwrap_err();
        assert!(err.to_string().contains("'Date'"));
        assert_eq!(err.path().unwrap().to_string(), "x");
        assert!(ensure_mergeable(&Tree::from(vec![Tree::Null])).is_ok());
    }

    #[test]
    fn test_ensure_mergeable_rejects_non_container_root() {
        for root in [Tree::Null, Tree::from(1), Tree::foreign("Date", "2015-02-01")] {
            assert!(matches!(
                ensure_mergeable(&root),
                Err(MergeError::RootMismatch)
            ));
        }
    }
}
