//! Error types for merge and clone operations.
//!
//! Every error aborts the call that raised it. Merging is not
//! transactional: sources applied before the failure stay applied, and a
//! source that fails part-way leaves its earlier writes in the target.

use thiserror::Error;

use crate::path::{PathSegment, TreePath};

/// Errors that can occur while merging, cloning, or converting trees.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The target and a source are not both arrays or both plain objects.
    #[error("Root arguments must both be array literals or object literals.")]
    RootMismatch,

    /// A source contains an object that is neither a plain object nor an
    /// array.
    #[error(
        "fastextend only supports string, number, boolean, undefined, null and object/array literals, got '{type_name}'."
    )]
    UnsupportedType {
        /// Constructor name of the rejected value.
        type_name: String,
        /// Location of the rejected value inside its source.
        path: TreePath,
    },

    /// Clone was called on something other than a plain object or array.
    #[error("can only clone object or array literals, got '{type_name}'")]
    InvalidCloneTarget { type_name: String },

    /// A value has no JSON representation.
    #[error("value of type '{type_name}' at '{path}' cannot be represented as JSON")]
    NotJson { type_name: String, path: TreePath },

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MergeError {
    /// Location of the offending value, for errors that have one.
    pub fn path(&self) -> Option<&TreePath> {
        match self {
            MergeError::UnsupportedType { path, .. } | MergeError::NotJson { path, .. } => {
                Some(path)
            }
            _ => None,
        }
    }

    pub(crate) fn within(mut self, segment: PathSegment) -> Self {
        if let MergeError::UnsupportedType { path, .. } | MergeError::NotJson { path, .. } =
            &mut self
        {
            path.prepend(segment);
        }
        self
    }
}

/// Convenience alias for results with [`MergeError`].
pub type Result<T> = std::result::Result<T, MergeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_type_message_names_constructor() {
        let err = MergeError::UnsupportedType {
            type_name: "Date".to_string(),
            path: TreePath::root(),
        };
        assert_eq!(
            err.to_string(),
            "fastextend only supports string, number, boolean, undefined, null and object/array literals, got 'Date'."
        );
    }

    #[test]
    fn test_within_prepends_segments() {
        let err = MergeError::UnsupportedType {
            type_name: "Temp".to_string(),
            path: TreePath::root(),
        }
        .within(PathSegment::Key("temp".into()))
        .within(PathSegment::Index(2));
        assert_eq!(err.path().unwrap().to_string(), "2.temp");
    }

    #[test]
    fn test_root_mismatch_has_no_path() {
        let err = MergeError::RootMismatch.within(PathSegment::Index(0));
        assert!(err.path().is_none());
        assert_eq!(
            err.to_string(),
            "Root arguments must both be array literals or object literals."
        );
    }
}
