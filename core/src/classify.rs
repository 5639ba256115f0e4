//! Value classification.
//!
//! Every source value is classified exactly once before the engine decides
//! what to do with it: replace the target slot, merge element-wise, merge
//! key-wise, or reject.

use crate::tree::{Object, Tree};

/// Merge-relevant kind of a source value.
///
/// # Examples
///
/// ```
/// use fastextend_core::{classify, Tree, ValueKind};
///
/// assert_eq!(classify(&Tree::Null), ValueKind::Scalar);
/// assert!(matches!(classify(&Tree::from(vec![])), ValueKind::Array(_)));
/// assert_eq!(
///     classify(&Tree::foreign("Date", "2015-02-01")),
///     ValueKind::Unsupported("Date"),
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueKind<'a> {
    /// Undefined, null, boolean, number, or string. Copied verbatim.
    Scalar,
    /// Array container, merged element by element.
    Array(&'a [Tree]),
    /// Plain object container, merged key by key.
    PlainObject(&'a Object),
    /// Any other object; carries the constructor name.
    Unsupported(&'a str),
}

impl ValueKind<'_> {
    pub fn is_container(&self) -> bool {
        matches!(self, ValueKind::Array(_) | ValueKind::PlainObject(_))
    }
}

/// Classifies a source value.
pub fn classify(value: &Tree) -> ValueKind<'_> {
    match value {
        Tree::Undefined | Tree::Null | Tree::Bool(_) | Tree::Number(_) | Tree::String(_) => {
            ValueKind::Scalar
        }
        Tree::Array(items) => ValueKind::Array(items),
        Tree::Object(object) => ValueKind::PlainObject(object),
        Tree::Foreign(foreign) => ValueKind::Unsupported(foreign.type_name()),
    }
}
