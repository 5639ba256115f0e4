//! Merge policy configuration.
//!
//! [`MergeOptions`] is always fully populated before the engine runs. Partial
//! records, whether deserialized from JSON or read from a [`Tree`], fall back
//! to the defaults for any field they leave out.
//!
//! # Example JSON
//!
//! ```json
//! { "mergeUndefined": false }
//! ```

use serde::{Deserialize, Serialize};

use crate::tree::Tree;

/// Conflict policy for a merge.
///
/// # Examples
///
/// ```
/// use fastextend_core::MergeOptions;
///
/// let defaults = MergeOptions::default();
/// assert!(defaults.merge_undefined);
/// assert!(defaults.merge_arrays);
///
/// let partial: MergeOptions = serde_json::from_str(r#"{ "mergeArrays": false }"#).unwrap();
/// assert!(partial.merge_undefined);
/// assert!(!partial.merge_arrays);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MergeOptions {
    /// Write source values that are undefined. When `false`, such values are
    /// skipped and the target keeps what it had.
    pub merge_undefined: bool,
    /// Merge a source array into an existing target array element-wise.
    /// When `false`, the source array replaces the target array.
    pub merge_arrays: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            merge_undefined: true,
            merge_arrays: true,
        }
    }
}

impl MergeOptions {
    pub fn with_merge_undefined(mut self, merge_undefined: bool) -> Self {
        self.merge_undefined = merge_undefined;
        self
    }

    pub fn with_merge_arrays(mut self, merge_arrays: bool) -> Self {
        self.merge_arrays = merge_arrays;
        self
    }

    /// Normalizes a dynamically supplied options record.
    ///
    /// Reads the `mergeUndefined` and `mergeArrays` keys. A key that is
    /// missing or undefined takes its default. A boolean is used as is. Any
    /// other value turns the policy off, since a policy is only active when
    /// it is exactly `true`. A non-object record yields the defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use fastextend_core::{MergeOptions, Object, Tree};
    ///
    /// let record = Tree::from(Object::from_iter([("mergeUndefined", Tree::from(false))]));
    /// let options = MergeOptions::from_tree(&record);
    /// assert!(!options.merge_undefined);
    /// assert!(options.merge_arrays);
    /// ```
    pub fn from_tree(record: &Tree) -> Self {
        let defaults = Self::default();
        let Some(object) = record.as_object() else {
            return defaults;
        };

        let flag = |key: &str, default: bool| match object.get(key).as_deref() {
            None | Some(Tree::Undefined) => default,
            Some(Tree::Bool(value)) => *value,
            Some(_) => false,
        };

        Self {
            merge_undefined: flag("mergeUndefined", defaults.merge_undefined),
            merge_arrays: flag("mergeArrays", defaults.merge_arrays),
        }
    }

    /// Whether a resolved value should be written into the target.
    pub(crate) fn writes(&self, value: &Tree) -> bool {
        !value.is_undefined() || self.merge_undefined
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::Object;

    use super::*;

    #[test]
    fn test_from_tree_missing_fields_use_defaults() {
        let options = MergeOptions::from_tree(&Tree::from(Object::new()));
        assert_eq!(options, MergeOptions::default());
    }

    #[test]
    fn test_from_tree_undefined_field_uses_default() {
        let record = Tree::from(Object::from_iter([
            ("mergeUndefined", Tree::Undefined),
            ("mergeArrays", Tree::from(false)),
        ]));
        let options = MergeOptions::from_tree(&record);
        assert!(options.merge_undefined);
        assert!(!options.merge_arrays);
    }

    #[test]
    fn test_from_tree_non_boolean_disables_policy() {
        let record = Tree::from(Object::from_iter([
            ("mergeUndefined", Tree::from(1)),
            ("mergeArrays", Tree::from("yes")),
        ]));
        let options = MergeOptions::from_tree(&record);
        assert!(!options.merge_undefined);
        assert!(!options.merge_arrays);
    }

    #[test]
    fn test_from_tree_non_object_yields_defaults() {
        assert_eq!(
            MergeOptions::from_tree(&Tree::from(5)),
            MergeOptions::default()
        );
    }

    #[test]
    fn test_writes_respects_merge_undefined() {
        let skip = MergeOptions::default().with_merge_undefined(false);
        assert!(!skip.writes(&Tree::Undefined));
        assert!(skip.writes(&Tree::Null));
        assert!(MergeOptions::default().writes(&Tree::Undefined));
    }

    #[test]
    fn test_serde_round_trip_uses_camel_case() {
        let options = MergeOptions::default().with_merge_arrays(false);
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(json, r#"{"mergeUndefined":true,"mergeArrays":false}"#);
    }
}
