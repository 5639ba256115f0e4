//! Deep merging and deep cloning with a configurable conflict policy.
//!
//! [`merge`] applies sources to a target in order, later sources winning
//! conflicts. Containers are merged recursively: arrays by position, plain
//! objects by key. Scalars replace whatever the target held. [`deep_clone`]
//! is a merge onto a fresh empty root.
//!
//! The target is mutated in place and handed back. Sources are only ever
//! borrowed, so every container in the result is either one the target
//! already owned or one allocated during the merge.
//!
//! # Example
//!
//! ```
//! use fastextend_core::*;
//! use serde_json::json;
//!
//! let mut target = Tree::from(json!({ "foo": [1, { "foo": "fooValue" }] }));
//! let source = Tree::from(json!({ "foo": [1, { "bar": "barValue" }] }));
//!
//! merge(&mut target, [&source]).unwrap();
//! assert_eq!(
//!     target,
//!     Tree::from(json!({ "foo": [1, { "foo": "fooValue", "bar": "barValue" }] })),
//! );
//! ```

use tracing::{debug, trace};

use crate::classify::{ValueKind, classify};
use crate::error::{MergeError, Result};
use crate::options::MergeOptions;
use crate::path::{PathSegment, TreePath};
use crate::tree::{Object, Tree};

/// Outcome of merging one source value against one target slot.
enum Resolved {
    /// The existing target container was merged into directly.
    InPlace,
    /// A new value to write into the slot.
    Value(Tree),
}

/// Merges `sources` into `target` using the default [`MergeOptions`].
///
/// Returns the same `target` handle it was given.
///
/// # Errors
///
/// Returns [`RootMismatch`](MergeError::RootMismatch) if a source root is
/// not the same container kind as the target root, or
/// [`UnsupportedType`](MergeError::UnsupportedType) if a source contains a
/// [`Foreign`](crate::Foreign) value. Sources applied before the failing one
/// remain applied.
///
/// # Examples
///
/// ```
/// use fastextend_core::*;
/// use serde_json::json;
///
/// let mut target = Tree::from(json!({}));
/// let first = Tree::from(json!({ "a": 1 }));
/// let second = Tree::from(json!({ "a": 2 }));
///
/// let merged = merge(&mut target, [&first, &second]).unwrap();
/// assert_eq!(merged.get("a").as_deref(), Some(&Tree::from(2)));
/// ```
pub fn merge<'t, 's, I>(target: &'t mut Tree, sources: I) -> Result<&'t mut Tree>
where
    I: IntoIterator<Item = &'s Tree>,
{
    merge_with_options(target, sources, &MergeOptions::default())
}

/// Merges `sources` into `target` under an explicit policy.
///
/// # Errors
///
/// Same as [`merge`].
///
/// # Examples
///
/// ```
/// use fastextend_core::*;
/// use serde_json::json;
///
/// let mut target = Tree::from(json!({ "foo": [{ "a": 1 }, 2] }));
/// let source = Tree::from(json!({ "foo": [{ "b": 1 }] }));
/// let options = MergeOptions::default().with_merge_arrays(false);
///
/// merge_with_options(&mut target, [&source], &options).unwrap();
/// assert_eq!(target, Tree::from(json!({ "foo": [{ "b": 1 }] })));
/// ```
pub fn merge_with_options<'t, 's, I>(
    target: &'t mut Tree,
    sources: I,
    options: &MergeOptions,
) -> Result<&'t mut Tree>
where
    I: IntoIterator<Item = &'s Tree>,
{
    debug!(
        root = target.type_name(),
        merge_undefined = options.merge_undefined,
        merge_arrays = options.merge_arrays,
        "merging sources"
    );

    let mut applied = 0usize;
    for source in sources {
        let outcome = match (&mut *target, source) {
            (Tree::Array(items), Tree::Array(source_items)) => {
                merge_array(items, source_items, options)
            }
            (Tree::Object(object), Tree::Object(source_object)) => {
                merge_object(object, source_object, options)
            }
            _ => Err(MergeError::RootMismatch),
        };

        if let Err(err) = outcome {
            debug!(source = applied, error = %err, "merge aborted");
            return Err(err);
        }
        applied += 1;
    }

    debug!(sources = applied, "merge complete");
    Ok(target)
}

/// Produces a structurally independent deep copy of an object or array.
///
/// Cloning is a merge of `value` onto an empty root of the same kind, so it
/// follows the same rules: getters are evaluated into data properties,
/// non-enumerable properties are dropped, and foreign values are rejected.
///
/// # Errors
///
/// Returns [`InvalidCloneTarget`](MergeError::InvalidCloneTarget) if `value`
/// is not an object or array, or
/// [`UnsupportedType`](MergeError::UnsupportedType) if it contains a foreign
/// value.
///
/// # Examples
///
/// ```
/// use fastextend_core::*;
/// use serde_json::json;
///
/// let original = Tree::from(json!({ "nested": { "arr": [1, 2] } }));
/// let mut copy = deep_clone(&original).unwrap();
/// assert_eq!(copy, original);
///
/// copy.as_object_mut().unwrap().set("extra", Tree::Null);
/// assert_ne!(copy, original);
///
/// assert!(deep_clone(&Tree::from(5)).is_err());
/// ```
pub fn deep_clone(value: &Tree) -> Result<Tree> {
    let mut root = match value {
        Tree::Array(_) => Tree::Array(Vec::new()),
        Tree::Object(_) => Tree::Object(Object::new()),
        other => {
            return Err(MergeError::InvalidCloneTarget {
                type_name: other.type_name().to_string(),
            });
        }
    };

    merge(&mut root, [value])?;
    Ok(root)
}

/// Resolves one source value against the existing target slot, if any.
///
/// A compatible existing container is merged in place. Anything else yields
/// a value for the caller to write: the scalar itself, or a freshly built
/// container. A fresh container is only handed back once it is complete, so
/// a failure part-way leaves the slot untouched.
fn resolve(existing: Option<&mut Tree>, source: &Tree, options: &MergeOptions) -> Result<Resolved> {
    match classify(source) {
        ValueKind::Scalar => Ok(Resolved::Value(source.clone())),
        ValueKind::Array(source_items) => match existing {
            Some(Tree::Array(items)) if options.merge_arrays => {
                merge_array(items, source_items, options)?;
                Ok(Resolved::InPlace)
            }
            _ => {
                trace!(len = source_items.len(), "building fresh array");
                let mut fresh = Vec::with_capacity(source_items.len());
                merge_array(&mut fresh, source_items, options)?;
                Ok(Resolved::Value(Tree::Array(fresh)))
            }
        },
        ValueKind::PlainObject(source_object) => match existing {
            Some(Tree::Object(object)) => {
                merge_object(object, source_object, options)?;
                Ok(Resolved::InPlace)
            }
            _ => {
                trace!(len = source_object.len(), "building fresh object");
                let mut fresh = Object::with_capacity(source_object.len());
                merge_object(&mut fresh, source_object, options)?;
                Ok(Resolved::Value(Tree::Object(fresh)))
            }
        },
        ValueKind::Unsupported(type_name) => Err(MergeError::UnsupportedType {
            type_name: type_name.to_string(),
            path: TreePath::root(),
        }),
    }
}

/// Positional merge. Indices past the end of `source` are left alone.
fn merge_array(target: &mut Vec<Tree>, source: &[Tree], options: &MergeOptions) -> Result<()> {
    for (index, item) in source.iter().enumerate() {
        let resolved = resolve(target.get_mut(index), item, options)
            .map_err(|err| err.within(PathSegment::Index(index)))?;

        if let Resolved::Value(value) = resolved {
            if options.writes(&value) {
                write_index(target, index, value);
            } else {
                trace!(index, "skipping undefined element");
            }
        }
    }
    Ok(())
}

/// Writes `value` at `index`, padding any gap with undefined holes.
fn write_index(target: &mut Vec<Tree>, index: usize, value: Tree) {
    if let Some(slot) = target.get_mut(index) {
        *slot = value;
        return;
    }
    target.resize(index, Tree::Undefined);
    target.push(value);
}

/// Key-wise merge over the enumerable properties of `source`.
fn merge_object(target: &mut Object, source: &Object, options: &MergeOptions) -> Result<()> {
    for (key, value) in source.enumerable() {
        // Only a container source can reuse the existing slot. Scalars must
        // not touch it, or a skipped write would still freeze a getter.
        let existing = if classify(&value).is_container() {
            target.slot_mut(key)
        } else {
            None
        };
        let resolved = resolve(existing, &value, options)
            .map_err(|err| err.within(PathSegment::Key(key.to_string())))?;

        if let Resolved::Value(value) = resolved {
            if options.writes(&value) {
                target.set(key, value);
            } else {
                trace!(key, "skipping undefined property");
            }
        }
    }
    Ok(())
}
