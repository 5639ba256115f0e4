//! Deep merge and deep clone for plain data trees.
//!
//! This crate merges trees made of objects, arrays, and scalar leaves:
//!
//! - [`Tree`]: one value, which is undefined, null, boolean, number, string, array,
//!   plain [`Object`], or a [`Foreign`] instance that merging rejects.
//! - [`merge`] / [`merge_with_options`]: apply sources to a target in
//!   order, later sources winning. The target is mutated and returned.
//! - [`deep_clone`]: an independent copy, built by merging onto an empty
//!   root.
//! - [`MergeOptions`]: whether undefined source values are written and
//!   whether nested arrays merge element-wise or are replaced.
//!
//! Classification ([`classify`]) decides per value whether it is a scalar,
//! a container, or unsupported. [`check_mergeable`] finds unsupported values
//! ahead of time, since a failed merge leaves earlier writes in place.
//!
//! # Example
//!
//! ```
//! use fastextend_core::*;
//! use serde_json::json;
//!
//! let defaults = Tree::from(json!({ "server": { "port": 80, "hosts": ["a"] } }));
//! let overrides = Tree::from(json!({ "server": { "port": 8080 } }));
//!
//! let mut config = deep_clone(&defaults).unwrap();
//! merge(&mut config, [&overrides]).unwrap();
//!
//! assert_eq!(
//!     config.to_json().unwrap(),
//!     json!({ "server": { "port": 8080, "hosts": ["a"] } }),
//! );
//! assert_eq!(defaults.to_json().unwrap()["server"]["port"], json!(80));
//! ```

mod classify;
mod error;
mod json;
mod merge;
mod options;
mod path;
mod tree;
mod validate;

pub use classify::{ValueKind, classify};
pub use error::{MergeError, Result};
pub use merge::{deep_clone, merge, merge_with_options};
pub use options::MergeOptions;
pub use path::{PathSegment, TreePath};
pub use tree::{Foreign, Getter, Object, Property, Tree};
pub use validate::{UnsupportedValue, check_mergeable, ensure_mergeable};
