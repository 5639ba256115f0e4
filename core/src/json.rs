//! Conversion between [`Tree`] and [`serde_json::Value`].
//!
//! JSON has no undefined, getters, or foreign instances, so the conversion
//! out of a tree follows JSON serialization rules: undefined object members
//! are omitted, undefined array elements become `null`, non-finite numbers
//! become `null`, and foreign values are an error.

use serde_json::{Map, Number, Value};

use crate::error::{MergeError, Result};
use crate::path::{PathSegment, TreePath};
use crate::tree::{Object, Tree};

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl From<Value> for Tree {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Tree::Null,
            Value::Bool(b) => Tree::Bool(b),
            Value::Number(n) => Tree::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Tree::String(s),
            Value::Array(items) => Tree::Array(items.into_iter().map(Tree::from).collect()),
            Value::Object(map) => {
                let mut object = Object::with_capacity(map.len());
                for (key, value) in map {
                    object.set(key, Tree::from(value));
                }
                Tree::Object(object)
            }
        }
    }
}

impl Tree {
    /// Parses a JSON document into a tree, keeping key order.
    ///
    /// # Errors
    ///
    /// Returns [`Json`](MergeError::Json) if `input` is not valid JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use fastextend_core::Tree;
    ///
    /// let tree = Tree::from_json_str(r#"{ "b": 1, "a": [true, null] }"#).unwrap();
    /// let keys: Vec<_> = tree.as_object().unwrap().keys().collect();
    /// assert_eq!(keys, ["b", "a"]);
    /// ```
    pub fn from_json_str(input: &str) -> Result<Tree> {
        let value: Value = serde_json::from_str(input)?;
        Ok(Tree::from(value))
    }

    /// Converts the tree to a JSON value.
    ///
    /// Getters are evaluated and non-enumerable properties are left out. An
    /// undefined root converts to `null`.
    ///
    /// # Errors
    ///
    /// Returns [`NotJson`](MergeError::NotJson) if the tree contains a
    /// foreign value.
    ///
    /// # Examples
    ///
    /// ```
    /// use fastextend_core::{Object, Tree};
    /// use serde_json::json;
    ///
    /// let tree = Tree::from(Object::from_iter([
    ///     ("kept", Tree::from(vec![Tree::Undefined, Tree::from(1.5)])),
    ///     ("dropped", Tree::Undefined),
    /// ]));
    /// assert_eq!(tree.to_json().unwrap(), json!({ "kept": [null, 1.5] }));
    /// ```
    pub fn to_json(&self) -> Result<Value> {
        Ok(to_json_value(self)?.unwrap_or(Value::Null))
    }
}

/// Converts one value; `None` stands for undefined.
fn to_json_value(tree: &Tree) -> Result<Option<Value>> {
    let value = match tree {
        Tree::Undefined => return Ok(None),
        Tree::Null => Value::Null,
        Tree::Bool(b) => Value::Bool(*b),
        Tree::Number(n) => number_to_json(*n),
        Tree::String(s) => Value::String(s.clone()),
        Tree::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let converted =
                    to_json_value(item).map_err(|err| err.within(PathSegment::Index(index)))?;
                out.push(converted.unwrap_or(Value::Null));
            }
            Value::Array(out)
        }
        Tree::Object(object) => {
            let mut map = Map::new();
            for (key, value) in object.enumerable() {
                let converted = to_json_value(&value)
                    .map_err(|err| err.within(PathSegment::Key(key.to_string())))?;
                if let Some(converted) = converted {
                    map.insert(key.to_string(), converted);
                }
            }
            Value::Object(map)
        }
        Tree::Foreign(foreign) => {
            return Err(MergeError::NotJson {
                type_name: foreign.type_name().to_string(),
                path: TreePath::root(),
            });
        }
    };
    Ok(Some(value))
}

fn number_to_json(n: f64) -> Value {
    if !n.is_finite() {
        return Value::Null;
    }
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(Value::Null, Value::Number)
}
