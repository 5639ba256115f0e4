//! Data tree model.
//!
//! A [`Tree`] is a recursive value made of scalars, arrays, and plain
//! objects. Values that are objects but not plain objects (class instances,
//! dates, maps) are represented by [`Foreign`] so they can sit inside a
//! merge target and be rejected when they show up in a source.
//!
//! Objects keep their keys in insertion order. Each key maps to a
//! [`Property`], which is either a data slot or a getter, and carries an
//! `enumerable` flag. Only enumerable properties take part in merging.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// A node in a data tree.
///
/// # Examples
///
/// ```
/// use fastextend_core::{Object, Tree};
///
/// let tree = Tree::from(Object::from_iter([
///     ("name", Tree::from("fastextend")),
///     ("tags", Tree::from(vec![Tree::from("merge"), Tree::from("clone")])),
/// ]));
///
/// assert_eq!(tree.get("name").as_deref(), Some(&Tree::from("fastextend")));
/// assert_eq!(tree.type_name(), "Object");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Tree {
    /// Absent value (the default).
    #[default]
    Undefined,
    /// Explicit null.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Numeric scalar (IEEE-754 double).
    Number(f64),
    /// String scalar.
    String(String),
    /// Ordered, index-keyed sequence.
    Array(Vec<Tree>),
    /// Plain object literal.
    Object(Object),
    /// Object instance that is not a plain object or array.
    Foreign(Foreign),
}

impl Tree {
    /// Creates a [`Tree::Foreign`] value.
    pub fn foreign(type_name: impl Into<String>, repr: impl Into<String>) -> Self {
        Tree::Foreign(Foreign::new(type_name, repr))
    }

    /// Returns the runtime type name of this value.
    ///
    /// Scalars report their primitive name (`"number"`, `"string"`, ...),
    /// containers report `"Array"` or `"Object"`, and foreign values report
    /// their constructor name.
    pub fn type_name(&self) -> &str {
        match self {
            Tree::Undefined => "undefined",
            Tree::Null => "null",
            Tree::Bool(_) => "boolean",
            Tree::Number(_) => "number",
            Tree::String(_) => "string",
            Tree::Array(_) => "Array",
            Tree::Object(_) => "Object",
            Tree::Foreign(foreign) => foreign.type_name(),
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Tree::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Tree::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Tree::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Tree::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tree::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Tree]> {
        match self {
            Tree::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Tree>> {
        match self {
            Tree::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Tree::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Tree::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Reads an object property, evaluating getters.
    ///
    /// Returns `None` when this value is not an object or has no such key.
    pub fn get(&self, key: &str) -> Option<Cow<'_, Tree>> {
        self.as_object().and_then(|object| object.get(key))
    }

    /// Reads an array element.
    pub fn get_index(&self, index: usize) -> Option<&Tree> {
        self.as_array().and_then(|items| items.get(index))
    }
}

impl From<bool> for Tree {
    fn from(value: bool) -> Self {
        Tree::Bool(value)
    }
}

impl From<f64> for Tree {
    fn from(value: f64) -> Self {
        Tree::Number(value)
    }
}

impl From<i32> for Tree {
    fn from(value: i32) -> Self {
        Tree::Number(f64::from(value))
    }
}

impl From<i64> for Tree {
    fn from(value: i64) -> Self {
        Tree::Number(value as f64)
    }
}

impl From<&str> for Tree {
    fn from(value: &str) -> Self {
        Tree::String(value.to_string())
    }
}

impl From<String> for Tree {
    fn from(value: String) -> Self {
        Tree::String(value)
    }
}

impl From<Vec<Tree>> for Tree {
    fn from(value: Vec<Tree>) -> Self {
        Tree::Array(value)
    }
}

impl From<Object> for Tree {
    fn from(value: Object) -> Self {
        Tree::Object(value)
    }
}

impl From<Foreign> for Tree {
    fn from(value: Foreign) -> Self {
        Tree::Foreign(value)
    }
}

/// An object instance whose type is not the plain object type.
///
/// The merge engine never looks inside a foreign value; it only needs the
/// constructor name for error reporting. `repr` is an opaque rendering used
/// for equality and display.
///
/// # Examples
///
/// ```
/// use fastextend_core::Foreign;
///
/// let date = Foreign::new("Date", "2015-02-01T00:00:00.000Z");
/// assert_eq!(date.type_name(), "Date");
/// assert_eq!(date.to_string(), "Date(2015-02-01T00:00:00.000Z)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Foreign {
    type_name: String,
    repr: String,
}

impl Foreign {
    pub fn new(type_name: impl Into<String>, repr: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            repr: repr.into(),
        }
    }

    /// Constructor name of the instance (e.g. `"Date"`).
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn repr(&self) -> &str {
        &self.repr
    }
}

impl fmt::Display for Foreign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.type_name, self.repr)
    }
}

/// Computed property accessor.
#[derive(Clone)]
pub struct Getter(Arc<dyn Fn() -> Tree + Send + Sync>);

impl Getter {
    pub fn new<F>(getter: F) -> Self
    where
        F: Fn() -> Tree + Send + Sync + 'static,
    {
        Self(Arc::new(getter))
    }

    /// Evaluates the accessor and returns its current value.
    pub fn call(&self) -> Tree {
        (self.0)()
    }
}

impl fmt::Debug for Getter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Getter(..)")
    }
}

#[derive(Debug, Clone)]
enum Slot {
    Data(Tree),
    Getter(Getter),
}

/// A single object property: a data value or a getter, plus enumerability.
#[derive(Debug, Clone)]
pub struct Property {
    slot: Slot,
    enumerable: bool,
}

impl Property {
    /// Creates an enumerable data property, as an object literal would.
    pub fn data(value: Tree) -> Self {
        Self {
            slot: Slot::Data(value),
            enumerable: true,
        }
    }

    /// Creates an enumerable getter property.
    pub fn getter(getter: Getter) -> Self {
        Self {
            slot: Slot::Getter(getter),
            enumerable: true,
        }
    }

    /// Sets the enumerable flag.
    pub fn enumerable(mut self, enumerable: bool) -> Self {
        self.enumerable = enumerable;
        self
    }

    pub fn is_enumerable(&self) -> bool {
        self.enumerable
    }

    pub fn is_getter(&self) -> bool {
        matches!(self.slot, Slot::Getter(_))
    }

    /// Returns the stored value, or `None` for getters.
    pub fn as_data(&self) -> Option<&Tree> {
        match &self.slot {
            Slot::Data(value) => Some(value),
            Slot::Getter(_) => None,
        }
    }

    /// Returns the current value, evaluating the getter if there is one.
    pub fn value(&self) -> Cow<'_, Tree> {
        match &self.slot {
            Slot::Data(value) => Cow::Borrowed(value),
            Slot::Getter(getter) => Cow::Owned(getter.call()),
        }
    }
}

/// Plain object: an insertion-ordered map from key to [`Property`].
///
/// Equality compares enumerable properties by their current value and
/// ignores key order, the way a deep-strict-equal assertion does.
///
/// # Examples
///
/// ```
/// use fastextend_core::{Object, Tree};
///
/// let mut object = Object::new();
/// object.set("foo", Tree::from("fooValue"));
/// object.define_property("hidden", Tree::from(1), false);
/// object.define_getter("bar", || Tree::from("barValue"), true);
///
/// let keys: Vec<_> = object.keys().collect();
/// assert_eq!(keys, ["foo", "bar"]);
/// assert_eq!(object.get("bar").as_deref(), Some(&Tree::from("barValue")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Object {
    properties: IndexMap<String, Property>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            properties: IndexMap::with_capacity(capacity),
        }
    }

    /// Number of own properties, enumerable or not.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Assigns `value` to `key`.
    ///
    /// A new key is appended as an enumerable data property. An existing key
    /// keeps its position and enumerability; a getter is replaced by a data
    /// slot.
    pub fn set(&mut self, key: impl Into<String>, value: Tree) {
        let key = key.into();
        match self.properties.get_mut(&key) {
            Some(property) => property.slot = Slot::Data(value),
            None => {
                self.properties.insert(key, Property::data(value));
            }
        }
    }

    /// Defines a data property with explicit enumerability, replacing any
    /// existing descriptor for `key`.
    pub fn define_property(&mut self, key: impl Into<String>, value: Tree, enumerable: bool) {
        self.properties
            .insert(key.into(), Property::data(value).enumerable(enumerable));
    }

    /// Defines a getter property, replacing any existing descriptor for `key`.
    pub fn define_getter<F>(&mut self, key: impl Into<String>, getter: F, enumerable: bool)
    where
        F: Fn() -> Tree + Send + Sync + 'static,
    {
        self.properties.insert(
            key.into(),
            Property::getter(Getter::new(getter)).enumerable(enumerable),
        );
    }

    /// Reads a property's current value. Non-enumerable properties are
    /// readable too.
    pub fn get(&self, key: &str) -> Option<Cow<'_, Tree>> {
        self.properties.get(key).map(Property::value)
    }

    pub fn property(&self, key: &str) -> Option<&Property> {
        self.properties.get(key)
    }

    /// Enumerable keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .filter(|(_, property)| property.enumerable)
            .map(|(key, _)| key.as_str())
    }

    /// Enumerable properties in insertion order, with getters evaluated.
    pub fn enumerable(&self) -> impl Iterator<Item = (&str, Cow<'_, Tree>)> {
        self.properties
            .iter()
            .filter(|(_, property)| property.enumerable)
            .map(|(key, property)| (key.as_str(), property.value()))
    }

    /// Mutable access to the data stored under `key`.
    ///
    /// A getter is first replaced by a data slot holding its current value.
    pub(crate) fn slot_mut(&mut self, key: &str) -> Option<&mut Tree> {
        let property = self.properties.get_mut(key)?;
        if let Slot::Getter(getter) = &property.slot {
            let current = getter.call();
            property.slot = Slot::Data(current);
        }
        match &mut property.slot {
            Slot::Data(value) => Some(value),
            Slot::Getter(_) => None,
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.keys().count() == other.keys().count()
            && self.enumerable().all(|(key, value)| {
                other
                    .property(key)
                    .is_some_and(|property| property.enumerable && property.value() == value)
            })
    }
}

impl<K: Into<String>> FromIterator<(K, Tree)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, Tree)>>(iter: I) -> Self {
        let mut object = Object::new();
        for (key, value) in iter {
            object.set(key, value);
        }
        object
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_set_keeps_position_of_existing_key() {
        let mut object = Object::from_iter([("a", Tree::from(1)), ("b", Tree::from(2))]);
        object.set("a", Tree::from(3));
        object.set("c", Tree::from(4));

        let keys: Vec<_> = object.keys().collect();
        assert_eq!(keys, ["a", "b", "c"]);
        assert_eq!(object.get("a").as_deref(), Some(&Tree::from(3)));
    }

    #[test]
    fn test_set_preserves_non_enumerable_flag() {
        let mut object = Object::new();
        object.define_property("hidden", Tree::from(1), false);
        object.set("hidden", Tree::from(2));

        let property = object.property("hidden").unwrap();
        assert!(!property.is_enumerable());
        assert_eq!(property.as_data(), Some(&Tree::from(2)));
    }

    #[test]
    fn test_getter_is_evaluated_on_every_read() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut object = Object::new();
        object.define_getter(
            "count",
            move || Tree::from(counter.fetch_add(1, Ordering::SeqCst) as i64),
            true,
        );

        assert_eq!(object.get("count").as_deref(), Some(&Tree::from(0)));
        assert_eq!(object.get("count").as_deref(), Some(&Tree::from(1)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_slot_mut_materializes_getter() {
        let mut object = Object::new();
        object.define_getter("bar", || Tree::from("barValue"), true);

        *object.slot_mut("bar").unwrap() = Tree::from("changed");

        let property = object.property("bar").unwrap();
        assert!(!property.is_getter());
        assert_eq!(property.as_data(), Some(&Tree::from("changed")));
    }

    #[test]
    fn test_equality_ignores_key_order_and_hidden_properties() {
        let left = Object::from_iter([("a", Tree::from(1)), ("b", Tree::from(2))]);
        let mut right = Object::from_iter([("b", Tree::from(2)), ("a", Tree::from(1))]);
        assert_eq!(left, right);

        right.define_property("hidden", Tree::Null, false);
        assert_eq!(left, right);

        right.set("c", Tree::Undefined);
        assert_ne!(left, right);
    }

    #[test]
    fn test_equality_compares_getter_values() {
        let mut with_getter = Object::new();
        with_getter.define_getter("bar", || Tree::from("barValue"), true);
        let plain = Object::from_iter([("bar", Tree::from("barValue"))]);
        assert_eq!(with_getter, plain);
    }

    #[test]
    fn test_scalar_accessors() {
        assert!(Tree::Null.is_null());
        assert!(!Tree::Undefined.is_null());
        assert_eq!(Tree::from(true).as_bool(), Some(true));
        assert_eq!(Tree::from("x").as_bool(), None);
        assert_eq!(Tree::from(2.5).as_f64(), Some(2.5));
        assert_eq!(Tree::from("x").as_str(), Some("x"));
    }

    #[test]
    fn test_array_accessors() {
        let mut tree = Tree::from(vec![Tree::from(1)]);
        tree.as_array_mut().unwrap().push(Tree::from(2));

        assert_eq!(tree.get_index(1), Some(&Tree::from(2)));
        assert_eq!(tree.get_index(2), None);
        assert!(Tree::Null.as_array_mut().is_none());
        assert_eq!(Tree::from(Object::new()).get_index(0), None);
    }

    #[test]
    fn test_foreign_accessors() {
        let date = Foreign::new("Date", "2015-02-01");
        assert_eq!(date.type_name(), "Date");
        assert_eq!(date.repr(), "2015-02-01");
        assert_eq!(Tree::from(date.clone()), Tree::foreign("Date", "2015-02-01"));
        assert_ne!(Tree::from(date), Tree::foreign("Date", "2016-01-01"));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Tree::Undefined.type_name(), "undefined");
        assert_eq!(Tree::from(1).type_name(), "number");
        assert_eq!(Tree::from(vec![]).type_name(), "Array");
        assert_eq!(Tree::foreign("Map", "{}").type_name(), "Map");
    }
}
