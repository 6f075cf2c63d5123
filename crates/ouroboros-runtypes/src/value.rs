//! Runtime value model
//!
//! This module defines the dynamically typed values that runtypes inspect.
//! Objects and arrays are shared handles: cloning a [`Value`] clones the
//! handle, not the contents, so identity survives and cyclic graphs can be
//! built by storing a handle inside itself.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Identity
// ============================================================================

/// Identity of a container value (object or array)
///
/// Two handles share a `NodeId` exactly when they point at the same
/// container. Ids are only meaningful while the container is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:x}", self.0)
    }
}

// ============================================================================
// Prototype
// ============================================================================

/// Prototype of an object value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Prototype {
    /// The base object prototype (a plain object)
    #[default]
    Object,
    /// No prototype at all
    Null,
    /// Instance of a named class (e.g. `Date`, `Map`)
    Class(Arc<str>),
}

impl Prototype {
    /// Prototype for instances of the named class
    pub fn class(name: impl Into<Arc<str>>) -> Self {
        Self::Class(name.into())
    }

    /// Whether this is exactly the base object prototype
    pub fn is_plain(&self) -> bool {
        matches!(self, Self::Object)
    }
}

impl fmt::Display for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object => write!(f, "[object Object]"),
            Self::Null => write!(f, "null"),
            Self::Class(name) => write!(f, "{}", name),
        }
    }
}

// ============================================================================
// Key Ordering
// ============================================================================

/// Parse a canonical array index key ("0", "17", but not "01" or "-1")
pub(crate) fn array_index(key: &str) -> Option<u32> {
    let index: u32 = key.parse().ok()?;
    if index != u32::MAX && index.to_string() == key {
        Some(index)
    } else {
        None
    }
}

/// Own-key enumeration order: array indices ascending, then insertion order
fn enumeration_order(keys: &mut Vec<(String, Value)>) {
    keys.sort_by(|(a, _), (b, _)| match (array_index(a), array_index(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

// ============================================================================
// Object
// ============================================================================

/// Entries in insertion order, with a key index for constant-time lookup
#[derive(Default)]
struct Entries {
    slots: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl Entries {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    fn insert(&mut self, key: String, value: Value) {
        match self.index.get(&key) {
            Some(&position) => self.slots[position].1 = value,
            None => {
                self.index.insert(key.clone(), self.slots.len());
                self.slots.push((key, value));
            }
        }
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.index.get(key).map(|&position| &self.slots[position].1)
    }

    fn remove(&mut self, key: &str) -> Option<Value> {
        let position = self.index.remove(key)?;
        let (_, value) = self.slots.remove(position);
        for (k, _) in &self.slots[position..] {
            if let Some(slot) = self.index.get_mut(k.as_str()) {
                *slot -= 1;
            }
        }
        Some(value)
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
    }
}

struct ObjectCell {
    prototype: Prototype,
    entries: RwLock<Entries>,
}

/// Shared keyed container
///
/// Mutation goes through `&self`; every clone observes the same entries.
///
/// Handles are reference counted. An object that (directly or through other
/// containers) holds a handle to itself is never freed until the cycle is
/// broken, e.g. with [`Object::clear`].
///
/// ```
/// use ouroboros_runtypes::{Object, Value};
///
/// let node = Object::new();
/// node.set("self", Value::Object(node.clone()));
/// assert!(node.get("self").is_some_and(|v| v.same_identity(&Value::Object(node.clone()))));
///
/// // Break the cycle so the object can be freed
/// node.clear();
/// assert!(node.is_empty());
/// ```
#[derive(Clone)]
pub struct Object(Arc<ObjectCell>);

impl Object {
    /// Create an empty plain object
    pub fn new() -> Self {
        Self::with_prototype(Prototype::Object)
    }

    /// Create an empty object with the given prototype
    pub fn with_prototype(prototype: Prototype) -> Self {
        Self(Arc::new(ObjectCell {
            prototype,
            entries: RwLock::new(Entries::default()),
        }))
    }

    /// Create a plain object from key/value pairs (later keys overwrite earlier ones)
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let entries = entries.into_iter();
        let mut collected = Entries::with_capacity(entries.size_hint().0);
        for (key, value) in entries {
            collected.insert(key.into(), value);
        }
        Self(Arc::new(ObjectCell {
            prototype: Prototype::Object,
            entries: RwLock::new(collected),
        }))
    }

    /// Identity of this object
    pub fn id(&self) -> NodeId {
        NodeId(Arc::as_ptr(&self.0) as *const () as usize)
    }

    /// Whether both handles point at the same object
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn prototype(&self) -> &Prototype {
        &self.0.prototype
    }

    /// Set a property, replacing an existing one in place
    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.0.entries.write().insert(key.into(), value);
    }

    /// Get a property value
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.entries.read().get(key).cloned()
    }

    /// Remove a property, returning its value
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.0.entries.write().remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.entries.read().index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.entries.read().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.entries.read().slots.is_empty()
    }

    /// Remove all properties (breaks any cycles running through this object)
    pub fn clear(&self) {
        self.0.entries.write().clear();
    }

    /// Own keys in enumeration order
    pub fn keys(&self) -> Vec<String> {
        self.entries().into_iter().map(|(k, _)| k).collect()
    }

    /// Snapshot of own entries in enumeration order
    ///
    /// The lock is released before this returns, so callers may recurse into
    /// the values (including this object again) freely.
    pub fn entries(&self) -> Vec<(String, Value)> {
        let mut entries = self.0.entries.read().slots.clone();
        enumeration_order(&mut entries);
        entries
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never recurse into entries: the graph may be cyclic
        write!(f, "Object({}, {} keys)", self.id(), self.len())
    }
}

// ============================================================================
// Array
// ============================================================================

/// Shared ordered sequence
///
/// Like [`Object`], an array that holds a handle to itself leaks until the
/// cycle is broken with [`Array::clear`].
#[derive(Clone, Default)]
pub struct Array(Arc<RwLock<Vec<Value>>>);

impl Array {
    /// Create an empty array
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an array from values
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        Self(Arc::new(RwLock::new(values.into_iter().collect())))
    }

    /// Identity of this array
    pub fn id(&self) -> NodeId {
        NodeId(Arc::as_ptr(&self.0) as *const () as usize)
    }

    /// Whether both handles point at the same array
    pub fn ptr_eq(&self, other: &Array) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn push(&self, value: Value) {
        self.0.write().push(value);
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read().get(index).cloned()
    }

    /// Set an element, padding with `Undefined` when writing past the end
    pub fn set(&self, index: usize, value: Value) {
        let mut values = self.0.write();
        if index >= values.len() {
            values.resize(index + 1, Value::Undefined);
        }
        values[index] = value;
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    /// Remove all elements (breaks any cycles running through this array)
    pub fn clear(&self) {
        self.0.write().clear();
    }

    /// Snapshot of the elements
    pub fn values(&self) -> Vec<Value> {
        self.0.read().clone()
    }

    /// Snapshot of `(index key, element)` pairs, keys rendered as strings
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.values()
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect()
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Array({}, {} items)", self.id(), self.len())
    }
}

// ============================================================================
// Value Enum - Runtime values to be validated
// ============================================================================

/// Runtime value that can be validated
#[derive(Debug, Clone)]
pub enum Value {
    /// Absent value
    Undefined,
    /// Null value
    Null,
    /// Boolean value
    Boolean(bool),
    /// Number value (double precision, like every host number)
    Number(f64),
    /// String value
    String(String),
    /// Named function (not an object for `typeof` purposes)
    Function(Arc<str>),
    /// Keyed container with a prototype
    Object(Object),
    /// Ordered sequence
    Array(Array),
}

impl Value {
    /// Host `typeof` of this value (`null` reports `"object"`)
    pub fn type_of(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Function(_) => "function",
            Self::Null | Self::Object(_) | Self::Array(_) => "object",
        }
    }

    /// Get human-readable kind name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Array(_) => "array",
            other => other.type_of(),
        }
    }

    /// Check if value is null or undefined
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Null | Self::Undefined)
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Identity of a container value, `None` for primitives
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Self::Object(object) => Some(object.id()),
            Self::Array(array) => Some(array.id()),
            _ => None,
        }
    }

    /// Strict identity: containers by handle, primitives by value
    pub fn same_identity(&self, other: &Value) -> bool {
        self == other
    }

    /// Property lookup (`Undefined` when absent or not a container)
    pub fn property(&self, key: &str) -> Value {
        match self {
            Self::Object(object) => object.get(key).unwrap_or(Value::Undefined),
            Self::Array(array) => array_index(key)
                .and_then(|i| array.get(i as usize))
                .unwrap_or(Value::Undefined),
            _ => Value::Undefined,
        }
    }

    /// Whether a container has the property as an own key
    pub fn has_property(&self, key: &str) -> bool {
        match self {
            Self::Object(object) => object.contains_key(key),
            Self::Array(array) => array_index(key).is_some_and(|i| (i as usize) < array.len()),
            _ => false,
        }
    }
}

/// Render a number the way the host does (`1`, `1.5`, `NaN`, `Infinity`)
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == n.trunc() && n.abs() < 1e21 {
        format!("{}", n as i128)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", format_number(*n)),
            Self::String(s) => write!(f, "{}", s),
            Self::Function(name) => write!(f, "function {}() {{}}", name),
            Self::Object(object) => match object.prototype() {
                Prototype::Class(name) => write!(f, "[object {}]", name),
                _ => write!(f, "[object Object]"),
            },
            Self::Array(_) => write!(f, "[object Array]"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            (Self::Array(a), Self::Array(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Self::Object(object)
    }
}

impl From<Array> for Value {
    fn from(array: Array) -> Self {
        Self::Array(array)
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(Array::from_values(items.into_iter().map(Into::into)))
            }
            serde_json::Value::Object(fields) => Value::Object(Object::from_entries(
                fields.into_iter().map(|(k, v)| (k, Value::from(v))),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_of() {
        assert_eq!(Value::Undefined.type_of(), "undefined");
        assert_eq!(Value::Null.type_of(), "object");
        assert_eq!(Value::Boolean(true).type_of(), "boolean");
        assert_eq!(Value::Number(1.0).type_of(), "number");
        assert_eq!(Value::from("x").type_of(), "string");
        assert_eq!(Value::Function("f".into()).type_of(), "function");
        assert_eq!(Value::Array(Array::new()).type_of(), "object");
    }

    #[test]
    fn test_value_kind_name() {
        assert_eq!(Value::Null.kind_name(), "null");
        assert_eq!(Value::Array(Array::new()).kind_name(), "array");
        assert_eq!(Value::Object(Object::new()).kind_name(), "object");
    }

    #[test]
    fn test_object_identity_survives_clone() {
        let object = Object::new();
        let a = Value::Object(object.clone());
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a.node_id(), Some(object.id()));
        assert_ne!(a, Value::Object(Object::new()));
    }

    #[test]
    fn test_object_enumeration_order() {
        let object = Object::new();
        object.set("b", Value::Null);
        object.set("10", Value::Null);
        object.set("a", Value::Null);
        object.set("2", Value::Null);
        object.set("01", Value::Null);
        assert_eq!(object.keys(), vec!["2", "10", "b", "a", "01"]);
    }

    #[test]
    fn test_object_set_replaces_in_place() {
        let object = Object::from_entries([("a", Value::from(1)), ("b", Value::from(2))]);
        object.set("a", Value::from(3));
        assert_eq!(object.keys(), vec!["a", "b"]);
        assert_eq!(object.get("a"), Some(Value::from(3)));
    }

    #[test]
    fn test_object_remove_keeps_lookup_consistent() {
        let object = Object::from_entries([
            ("a", Value::from(1)),
            ("b", Value::from(2)),
            ("c", Value::from(3)),
        ]);
        assert_eq!(object.remove("a"), Some(Value::from(1)));
        assert_eq!(object.remove("a"), None);
        assert_eq!(object.get("c"), Some(Value::from(3)));
        object.set("c", Value::from(4));
        object.set("a", Value::from(5));
        assert_eq!(object.keys(), vec!["b", "c", "a"]);
        assert_eq!(object.get("c"), Some(Value::from(4)));
        assert!(!object.contains_key("d"));
    }

    #[test]
    fn test_large_object_from_entries() {
        let size: i32 = 100_000;
        let object = Object::from_entries((0..size).map(|i| (format!("key_{}", i), Value::from(i))));
        assert_eq!(object.len(), size as usize);
        assert_eq!(object.get("key_99999"), Some(Value::from(99_999)));

        let duplicated = Object::from_entries((0..size).map(|i| ("same", Value::from(i))));
        assert_eq!(duplicated.len(), 1);
        assert_eq!(duplicated.get("same"), Some(Value::from(size - 1)));
    }

    #[test]
    fn test_cyclic_debug_does_not_recurse() {
        let object = Object::new();
        object.set("self", Value::Object(object.clone()));
        let rendered = format!("{:?}", Value::Object(object.clone()));
        assert!(rendered.contains("1 keys"));
        object.clear();
    }

    #[test]
    fn test_array_set_pads_with_undefined() {
        let array = Array::new();
        array.set(2, Value::from(1));
        assert_eq!(array.len(), 3);
        assert_eq!(array.get(0), Some(Value::Undefined));
        assert_eq!(array.entries()[2].0, "2");
    }

    #[test]
    fn test_property_lookup() {
        let array = Value::Array(Array::from_values([Value::from("x")]));
        assert_eq!(array.property("0"), Value::from("x"));
        assert_eq!(array.property("1"), Value::Undefined);
        assert_eq!(Value::from(1).property("a"), Value::Undefined);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json() {
        let value = Value::from(serde_json::json!({"a": [1, "two", null]}));
        let items = value.property("a");
        assert_eq!(items.as_array().map(Array::len), Some(3));
        assert_eq!(items.property("1"), Value::from("two"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_large_json_object() {
        let fields: serde_json::Map<String, serde_json::Value> =
            (0..50_000).map(|i| (format!("k{}", i), serde_json::Value::from(i))).collect();
        let value = Value::from(serde_json::Value::Object(fields));
        assert_eq!(value.as_object().map(Object::len), Some(50_000));
        assert_eq!(value.property("k49999"), Value::from(49_999));
    }
}
