//! Ordered field-name → value mapping for one market observation.

use std::fmt;

use serde::Serialize;
use serde::ser::SerializeMap;
use serde_json::{Map, Value};

use crate::error::CgError;

/// A single scalar field value.
///
/// Timestamps travel as already-formatted [`FieldValue::Str`] values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Float(f64),
}

impl FieldValue {
    /// Convert a JSON scalar. Returns `None` for `null`, booleans, arrays
    /// and objects, none of which a record can hold.
    pub fn from_json(v: &Value) -> Option<Self> {
        match v {
            Value::String(s) => Some(Self::Str(s.clone())),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Int(i)),
                None => n.as_f64().map(Self::Float),
            },
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view. Strings are never numeric here.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Str(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Str(_))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            // Plain decimal, never exponent form; integral values keep `.0`.
            Self::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x}.0"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

/// One market entity at one observation instant.
///
/// Field order is insertion order and is preserved through every stage and
/// into the serialized output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            fields: Vec::with_capacity(n),
        }
    }

    /// Build a record from a JSON object, skipping values that are not
    /// scalars. Returns `None` if `v` is not an object.
    pub fn from_json(v: &Value) -> Option<Self> {
        v.as_object().map(Self::from_object)
    }

    /// Build a record from every scalar field of `obj`, in object order.
    pub fn from_object(obj: &Map<String, Value>) -> Self {
        obj.iter()
            .filter_map(|(k, v)| FieldValue::from_json(v).map(|fv| (k.clone(), fv)))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.fields
            .iter_mut()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set `name` to `value`. An existing field keeps its position and the
    /// previous value is returned; a new field is appended.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        let name = name.into();
        let value = value.into();
        match self.get_mut(&name) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((name, value));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        let idx = self.fields.iter().position(|(k, _)| k == name)?;
        Some(self.fields.remove(idx).1)
    }

    /// Rename `from` to `to` in place. Any existing `to` field is replaced.
    /// Returns `false` if `from` is absent.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        if !self.contains(from) {
            return false;
        }
        if from == to {
            return true;
        }
        self.fields.retain(|(k, _)| k != to);
        if let Some(entry) = self.fields.iter_mut().find(|(k, _)| k == from) {
            entry.0 = to.to_string();
        }
        true
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        let mut rec = Record::new();
        for (k, v) in iter {
            rec.insert(k, v);
        }
        rec
    }
}

impl Serialize for Record {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Check that `payload` is an array of objects and return the first
/// `limit` of them.
///
/// Any other shape is a batch-level [`CgError::Structure`]; elements past
/// `limit` are not inspected.
pub fn json_objects(payload: &Value, limit: usize) -> Result<Vec<&Map<String, Value>>, CgError> {
    let entries = payload.as_array().ok_or_else(|| {
        CgError::Structure(format!("expected a JSON array, got {}", json_kind(payload)))
    })?;

    entries
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, entry)| {
            entry.as_object().ok_or_else(|| {
                CgError::Structure(format!("element {i} is {}, expected an object", json_kind(entry)))
            })
        })
        .collect()
}

/// Short name of a JSON value's type, for error messages.
pub fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
