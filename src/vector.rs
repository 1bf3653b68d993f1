use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::schema::{self, FeatureDefault, FeatureKind, FEATURES};

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
    TextSet(Vec<String>),
    Counts(Vec<(String, u64)>),
}

impl FeatureValue {
    pub fn kind(&self) -> FeatureKind {
        match self {
            FeatureValue::Integer(_) => FeatureKind::Integer,
            FeatureValue::Float(_) => FeatureKind::Float,
            FeatureValue::Boolean(_) => FeatureKind::Boolean,
            FeatureValue::Text(_) => FeatureKind::Text,
            FeatureValue::TextSet(_) => FeatureKind::TextSet,
            FeatureValue::Counts(_) => FeatureKind::Counts,
        }
    }
}

impl From<FeatureDefault> for FeatureValue {
    fn from(default: FeatureDefault) -> Self {
        match default {
            FeatureDefault::Integer(v) => FeatureValue::Integer(v),
            FeatureDefault::Float(v) => FeatureValue::Float(v),
            FeatureDefault::Boolean(v) => FeatureValue::Boolean(v),
            FeatureDefault::EmptyText => FeatureValue::Text(String::new()),
            FeatureDefault::EmptySet => FeatureValue::TextSet(Vec::new()),
            FeatureDefault::EmptyCounts => FeatureValue::Counts(Vec::new()),
        }
    }
}

impl From<usize> for FeatureValue {
    fn from(v: usize) -> Self {
        FeatureValue::Integer(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<i64> for FeatureValue {
    fn from(v: i64) -> Self {
        FeatureValue::Integer(v)
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Float(v)
    }
}

impl From<bool> for FeatureValue {
    fn from(v: bool) -> Self {
        FeatureValue::Boolean(v)
    }
}

impl From<String> for FeatureValue {
    fn from(v: String) -> Self {
        FeatureValue::Text(v)
    }
}

impl From<Vec<String>> for FeatureValue {
    fn from(v: Vec<String>) -> Self {
        FeatureValue::TextSet(v)
    }
}

impl Serialize for FeatureValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FeatureValue::Integer(v) => serializer.serialize_i64(*v),
            FeatureValue::Float(v) => serializer.serialize_f64(*v),
            FeatureValue::Boolean(v) => serializer.serialize_bool(*v),
            FeatureValue::Text(v) => serializer.serialize_str(v),
            FeatureValue::TextSet(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            FeatureValue::Counts(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, count) in entries {
                    map.serialize_entry(key, count)?;
                }
                map.end()
            }
        }
    }
}

/// The complete feature set of one edit, in vocabulary order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<FeatureValue>,
}

impl FeatureVector {
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        schema::position(name).map(|i| &self.values[i])
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            FeatureValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            FeatureValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            FeatureValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            FeatureValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn text_set(&self, name: &str) -> Option<&[String]> {
        match self.get(name)? {
            FeatureValue::TextSet(v) => Some(v),
            _ => None,
        }
    }

    pub fn counts(&self, name: &str) -> Option<&[(String, u64)]> {
        match self.get(name)? {
            FeatureValue::Counts(v) => Some(v),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FeatureValue)> + '_ {
        FEATURES.iter().map(|spec| spec.name).zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Serialize as one line of JSON, keys in vocabulary order.
    pub fn to_json_line(&self) -> String {
        // Keys are static strings and floats are always finite.
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// Anything left unset takes its schema default.
#[derive(Debug)]
pub(crate) struct FeatureVectorBuilder {
    values: Vec<Option<FeatureValue>>,
}

impl FeatureVectorBuilder {
    pub(crate) fn new() -> Self {
        Self {
            values: vec![None; FEATURES.len()],
        }
    }

    pub(crate) fn set(&mut self, name: &'static str, value: impl Into<FeatureValue>) {
        let value = value.into();
        let Some(i) = schema::position(name) else {
            debug_assert!(false, "feature `{name}` is not in the vocabulary");
            return;
        };
        debug_assert_eq!(
            FEATURES[i].kind(),
            value.kind(),
            "feature `{name}` has the wrong kind"
        );
        self.values[i] = Some(value);
    }

    pub(crate) fn finish(self) -> FeatureVector {
        let values = self
            .values
            .into_iter()
            .zip(FEATURES)
            .map(|(value, spec)| value.unwrap_or_else(|| spec.default.into()))
            .collect();
        FeatureVector { values }
    }
}
