pub mod compare;

use crate::{
    error::{ErrorOrigin, StoreError},
    key::Key,
    types::{Float64, Timestamp},
};
use serde::{Deserialize, Serialize};

///
/// Value
///
/// Self-describing stored payload. Records, index extractions, sort
/// properties, and tags all carry this one representation.
///
/// Map entries preserve insertion order; field lookup is linear, which is
/// the right trade for the small structured payloads this store holds.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(Float64),
    Text(String),
    Timestamp(Timestamp),
    List(Vec<Value>),
    Map(Vec<(String, Value)>),
}

impl Value {
    // ── Canonical ranks (do not reorder) ─────────────────
    pub(crate) const fn canonical_rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) => 2,
            Self::Uint(_) => 3,
            Self::Float(_) => 4,
            Self::Text(_) => 5,
            Self::Timestamp(_) => 6,
            Self::List(_) => 7,
            Self::Map(_) => 8,
        }
    }

    /// Build a map value from field/value pairs.
    pub fn map<S, I>(entries: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Value)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(field, value)| (field.into(), value))
                .collect(),
        )
    }

    /// Look up a direct field on a map value.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Self> {
        match self {
            Self::Map(entries) => entries
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Walk a dotted key path (`"a.b.c"`) through nested maps.
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&Self> {
        let mut current = self;
        for segment in path.split('.') {
            current = current.field(segment)?;
        }

        Some(current)
    }

    /// Convert this value into a key, failing with a data error for
    /// variants outside the key space.
    #[allow(clippy::cast_precision_loss)]
    pub fn to_key(&self) -> Result<Key, StoreError> {
        match self {
            Self::Int(v) => Key::try_from_f64(*v as f64),
            Self::Uint(v) => Key::try_from_f64(*v as f64),
            Self::Float(v) => Ok(Key::Number(*v)),
            Self::Text(v) => Ok(Key::Text(v.clone())),
            Self::Timestamp(v) => Ok(Key::Timestamp(*v)),
            Self::List(elements) => {
                let keys = elements
                    .iter()
                    .map(Self::to_key)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Key::List(keys))
            }
            Self::Null | Self::Bool(_) | Self::Map(_) => Err(StoreError::data(
                ErrorOrigin::Value,
                format!("value is not a valid key: {self:?}"),
            )),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Uint(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        Self::Timestamp(value)
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        match key {
            Key::Number(v) => Self::Float(v),
            Key::Timestamp(v) => Self::Timestamp(v),
            Key::Text(v) => Self::Text(v),
            Key::List(elements) => Self::List(elements.into_iter().map(Self::from).collect()),
        }
    }
}
