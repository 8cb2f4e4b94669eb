mod range;

pub use range::{KeyRange, KeySelector};

use crate::{
    error::{ErrorOrigin, StoreError},
    types::{Float64, Timestamp},
};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

///
/// Key
///
/// The atomic, normalized unit of the keyspace. Primary keys and secondary
/// index keys share this one representation.
///
/// Cross-variant ordering is canonical-rank ordering:
/// number < date < string < array. List keys compare lexicographically
/// element-by-element, with a shorter prefix ordering first.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Key {
    Number(Float64),
    Timestamp(Timestamp),
    Text(String),
    List(Vec<Key>),
}

impl Key {
    // ── Variant ranks (do not reorder) ─────────────────
    const RANK_NUMBER: u8 = 0;
    const RANK_TIMESTAMP: u8 = 1;
    const RANK_TEXT: u8 = 2;
    const RANK_LIST: u8 = 3;

    const fn variant_rank(&self) -> u8 {
        match self {
            Self::Number(_) => Self::RANK_NUMBER,
            Self::Timestamp(_) => Self::RANK_TIMESTAMP,
            Self::Text(_) => Self::RANK_TEXT,
            Self::List(_) => Self::RANK_LIST,
        }
    }

    /// Build a number key, rejecting NaN and infinities with a data error.
    pub fn try_from_f64(value: f64) -> Result<Self, StoreError> {
        Float64::try_new(value).map(Self::Number)
    }

    /// Validate this key for a key-bearing position (primary or index key).
    ///
    /// Empty list keys carry no ordering information and are rejected here;
    /// range bounds do not go through this check.
    pub fn validate(&self) -> Result<(), StoreError> {
        match self {
            Self::Number(_) | Self::Timestamp(_) | Self::Text(_) => Ok(()),
            Self::List(elements) => {
                if elements.is_empty() {
                    return Err(StoreError::data(ErrorOrigin::Key, "empty list key"));
                }
                for element in elements {
                    element.validate()?;
                }
                Ok(())
            }
        }
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => Ord::cmp(a, b),
            (Self::Timestamp(a), Self::Timestamp(b)) => Ord::cmp(a, b),
            (Self::Text(a), Self::Text(b)) => Ord::cmp(a, b),
            (Self::List(a), Self::List(b)) => cmp_lists(a, b),

            _ => Ord::cmp(&self.variant_rank(), &other.variant_rank()), // fallback for cross-type comparison
        }
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(Ord::cmp(self, other))
    }
}

// Element-wise comparison, then length: a shorter prefix orders first.
fn cmp_lists(left: &[Key], right: &[Key]) -> Ordering {
    for (left, right) in left.iter().zip(right.iter()) {
        let cmp = Ord::cmp(left, right);
        if cmp != Ordering::Equal {
            return cmp;
        }
    }

    left.len().cmp(&right.len())
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Timestamp(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
            Self::List(elements) => {
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{element}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Self::Number(Float64::from(value))
    }
}

impl From<u32> for Key {
    fn from(value: u32) -> Self {
        Self::Number(Float64::from(value))
    }
}

impl From<Float64> for Key {
    fn from(value: Float64) -> Self {
        Self::Number(value)
    }
}

impl From<Timestamp> for Key {
    fn from(value: Timestamp) -> Self {
        Self::Timestamp(value)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<Key>> for Key {
    fn from(elements: Vec<Key>) -> Self {
        Self::List(elements)
    }
}
