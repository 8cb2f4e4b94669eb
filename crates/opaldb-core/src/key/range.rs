use crate::{
    error::{ErrorOrigin, StoreError},
    key::Key,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

///
/// KeyRange
///
/// A bounded interval over the key ordering. Each bound is optional and
/// independently open (exclusive) or closed (inclusive). A range whose
/// bounds are equal and closed matches exactly one key; an equal pair with
/// either bound open is empty.
///
/// Invariant: `lower <= upper` whenever both bounds are present.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct KeyRange {
    lower: Option<Key>,
    upper: Option<Key>,
    lower_open: bool,
    upper_open: bool,
}

impl KeyRange {
    /// Construct a range, failing with a data error when `lower > upper`.
    pub fn new(
        lower: Option<Key>,
        upper: Option<Key>,
        lower_open: bool,
        upper_open: bool,
    ) -> Result<Self, StoreError> {
        if let (Some(lower), Some(upper)) = (&lower, &upper)
            && lower > upper
        {
            return Err(StoreError::data(
                ErrorOrigin::Key,
                format!("invalid range: lower bound {lower} exceeds upper bound {upper}"),
            ));
        }

        Ok(Self {
            lower,
            upper,
            lower_open,
            upper_open,
        })
    }

    /// The degenerate single-key range.
    #[must_use]
    pub fn only(key: Key) -> Self {
        Self {
            lower: Some(key.clone()),
            upper: Some(key),
            lower_open: false,
            upper_open: false,
        }
    }

    /// All keys at or above `key` (above only, when `open`).
    #[must_use]
    pub const fn lower_bound(key: Key, open: bool) -> Self {
        Self {
            lower: Some(key),
            upper: None,
            lower_open: open,
            upper_open: false,
        }
    }

    /// All keys at or below `key` (below only, when `open`).
    #[must_use]
    pub const fn upper_bound(key: Key, open: bool) -> Self {
        Self {
            lower: None,
            upper: Some(key),
            lower_open: false,
            upper_open: open,
        }
    }

    /// The unbounded range.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            lower: None,
            upper: None,
            lower_open: false,
            upper_open: false,
        }
    }

    #[must_use]
    pub const fn lower(&self) -> Option<&Key> {
        self.lower.as_ref()
    }

    #[must_use]
    pub const fn upper(&self) -> Option<&Key> {
        self.upper.as_ref()
    }

    #[must_use]
    pub const fn lower_open(&self) -> bool {
        self.lower_open
    }

    #[must_use]
    pub const fn upper_open(&self) -> bool {
        self.upper_open
    }

    /// Range membership, honoring open/closed bounds.
    #[must_use]
    pub fn contains(&self, key: &Key) -> bool {
        if let Some(lower) = &self.lower {
            match Ord::cmp(key, lower) {
                Ordering::Less => return false,
                Ordering::Equal if self.lower_open => return false,
                _ => {}
            }
        }

        if let Some(upper) = &self.upper {
            match Ord::cmp(key, upper) {
                Ordering::Greater => return false,
                Ordering::Equal if self.upper_open => return false,
                _ => {}
            }
        }

        true
    }
}

///
/// KeySelector
///
/// The "key or range" argument accepted by the store procedures.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum KeySelector {
    Key(Key),
    Range(KeyRange),
}

impl KeySelector {
    #[must_use]
    pub fn contains(&self, key: &Key) -> bool {
        match self {
            Self::Key(probe) => probe == key,
            Self::Range(range) => range.contains(key),
        }
    }
}

impl From<Key> for KeySelector {
    fn from(key: Key) -> Self {
        Self::Key(key)
    }
}

impl From<KeyRange> for KeySelector {
    fn from(range: KeyRange) -> Self {
        Self::Range(range)
    }
}
