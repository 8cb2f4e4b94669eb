use crate::error::{ErrorOrigin, StoreError};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

///
/// Float64
///
/// Finite, totally ordered f64 wrapper backing numeric keys and values.
/// NaN and infinities are rejected at construction, which keeps the derived
/// `Eq`/`Ord` lawful without resorting to bit tricks.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Serialize)]
#[serde(transparent)]
pub struct Float64(f64);

impl Float64 {
    pub fn try_new(value: f64) -> Result<Self, StoreError> {
        if value.is_finite() {
            // Normalize -0.0 so the keyspace has a single zero under total_cmp.
            Ok(Self(if value == 0.0 { 0.0 } else { value }))
        } else {
            Err(StoreError::data(
                ErrorOrigin::Key,
                format!("invalid number: {value} is not finite"),
            ))
        }
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for Float64 {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for Float64 {}

impl PartialOrd for Float64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(Ord::cmp(self, other))
    }
}

impl Ord for Float64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Float64 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Construction normalizes -0.0, so bit equality matches value equality.
        self.0.to_bits().hash(state);
    }
}

impl TryFrom<f64> for Float64 {
    type Error = StoreError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<i32> for Float64 {
    fn from(value: i32) -> Self {
        Self(f64::from(value))
    }
}

impl From<u32> for Float64 {
    fn from(value: u32) -> Self {
        Self(f64::from(value))
    }
}

///
/// Timestamp
///
/// Milliseconds since the Unix epoch. Backs date-valued keys; the engine
/// never interprets it beyond ordering.
///

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    #[must_use]
    pub const fn new(millis: u64) -> Self {
        Self(millis)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for Timestamp {
    fn from(millis: u64) -> Self {
        Self(millis)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

///
/// TESTS
///
