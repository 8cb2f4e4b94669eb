use crate::{key::Key, value::Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// Tags
///
/// Open out-of-band metadata attached to a record by extensions (revision
/// counters, staleness flags). Never interpreted by the core.
///

pub type Tags = BTreeMap<String, Value>;

///
/// Record
///
/// A stored value together with its resolved primary key and metadata tags.
/// Records are mutated in place by overwrites; deletion transfers ownership
/// of the record out of the store, so a removed record can never be reached
/// through the store again.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Record {
    pub(crate) key: Key,
    pub(crate) value: Value,
    pub(crate) tags: Tags,
}

impl Record {
    #[must_use]
    pub const fn new(key: Key, value: Value, tags: Tags) -> Self {
        Self { key, value, tags }
    }

    #[must_use]
    pub const fn key(&self) -> &Key {
        &self.key
    }

    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    #[must_use]
    pub const fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Replace the payload and tags, keeping the key. Overwrite semantics:
    /// the prior value and tags are returned to the caller.
    pub(crate) fn replace(&mut self, value: Value, tags: Tags) -> (Value, Tags) {
        let prior_value = std::mem::replace(&mut self.value, value);
        let prior_tags = std::mem::replace(&mut self.tags, tags);

        (prior_value, prior_tags)
    }

    #[must_use]
    pub fn into_parts(self) -> (Key, Value, Tags) {
        (self.key, self.value, self.tags)
    }
}
