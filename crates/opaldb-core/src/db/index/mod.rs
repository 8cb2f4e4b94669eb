
use crate::{
    db::{
        location::{KeyOrdered, Location},
        record::Record,
    },
    error::{ErrorOrigin, StoreError},
    key::{Key, KeySelector},
    value::Value,
};
use derive_more::{Deref, DerefMut};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// IndexModel
///
/// Definition of one secondary ordering: the key path extracted from each
/// record's payload, plus the `unique` and `multi_entry` flags.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IndexModel {
    pub name: String,
    pub key_path: String,
    pub unique: bool,
    pub multi_entry: bool,
}

impl IndexModel {
    #[must_use]
    pub fn new(name: impl Into<String>, key_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_path: key_path.into(),
            unique: false,
            multi_entry: false,
        }
    }

    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    #[must_use]
    pub const fn multi_entry(mut self) -> Self {
        self.multi_entry = true;
        self
    }

    /// Derive the index keys a payload contributes under this model.
    ///
    /// A missing key path or a non-key extraction yields no entries (the
    /// record simply is not indexed); a multi-entry extraction of a list
    /// yields one key per convertible element, deduplicated.
    #[must_use]
    pub fn derive_keys(&self, value: &Value) -> Vec<Key> {
        let Some(extracted) = value.get_path(&self.key_path) else {
            return Vec::new();
        };

        if self.multi_entry
            && let Value::List(elements) = extracted
        {
            let mut keys: Vec<Key> = elements
                .iter()
                .filter_map(|element| element.to_key().ok())
                .filter(|key| key.validate().is_ok())
                .collect();
            keys.sort();
            keys.dedup();
            return keys;
        }

        match extracted.to_key() {
            Ok(key) if key.validate().is_ok() => vec![key],
            _ => Vec::new(),
        }
    }
}

///
/// IndexEntry
///
/// One entry in a secondary ordering: the derived index key and the primary
/// key of the record it references. Entries are ordered by
/// (index key, primary key) so duplicate index keys stay deterministic.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IndexEntry {
    pub key: Key,
    pub primary: Key,
}

impl KeyOrdered for IndexEntry {
    fn sort_key(&self) -> &Key {
        &self.key
    }
}

///
/// IndexStore
///
/// The ordered entry sequence for one index. Location-addressable: lookups
/// reuse the same binary search as the primary record sequence.
///

#[derive(Clone, Debug)]
pub struct IndexStore {
    model: IndexModel,
    entries: Vec<IndexEntry>,
}

impl IndexStore {
    /// Build an index over existing records, validating the unique
    /// constraint before anything is installed.
    pub fn build(model: IndexModel, records: &[Record]) -> Result<Self, StoreError> {
        let mut store = Self {
            model,
            entries: Vec::new(),
        };

        for record in records {
            let derived = store.model.derive_keys(record.value());
            store.check_unique(&derived, record.key())?;
            store.insert_entries(record.key(), derived);
        }

        Ok(store)
    }

    #[must_use]
    pub const fn model(&self) -> &IndexModel {
        &self.model
    }

    #[must_use]
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Fail with a conflict when any derived key is already owned by a
    /// different primary record under a unique index.
    pub(crate) fn check_unique(&self, derived: &[Key], primary: &Key) -> Result<(), StoreError> {
        if !self.model.unique {
            return Ok(());
        }

        for key in derived {
            let location = Location::search(&self.entries, key);
            if let Some(entry) = location.element()
                && entry.primary != *primary
            {
                return Err(StoreError::conflict(
                    ErrorOrigin::Index,
                    format!(
                        "unique index violation: {} ({key})",
                        self.model.name
                    ),
                ));
            }
        }

        Ok(())
    }

    /// Insert entries for one primary record at their sorted positions.
    pub(crate) fn insert_entries(&mut self, primary: &Key, derived: Vec<Key>) {
        for key in derived {
            let at = self.entries.partition_point(|entry| {
                (&entry.key, &entry.primary) < (&key, primary)
            });
            self.entries.insert(
                at,
                IndexEntry {
                    key,
                    primary: primary.clone(),
                },
            );
        }
    }

    /// Remove the entries a primary record contributed for the given payload.
    pub(crate) fn remove_entries(&mut self, primary: &Key, value: &Value) {
        let derived = self.model.derive_keys(value);
        for key in derived {
            let at = self.entries.partition_point(|entry| {
                (&entry.key, &entry.primary) < (&key, primary)
            });
            if self
                .entries
                .get(at)
                .is_some_and(|entry| entry.key == key && &entry.primary == primary)
            {
                self.entries.remove(at);
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Resolve the primary keys whose derived index keys match the selector,
    /// in index-key order.
    #[must_use]
    pub fn lookup(&self, selector: &KeySelector) -> Vec<&Key> {
        let location = Location::search_selector(&self.entries, selector);
        let Some(start) = location.eq() else {
            return Vec::new();
        };

        self.entries[start..]
            .iter()
            .take_while(|entry| selector.contains(&entry.key))
            .map(|entry| &entry.primary)
            .collect()
    }
}

///
/// IndexRegistry
///
/// Named index stores for one primary store.
///

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct IndexRegistry(BTreeMap<String, IndexStore>);

impl IndexRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }
}
