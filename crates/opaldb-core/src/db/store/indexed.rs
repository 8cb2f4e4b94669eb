use crate::{
    db::{
        index::{IndexModel, IndexRegistry, IndexStore},
        location::Location,
        record::{Record, Tags},
        store::{PutOptions, StoreProcedures, resolve_record_key},
    },
    error::{ErrorOrigin, StoreError},
    key::{Key, KeySelector},
    value::Value,
};

///
/// IndexedStore
///
/// The indexed store variant: the same ordered record array as the natural
/// store, with every store/delete/clear additionally threaded through each
/// registered secondary index. Unique constraints are checked before any
/// state changes, so a rejected record leaves both the primary sequence and
/// every index untouched.
///

#[derive(Clone, Debug, Default)]
pub struct IndexedStore {
    key_path: Option<String>,
    records: Vec<Record>,
    indexes: IndexRegistry,
}

impl IndexedStore {
    #[must_use]
    pub fn new(key_path: Option<String>) -> Self {
        Self {
            key_path,
            records: Vec::new(),
            indexes: IndexRegistry::new(),
        }
    }

    #[must_use]
    pub fn index(&self, name: &str) -> Option<&IndexStore> {
        self.indexes.get(name)
    }

    #[must_use]
    pub fn index_models(&self) -> Vec<&IndexModel> {
        self.indexes.values().map(IndexStore::model).collect()
    }

    /// Register an index, building entries over existing records. A unique
    /// violation in the existing data fails without installing anything.
    pub fn create_index(&mut self, model: IndexModel) -> Result<(), StoreError> {
        if self.indexes.contains_key(&model.name) {
            return Err(StoreError::conflict(
                ErrorOrigin::Index,
                format!("index already exists: {}", model.name),
            ));
        }

        let name = model.name.clone();
        let built = IndexStore::build(model, &self.records)?;
        self.indexes.insert(name, built);

        Ok(())
    }

    /// Drop an index and its entries, returning its model.
    pub fn delete_index(&mut self, name: &str) -> Result<IndexModel, StoreError> {
        self.indexes
            .remove(name)
            .map(|index| index.model().clone())
            .ok_or_else(|| {
                StoreError::not_found(ErrorOrigin::Index, format!("no such index: {name}"))
            })
    }

    fn matching_span(&self, selector: &KeySelector) -> Option<(usize, usize)> {
        let location = Location::search_selector(&self.records, selector);
        let start = location.eq()?;
        let end = start
            + self.records[start..]
                .iter()
                .take_while(|record| selector.contains(record.key()))
                .count();

        Some((start, end))
    }

    fn unindex_record(indexes: &mut IndexRegistry, record: &Record) {
        for index in indexes.values_mut() {
            index.remove_entries(record.key(), record.value());
        }
    }
}

impl StoreProcedures for IndexedStore {
    fn key_path(&self) -> Option<&str> {
        self.key_path.as_deref()
    }

    fn records(&self) -> &[Record] {
        &self.records
    }

    fn clear_records(&mut self) -> Vec<Record> {
        for index in self.indexes.values_mut() {
            index.clear();
        }

        std::mem::take(&mut self.records)
    }

    fn delete_key_range(&mut self, selector: &KeySelector) -> Result<bool, StoreError> {
        if let KeySelector::Key(key) = selector {
            key.validate()?;
        }

        let Some((start, end)) = self.matching_span(selector) else {
            return Ok(false);
        };

        let removed: Vec<Record> = self.records.drain(start..end).collect();
        for record in &removed {
            Self::unindex_record(&mut self.indexes, record);
        }

        Ok(true)
    }

    fn retrieve_record(&self, selector: &KeySelector) -> Location<'_, Record> {
        Location::search_selector(&self.records, selector)
    }

    fn store_record(
        &mut self,
        value: Value,
        options: &PutOptions,
        tags: Tags,
    ) -> Result<Key, StoreError> {
        let key = resolve_record_key(self.key_path.as_deref(), &value, options.key.as_ref())?;
        key.validate()?;

        let location = Location::search(&self.records, &key);
        let existing = location.eq();
        let insert_at = location.gt();

        if existing.is_some() && !options.overwrite {
            return Err(StoreError::conflict(
                ErrorOrigin::Store,
                format!("duplicate key: {key}"),
            ));
        }

        // Derive every index delta and check unique constraints before any
        // mutation; a rejected record must leave the store untouched.
        let derived: Vec<Vec<Key>> = self
            .indexes
            .values()
            .map(|index| index.model().derive_keys(&value))
            .collect();
        for (index, keys) in self.indexes.values().zip(&derived) {
            index.check_unique(keys, &key)?;
        }

        match existing {
            Some(at) => {
                let (prior_value, _) = self.records[at].replace(value, tags);
                for index in self.indexes.values_mut() {
                    index.remove_entries(&key, &prior_value);
                }
            }
            None => {
                self.records
                    .insert(insert_at, Record::new(key.clone(), value, tags));
            }
        }

        for (index, keys) in self.indexes.values_mut().zip(derived) {
            index.insert_entries(&key, keys);
        }

        Ok(key)
    }
}
