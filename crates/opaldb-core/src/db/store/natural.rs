use crate::{
    db::{
        location::Location,
        record::{Record, Tags},
        store::{PutOptions, StoreProcedures, resolve_record_key},
    },
    error::{ErrorOrigin, StoreError},
    key::{Key, KeySelector},
    value::Value,
};

///
/// NaturalStore
///
/// The flat store variant: one physically ordered record array, maintained
/// by splicing at binary-search insertion points. No secondary orderings.
///

#[derive(Clone, Debug, Default)]
pub struct NaturalStore {
    key_path: Option<String>,
    records: Vec<Record>,
}

impl NaturalStore {
    #[must_use]
    pub const fn new(key_path: Option<String>) -> Self {
        Self {
            key_path,
            records: Vec::new(),
        }
    }

    // The contiguous span of records a selector addresses, if any.
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
}

impl StoreProcedures for NaturalStore {
    fn key_path(&self) -> Option<&str> {
        self.key_path.as_deref()
    }

    fn records(&self) -> &[Record] {
        &self.records
    }

    fn clear_records(&mut self) -> Vec<Record> {
        std::mem::take(&mut self.records)
    }

    fn delete_key_range(&mut self, selector: &KeySelector) -> Result<bool, StoreError> {
        if let KeySelector::Key(key) = selector {
            key.validate()?;
        }

        let Some((start, end)) = self.matching_span(selector) else {
            return Ok(false);
        };

        self.records.drain(start..end);

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
        match location.eq() {
            Some(at) => {
                if !options.overwrite {
                    return Err(StoreError::conflict(
                        ErrorOrigin::Store,
                        format!("duplicate key: {key}"),
                    ));
                }
                self.records[at].replace(value, tags);
            }
            None => {
                let at = location.gt();
                self.records.insert(at, Record::new(key.clone(), value, tags));
            }
        }

        Ok(key)
    }
}
