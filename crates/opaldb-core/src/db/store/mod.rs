mod indexed;
mod natural;
#[cfg(test)]
mod tests;

pub use indexed::IndexedStore;
pub use natural::NaturalStore;

use crate::{
    db::{
        index::{IndexModel, IndexStore},
        location::Location,
        query::QueryOptions,
        record::{Record, Tags},
        txn::{Opcode, TxnMode},
    },
    error::{ErrorOrigin, StoreError},
    key::{Key, KeySelector},
    obs::{ChangeEvent, ChangeSink},
    value::Value,
};
use std::{fmt, rc::Rc};

///
/// StoreProcedures
///
/// The primitive contract every concrete store variant satisfies. All
/// higher-level operations compose these four mutations plus the two read
/// accessors; the facade never reaches into a variant's internals.
///
/// Being a trait bound, an incomplete variant is a compile error rather than
/// a runtime "not implemented" failure.
///

pub trait StoreProcedures {
    /// The configured key path, when the store resolves keys from payloads.
    fn key_path(&self) -> Option<&str>;

    /// The ordered record sequence.
    fn records(&self) -> &[Record];

    /// Remove every record (and every index entry, for indexed variants),
    /// returning the removed records. Never fails on an empty store.
    fn clear_records(&mut self) -> Vec<Record>;

    /// Remove every record matching the selector. Returns whether anything
    /// was removed; a selector with zero matches is not a failure.
    fn delete_key_range(&mut self, selector: &KeySelector) -> Result<bool, StoreError>;

    /// Locate the first record matching the selector, or a null-match
    /// location carrying the insertion point.
    fn retrieve_record(&self, selector: &KeySelector) -> Location<'_, Record>;

    /// Insert or overwrite one record, resolving its key from the configured
    /// key path or an explicit key. Returns the resolved key.
    fn store_record(
        &mut self,
        value: Value,
        options: &PutOptions,
        tags: Tags,
    ) -> Result<Key, StoreError>;
}

///
/// PutOptions
///

#[derive(Clone, Debug, Default)]
pub struct PutOptions {
    pub overwrite: bool,
    pub key: Option<Key>,
}

impl PutOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    #[must_use]
    pub fn with_key(mut self, key: Key) -> Self {
        self.key = Some(key);
        self
    }
}

///
/// StoreConfig
///
/// Explicitly constructed store policy: name, key path, and the optional
/// change sink. Caller-owned; there is no global defaults registry.
///

#[derive(Clone, Default)]
pub struct StoreConfig {
    pub name: String,
    pub key_path: Option<String>,
    pub sink: Option<Rc<dyn ChangeSink>>,
}

impl StoreConfig {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_path: None,
            sink: None,
        }
    }

    #[must_use]
    pub fn with_key_path(mut self, key_path: impl Into<String>) -> Self {
        self.key_path = Some(key_path.into());
        self
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Rc<dyn ChangeSink>) -> Self {
        self.sink = Some(sink);
        self
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("name", &self.name)
            .field("key_path", &self.key_path)
            .field("sink", &self.sink.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Resolve a record's key: an explicit key wins, otherwise the configured
/// key path is extracted from the payload.
pub(crate) fn resolve_record_key(
    key_path: Option<&str>,
    value: &Value,
    explicit: Option<&Key>,
) -> Result<Key, StoreError> {
    if let Some(key) = explicit {
        return Ok(key.clone());
    }

    let Some(path) = key_path else {
        return Err(StoreError::missing_parameter(ErrorOrigin::Store, "key"));
    };

    let Some(extracted) = value.get_path(path) else {
        return Err(StoreError::data(
            ErrorOrigin::Store,
            format!("key path not present on value: {path}"),
        ));
    };

    extracted.to_key()
}

///
/// Lease
///
/// The exclusive, mode-tagged claim a transaction holds on a store until it
/// reaches its terminal state.
///

#[derive(Clone, Copy, Debug)]
pub(crate) struct Lease {
    pub(crate) id: u64,
    pub(crate) mode: TxnMode,
}

///
/// Store
///
/// The public store facade: a procedures implementation decorated with
/// config, lease enforcement, and change emission. Callers use the
/// put/get/remove/clear/query wrappers; the primitives stay internal to the
/// engine and to variant implementations.
///

pub struct Store<P: StoreProcedures> {
    config: StoreConfig,
    procs: P,
    lease: Option<Lease>,
}

impl Store<NaturalStore> {
    /// A flat store backed by one physically ordered record array.
    #[must_use]
    pub fn natural(config: StoreConfig) -> Self {
        let procs = NaturalStore::new(config.key_path.clone());
        Self::with_procedures(config, procs)
    }
}

impl Store<IndexedStore> {
    /// A store that threads every mutation through its secondary indexes.
    #[must_use]
    pub fn indexed(config: StoreConfig) -> Self {
        let procs = IndexedStore::new(config.key_path.clone());
        Self::with_procedures(config, procs)
    }
}

impl<P: StoreProcedures> Store<P> {
    #[must_use]
    pub const fn with_procedures(config: StoreConfig, procs: P) -> Self {
        Self {
            config,
            procs,
            lease: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    #[must_use]
    pub fn key_path(&self) -> Option<&str> {
        self.procs.key_path()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.procs.records().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.procs.records().is_empty()
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        self.procs.records()
    }

    /// Locate the first record matching the selector.
    #[must_use]
    pub fn locate(&self, selector: &KeySelector) -> Location<'_, Record> {
        self.procs.retrieve_record(selector)
    }

    /// The payload stored under the first matching key, if any.
    #[must_use]
    pub fn get(&self, selector: &KeySelector) -> Option<&Value> {
        self.procs.retrieve_record(selector).value()
    }

    /// Insert or overwrite, resolving the key from the configured key path.
    pub fn put(&mut self, value: Value) -> Result<Key, StoreError> {
        self.put_with(value, PutOptions::new().overwrite(), Tags::new())
    }

    /// Insert only; a duplicate key is a conflict.
    pub fn add(&mut self, value: Value) -> Result<Key, StoreError> {
        self.put_with(value, PutOptions::new(), Tags::new())
    }

    pub fn put_with(
        &mut self,
        value: Value,
        options: PutOptions,
        tags: Tags,
    ) -> Result<Key, StoreError> {
        self.guarded_put(None, value, options, tags)
            .map(|(key, _)| key)
    }

    /// Remove every record matching the selector; `true` when any existed.
    pub fn remove(&mut self, selector: &KeySelector) -> Result<bool, StoreError> {
        self.guarded_remove(None, selector)
            .map(|removed| !removed.is_empty())
    }

    /// Remove everything, returning the removed records.
    pub fn clear(&mut self) -> Result<Vec<Record>, StoreError> {
        self.guarded_clear(None)
    }

    /// Run a query over the store's payloads.
    pub fn query(&self, options: &QueryOptions) -> Result<Vec<Value>, StoreError> {
        let mut rows: Vec<Value> = self
            .procs
            .records()
            .iter()
            .map(|record| record.value().clone())
            .collect();

        crate::db::query::apply(&mut rows, options)?;

        Ok(rows)
    }

    // ── Lease enforcement ─────────────────────────────

    pub(crate) fn acquire_lease(&mut self, id: u64, mode: TxnMode) -> Result<(), StoreError> {
        if let Some(lease) = self.lease {
            return Err(StoreError::access(
                ErrorOrigin::Store,
                format!(
                    "store {} is already bound to transaction {}",
                    self.config.name, lease.id
                ),
            ));
        }

        self.lease = Some(Lease { id, mode });

        Ok(())
    }

    pub(crate) fn release_lease(&mut self, id: u64) {
        if self.lease.is_some_and(|lease| lease.id == id) {
            self.lease = None;
        }
    }

    // A write is admitted when the store is unleased and the call came from
    // outside any transaction, or when the caller's lease matches.
    fn check_write_access(&self, caller: Option<u64>) -> Result<(), StoreError> {
        match (self.lease, caller) {
            (None, None) => Ok(()),
            (Some(lease), Some(id)) if lease.id == id => Ok(()),
            (Some(lease), None) => match lease.mode {
                TxnMode::ReadOnly => Err(StoreError::read_only(
                    ErrorOrigin::Store,
                    format!(
                        "store {} is held by readonly transaction {}",
                        self.config.name, lease.id
                    ),
                )),
                TxnMode::ReadWrite => Err(StoreError::access(
                    ErrorOrigin::Store,
                    format!(
                        "store {} is bound to transaction {}",
                        self.config.name, lease.id
                    ),
                )),
            },
            (_, Some(id)) => Err(StoreError::access(
                ErrorOrigin::Store,
                format!(
                    "store {} is not bound to transaction {id}",
                    self.config.name
                ),
            )),
        }
    }

    // ── Guarded mutations (shared by direct and transactional paths) ──

    pub(crate) fn guarded_put(
        &mut self,
        caller: Option<u64>,
        value: Value,
        options: PutOptions,
        tags: Tags,
    ) -> Result<(Key, Option<Record>), StoreError> {
        self.check_write_access(caller)?;

        let key = resolve_record_key(self.procs.key_path(), &value, options.key.as_ref())?;
        key.validate()?;

        let prior = self
            .procs
            .retrieve_record(&KeySelector::Key(key.clone()))
            .record()
            .cloned();

        let echo = self.config.sink.is_some().then(|| value.clone());
        let options = PutOptions {
            overwrite: options.overwrite,
            key: Some(key),
        };
        let key = self.procs.store_record(value, &options, tags)?;

        if let Some(value) = echo {
            let opcode = if prior.is_some() {
                Opcode::Update
            } else {
                Opcode::New
            };
            self.emit(opcode, key.clone(), value);
        }

        Ok((key, prior))
    }

    pub(crate) fn guarded_remove(
        &mut self,
        caller: Option<u64>,
        selector: &KeySelector,
    ) -> Result<Vec<Record>, StoreError> {
        self.check_write_access(caller)?;

        let removed = self.matching_records(selector);
        let any = self.procs.delete_key_range(selector)?;
        debug_assert_eq!(any, !removed.is_empty());

        for record in &removed {
            self.emit(Opcode::Delete, record.key().clone(), record.value().clone());
        }

        Ok(removed)
    }

    pub(crate) fn guarded_clear(&mut self, caller: Option<u64>) -> Result<Vec<Record>, StoreError> {
        self.check_write_access(caller)?;

        let removed = self.procs.clear_records();
        for record in &removed {
            self.emit(Opcode::Clear, record.key().clone(), record.value().clone());
        }

        Ok(removed)
    }

    // Snapshot the records a selector addresses, in key order.
    fn matching_records(&self, selector: &KeySelector) -> Vec<Record> {
        let records = self.procs.records();
        let location = Location::search_selector(records, selector);
        let Some(start) = location.eq() else {
            return Vec::new();
        };

        records[start..]
            .iter()
            .take_while(|record| selector.contains(record.key()))
            .cloned()
            .collect()
    }

    fn emit(&self, opcode: Opcode, key: Key, value: Value) {
        if let Some(sink) = &self.config.sink {
            sink.emit(&ChangeEvent::new(opcode, key, value));
        }
    }
}

// Index management and transactional undo exist only on the indexed variant.
impl Store<IndexedStore> {
    /// Register a secondary index, building entries for existing records.
    pub fn create_index(&mut self, model: IndexModel) -> Result<(), StoreError> {
        self.guarded_create_index(None, model)
    }

    /// Drop an index and its entries; primary records are untouched.
    pub fn delete_index(&mut self, name: &str) -> Result<IndexModel, StoreError> {
        self.guarded_delete_index(None, name)
    }

    #[must_use]
    pub fn index(&self, name: &str) -> Option<&IndexStore> {
        self.procs.index(name)
    }

    /// Records addressed through a secondary index, in index-key order.
    pub fn index_lookup(
        &self,
        name: &str,
        selector: &KeySelector,
    ) -> Result<Vec<&Record>, StoreError> {
        let index = self.procs.index(name).ok_or_else(|| {
            StoreError::not_found(ErrorOrigin::Index, format!("no such index: {name}"))
        })?;

        let records = self.procs.records();
        let mut matched = Vec::new();
        for primary in index.lookup(selector) {
            let location = Location::search(records, primary);
            if let Some(record) = location.record() {
                matched.push(record);
            }
        }

        Ok(matched)
    }

    pub(crate) fn guarded_create_index(
        &mut self,
        caller: Option<u64>,
        model: IndexModel,
    ) -> Result<(), StoreError> {
        self.check_write_access(caller)?;
        self.procs.create_index(model)
    }

    pub(crate) fn guarded_delete_index(
        &mut self,
        caller: Option<u64>,
        name: &str,
    ) -> Result<IndexModel, StoreError> {
        self.check_write_access(caller)?;
        self.procs.delete_index(name)
    }

    // ── Rollback undo steps ───────────────────────────
    //
    // These run while the aborting transaction still holds its lease and do
    // not emit change events. Any step that cannot be applied is fatal to
    // the rollback.

    pub(crate) fn undo_insert(&mut self, caller: u64, key: &Key) -> Result<(), StoreError> {
        self.check_write_access(Some(caller))?;

        let removed = self
            .procs
            .delete_key_range(&KeySelector::Key(key.clone()))?;
        if removed {
            Ok(())
        } else {
            Err(StoreError::invalid_state(
                ErrorOrigin::Transaction,
                format!("cannot undo insert: record {key} is gone"),
            ))
        }
    }

    pub(crate) fn undo_update(&mut self, caller: u64, prior: Record) -> Result<(), StoreError> {
        self.check_write_access(Some(caller))?;

        let (key, value, tags) = prior.into_parts();
        let options = PutOptions::new().overwrite().with_key(key);
        self.procs
            .store_record(value, &options, tags)
            .map(drop)
            .map_err(|err| {
                StoreError::invalid_state(
                    ErrorOrigin::Transaction,
                    format!("cannot undo update: {err}"),
                )
            })
    }

    pub(crate) fn undo_remove(
        &mut self,
        caller: u64,
        records: Vec<Record>,
    ) -> Result<(), StoreError> {
        self.check_write_access(Some(caller))?;

        for record in records {
            let (key, value, tags) = record.into_parts();
            let options = PutOptions::new().with_key(key);
            self.procs
                .store_record(value, &options, tags)
                .map(drop)
                .map_err(|err| {
                    StoreError::invalid_state(
                        ErrorOrigin::Transaction,
                        format!("cannot undo delete: {err}"),
                    )
                })?;
        }

        Ok(())
    }

    pub(crate) fn undo_create_index(&mut self, caller: u64, name: &str) -> Result<(), StoreError> {
        self.check_write_access(Some(caller))?;

        self.procs.delete_index(name).map(drop).map_err(|err| {
            StoreError::invalid_state(
                ErrorOrigin::Transaction,
                format!("cannot undo index creation: {err}"),
            )
        })
    }

    pub(crate) fn undo_delete_index(
        &mut self,
        caller: u64,
        model: IndexModel,
    ) -> Result<(), StoreError> {
        self.check_write_access(Some(caller))?;

        self.procs.create_index(model).map_err(|err| {
            StoreError::invalid_state(
                ErrorOrigin::Transaction,
                format!("cannot undo index deletion: {err}"),
            )
        })
    }
}

impl<P: StoreProcedures + fmt::Debug> fmt::Debug for Store<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("config", &self.config)
            .field("procs", &self.procs)
            .field("lease", &self.lease)
            .finish()
    }
}
