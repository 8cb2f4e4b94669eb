pub mod index;
pub mod location;
pub mod query;
pub mod record;
pub mod store;
pub mod txn;

use crate::{
    db::{
        store::{IndexedStore, Store, StoreConfig},
        txn::{Transaction, TxnMode},
    },
    error::{ErrorOrigin, StoreError},
};
use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::Rc,
};

///
/// StoreCell
///
/// Shared handle to one registered store. The engine is single-threaded and
/// cooperative, so `Rc<RefCell<_>>` is the ownership model: the database and
/// any live transactions hold handles, and borrows never outlive one
/// synchronous call.
///

pub type StoreCell = Rc<RefCell<Store<IndexedStore>>>;

///
/// Database
///
/// An explicitly constructed registry of named stores plus the transaction
/// entry point. Nothing is process-global; callers own the database and its
/// lifetime.
///

#[derive(Default)]
pub struct Database {
    stores: BTreeMap<String, StoreCell>,
    next_txn: Cell<u64>,
}

impl Database {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a store under its configured name.
    pub fn create_store(&mut self, config: StoreConfig) -> Result<StoreCell, StoreError> {
        let name = config.name.clone();
        if name.is_empty() {
            return Err(StoreError::missing_parameter(ErrorOrigin::Store, "name"));
        }
        if self.stores.contains_key(&name) {
            return Err(StoreError::conflict(
                ErrorOrigin::Store,
                format!("store already exists: {name}"),
            ));
        }

        let cell: StoreCell = Rc::new(RefCell::new(Store::indexed(config)));
        self.stores.insert(name, cell.clone());

        Ok(cell)
    }

    #[must_use]
    pub fn store(&self, name: &str) -> Option<StoreCell> {
        self.stores.get(name).cloned()
    }

    #[must_use]
    pub fn store_names(&self) -> Vec<&str> {
        self.stores.keys().map(String::as_str).collect()
    }

    /// Open a transaction over the named stores, taking a mode-tagged lease
    /// on each. Leases are all-or-nothing: a store already bound to another
    /// transaction fails the whole call and releases anything acquired.
    pub fn begin(&self, names: &[&str], mode: TxnMode) -> Result<Transaction, StoreError> {
        if names.is_empty() {
            return Err(StoreError::missing_parameter(
                ErrorOrigin::Transaction,
                "stores",
            ));
        }

        let mut targets = Vec::with_capacity(names.len());
        for name in names {
            let cell = self.stores.get(*name).cloned().ok_or_else(|| {
                StoreError::not_found(ErrorOrigin::Store, format!("no such store: {name}"))
            })?;
            targets.push(((*name).to_string(), cell));
        }

        let id = self.next_txn.get();
        self.next_txn.set(id + 1);

        let mut acquired: Vec<&StoreCell> = Vec::with_capacity(targets.len());
        for (_, cell) in &targets {
            if let Err(err) = cell.borrow_mut().acquire_lease(id, mode) {
                for held in acquired {
                    held.borrow_mut().release_lease(id);
                }
                return Err(err);
            }
            acquired.push(cell);
        }

        Ok(Transaction::pending(id, mode, targets))
    }
}

///
/// TESTS
///
