mod opcode;
mod rollback;

pub use opcode::Opcode;
pub(crate) use opcode::TxnOp;

use crate::{
    db::{
        StoreCell,
        index::IndexModel,
        query::QueryOptions,
        record::Tags,
        store::PutOptions,
    },
    error::{ErrorOrigin, StoreError},
    key::{Key, KeySelector},
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// TxnMode
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum TxnMode {
    ReadOnly,
    ReadWrite,
}

impl fmt::Display for TxnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ReadOnly => "readonly",
            Self::ReadWrite => "readwrite",
        };
        write!(f, "{label}")
    }
}

///
/// TxnState
///
/// Idle -> Pending -> Active -> Done. A transaction is Idle only while it is
/// being assembled, Pending once its leases are held, Active from the first
/// operation it accepts, and Done - terminally - after commit or abort.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TxnState {
    Idle,
    Pending,
    Active,
    Done,
}

///
/// Transaction
///
/// An opcode log plus the state machine governing it. Mutations routed
/// through the transaction are applied eagerly to the live stores and logged
/// with their undo payloads; commit discards the log, abort replays it in
/// reverse.
///

pub struct Transaction {
    id: u64,
    mode: TxnMode,
    state: TxnState,
    log: Vec<TxnOp>,
    stores: Vec<(String, StoreCell)>,
}

impl Transaction {
    pub(crate) const fn pending(id: u64, mode: TxnMode, stores: Vec<(String, StoreCell)>) -> Self {
        Self {
            id,
            mode,
            state: TxnState::Pending,
            log: Vec::new(),
            stores,
        }
    }

    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub const fn mode(&self) -> TxnMode {
        self.mode
    }

    #[must_use]
    pub const fn state(&self) -> TxnState {
        self.state
    }

    /// Number of logged opcodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.log.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// The opcode kinds logged so far, in commit order.
    #[must_use]
    pub fn opcodes(&self) -> Vec<Opcode> {
        self.log.iter().map(TxnOp::opcode).collect()
    }

    // ── State assertions ──────────────────────────────

    fn ensure_live(&self) -> Result<(), StoreError> {
        if self.state == TxnState::Done {
            return Err(StoreError::transaction_inactive(format!(
                "transaction {} is finished",
                self.id
            )));
        }

        Ok(())
    }

    fn ensure_writable(&self) -> Result<(), StoreError> {
        if self.mode == TxnMode::ReadOnly {
            return Err(StoreError::read_only(
                ErrorOrigin::Transaction,
                format!("transaction {} is readonly", self.id),
            ));
        }

        Ok(())
    }

    fn cell(&self, store: &str) -> Result<&StoreCell, StoreError> {
        self.stores
            .iter()
            .find(|(name, _)| name == store)
            .map(|(_, cell)| cell)
            .ok_or_else(|| {
                StoreError::access(
                    ErrorOrigin::Transaction,
                    format!("store {store} is not a target of transaction {}", self.id),
                )
            })
    }

    const fn activate(&mut self) {
        if matches!(self.state, TxnState::Pending) {
            self.state = TxnState::Active;
        }
    }

    // ── Reads ─────────────────────────────────────────

    /// The payload stored under the first matching key, if any.
    pub fn get(&mut self, store: &str, selector: &KeySelector) -> Result<Option<Value>, StoreError> {
        self.ensure_live()?;
        let cell = self.cell(store)?.clone();
        self.activate();

        let value = cell.borrow().get(selector).cloned();

        Ok(value)
    }

    /// Run a query over a target store.
    pub fn query(&mut self, store: &str, options: &QueryOptions) -> Result<Vec<Value>, StoreError> {
        self.ensure_live()?;
        let cell = self.cell(store)?.clone();
        self.activate();

        cell.borrow().query(options)
    }

    // ── Writes ────────────────────────────────────────

    /// Insert or overwrite, logging NEW or UPDATE with its undo payload.
    pub fn put(&mut self, store: &str, value: Value) -> Result<Key, StoreError> {
        self.put_with(store, value, PutOptions::new().overwrite(), Tags::new())
    }

    /// Insert only; a duplicate key is a conflict and is not logged.
    pub fn add(&mut self, store: &str, value: Value) -> Result<Key, StoreError> {
        self.put_with(store, value, PutOptions::new(), Tags::new())
    }

    pub fn put_with(
        &mut self,
        store: &str,
        value: Value,
        options: PutOptions,
        tags: Tags,
    ) -> Result<Key, StoreError> {
        self.ensure_live()?;
        self.ensure_writable()?;
        let cell = self.cell(store)?.clone();

        let (key, prior) = cell
            .borrow_mut()
            .guarded_put(Some(self.id), value, options, tags)?;

        self.activate();
        self.log.push(match prior {
            Some(prior) => TxnOp::Update {
                store: store.to_string(),
                prior,
            },
            None => TxnOp::New {
                store: store.to_string(),
                key: key.clone(),
            },
        });

        Ok(key)
    }

    /// Remove matching records, logging DELETE with the removed records.
    pub fn remove(&mut self, store: &str, selector: &KeySelector) -> Result<bool, StoreError> {
        self.ensure_live()?;
        self.ensure_writable()?;
        let cell = self.cell(store)?.clone();

        let removed = cell.borrow_mut().guarded_remove(Some(self.id), selector)?;

        self.activate();
        let any = !removed.is_empty();
        if any {
            self.log.push(TxnOp::Delete {
                store: store.to_string(),
                records: removed,
            });
        }

        Ok(any)
    }

    /// Remove everything, logging CLEAR with the cleared records.
    pub fn clear(&mut self, store: &str) -> Result<usize, StoreError> {
        self.ensure_live()?;
        self.ensure_writable()?;
        let cell = self.cell(store)?.clone();

        let removed = cell.borrow_mut().guarded_clear(Some(self.id))?;

        self.activate();
        let count = removed.len();
        self.log.push(TxnOp::Clear {
            store: store.to_string(),
            records: removed,
        });

        Ok(count)
    }

    /// Register an index, logging CREATE_INDEX.
    pub fn create_index(&mut self, store: &str, model: IndexModel) -> Result<(), StoreError> {
        self.ensure_live()?;
        self.ensure_writable()?;
        let cell = self.cell(store)?.clone();

        let name = model.name.clone();
        cell.borrow_mut()
            .guarded_create_index(Some(self.id), model)?;

        self.activate();
        self.log.push(TxnOp::CreateIndex {
            store: store.to_string(),
            name,
        });

        Ok(())
    }

    /// Drop an index, logging DELETE_INDEX with the model needed to rebuild.
    pub fn delete_index(&mut self, store: &str, name: &str) -> Result<(), StoreError> {
        self.ensure_live()?;
        self.ensure_writable()?;
        let cell = self.cell(store)?.clone();

        let model = cell.borrow_mut().guarded_delete_index(Some(self.id), name)?;

        self.activate();
        self.log.push(TxnOp::DeleteIndex {
            store: store.to_string(),
            model,
        });

        Ok(())
    }

    // ── Terminals ─────────────────────────────────────

    /// Discard the log and finish. Mutations were applied eagerly, so there
    /// is nothing further to write.
    pub fn commit(&mut self) -> Result<(), StoreError> {
        if self.state == TxnState::Done {
            return Err(StoreError::invalid_state(
                ErrorOrigin::Transaction,
                format!("transaction {} already finished", self.id),
            ));
        }

        self.log.clear();
        self.finish();

        Ok(())
    }

    /// Replay the log in reverse, undoing every mutation, then finish.
    ///
    /// An undo step that cannot be applied is fatal: the replay stops there
    /// rather than continuing out of order, and the error is surfaced. The
    /// transaction reaches Done either way.
    pub fn abort(&mut self) -> Result<(), StoreError> {
        if self.state == TxnState::Done {
            return Err(StoreError::invalid_state(
                ErrorOrigin::Transaction,
                format!("transaction {} already finished", self.id),
            ));
        }

        let log = std::mem::take(&mut self.log);
        let result = rollback::replay_reverse(self.id, log, &self.stores);
        self.finish();

        result
    }

    fn finish(&mut self) {
        for (_, cell) in &self.stores {
            cell.borrow_mut().release_lease(self.id);
        }
        self.state = TxnState::Done;
    }
}

// A transaction dropped without an explicit terminal releases its leases and
// keeps the eagerly applied mutations: the implicit outcome is commit.
impl Drop for Transaction {
    fn drop(&mut self) {
        if self.state != TxnState::Done {
            self.log.clear();
            self.finish();
        }
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("mode", &self.mode)
            .field("state", &self.state)
            .field("log", &self.log.len())
            .field(
                "stores",
                &self.stores.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .finish()
    }
}
