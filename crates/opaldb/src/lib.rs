//! OpalDB is an embedded, in-memory object store with IndexedDB-style
//! semantics: ordered primary storage over comparable keys, secondary
//! indexes, range queries, multi-key sorting and pagination, and
//! transactional rollback.
//!
//! ## Crate layout
//! - `core`: the engine - keys, records, locations, store procedures,
//!   indexes, queries, transactions, tree paths, and the change boundary.
//!
//! The `prelude` module mirrors the surface used by application code.

pub use opaldb_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        db::{
            Database,
            index::IndexModel,
            location::Location,
            query::{Filter, QueryOptions, SortDirective},
            record::{Record, Tags},
            store::{IndexedStore, NaturalStore, PutOptions, Store, StoreConfig, StoreProcedures},
            txn::{Opcode, Transaction, TxnMode, TxnState},
        },
        error::StoreError,
        key::{Key, KeyRange, KeySelector},
        obs::{ChangeEvent, ChangeSink},
        path::TreePath,
        value::Value,
    };
}

///
/// TESTS
///
