//! Core runtime for OpalDB: keys and ranges, records and locations, the
//! store-procedure variants, secondary indexes, the query/sort engine, the
//! transaction engine, and the ergonomics exported via the `prelude`.
#![warn(unreachable_pub)]

pub mod db;
pub mod error;
pub mod key;
pub mod obs;
pub mod path;
pub mod types;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No internals, registries, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
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
        path::TreePath,
        value::Value,
    };
}
