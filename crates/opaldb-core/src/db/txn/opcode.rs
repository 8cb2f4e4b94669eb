use crate::{db::{index::IndexModel, record::Record}, key::Key};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Opcode
///
/// The mutation kinds a transaction logs and the change boundary reports.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Opcode {
    New,
    Update,
    Delete,
    Clear,
    CreateIndex,
    DeleteIndex,
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::New => "new",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Clear => "clear",
            Self::CreateIndex => "create_index",
            Self::DeleteIndex => "delete_index",
        };
        write!(f, "{label}")
    }
}

///
/// TxnOp
///
/// One logged mutation, carrying exactly the state its undo needs: the key
/// for an insert, the prior record for an update, the removed records for a
/// delete or clear, and the index identity for index management.
///

#[derive(Clone, Debug)]
pub(crate) enum TxnOp {
    New {
        store: String,
        key: Key,
    },
    Update {
        store: String,
        prior: Record,
    },
    Delete {
        store: String,
        records: Vec<Record>,
    },
    Clear {
        store: String,
        records: Vec<Record>,
    },
    CreateIndex {
        store: String,
        name: String,
    },
    DeleteIndex {
        store: String,
        model: IndexModel,
    },
}

impl TxnOp {
    pub(crate) const fn opcode(&self) -> Opcode {
        match self {
            Self::New { .. } => Opcode::New,
            Self::Update { .. } => Opcode::Update,
            Self::Delete { .. } => Opcode::Delete,
            Self::Clear { .. } => Opcode::Clear,
            Self::CreateIndex { .. } => Opcode::CreateIndex,
            Self::DeleteIndex { .. } => Opcode::DeleteIndex,
        }
    }

    pub(crate) fn store(&self) -> &str {
        match self {
            Self::New { store, .. }
            | Self::Update { store, .. }
            | Self::Delete { store, .. }
            | Self::Clear { store, .. }
            | Self::CreateIndex { store, .. }
            | Self::DeleteIndex { store, .. } => store,
        }
    }
}
