use crate::{
    db::{StoreCell, txn::TxnOp},
    error::{ErrorOrigin, StoreError},
};

/// Undo logged mutations in reverse write order.
///
/// Shared by the abort path so undo ordering stays mechanically consistent:
/// the most recent mutation is always unwound first. The first step that
/// cannot be applied stops the replay; continuing past it would undo the
/// remaining entries against a state they were not captured from.
pub(crate) fn replay_reverse(
    txn_id: u64,
    log: Vec<TxnOp>,
    stores: &[(String, StoreCell)],
) -> Result<(), StoreError> {
    for op in log.into_iter().rev() {
        let cell = stores
            .iter()
            .find(|(name, _)| name == op.store())
            .map(|(_, cell)| cell)
            .ok_or_else(|| {
                StoreError::invalid_state(
                    ErrorOrigin::Transaction,
                    format!("opcode targets a store outside transaction {txn_id}"),
                )
            })?;
        let mut store = cell.borrow_mut();

        match op {
            TxnOp::New { key, .. } => store.undo_insert(txn_id, &key)?,
            TxnOp::Update { prior, .. } => store.undo_update(txn_id, prior)?,
            TxnOp::Delete { records, .. } | TxnOp::Clear { records, .. } => {
                store.undo_remove(txn_id, records)?;
            }
            TxnOp::CreateIndex { name, .. } => store.undo_create_index(txn_id, &name)?,
            TxnOp::DeleteIndex { model, .. } => store.undo_delete_index(txn_id, model)?,
        }
    }

    Ok(())
}
