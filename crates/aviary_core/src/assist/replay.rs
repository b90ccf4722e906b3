//! Replays confirmed proposals through the mutation engine.

use crate::assist::endpoint::{AssistProposal, ProposedAction};
use crate::store::aviary_store::{AviaryStore, StoreResult};
use crate::sync::adapter::SyncAdapter;
use log::{error, info};

/// Applies every action of a human-confirmed proposal in order.
///
/// Each action is an ordinary store call with its own validation and
/// rollback. The first failing action aborts the replay and returns its
/// error; actions already applied stay applied.
///
/// Returns the number of actions applied.
pub fn apply_proposal<S: SyncAdapter>(
    store: &mut AviaryStore<S>,
    proposal: &AssistProposal,
) -> StoreResult<usize> {
    let mut applied = 0usize;

    for action in &proposal.actions {
        let result = match action {
            ProposedAction::AddOne { item } => store.add_one(item.clone()),
            ProposedAction::AddMany { items } => store.add_many(items.clone()),
            ProposedAction::UpdateOne { id, fields } => store.update_one(id, fields),
            ProposedAction::UpdateMany { updates } => store.update_many(updates),
            ProposedAction::DeleteOne { id } => store.delete_one(id),
            ProposedAction::DeleteBird { id } => store.delete_bird(id),
        };

        if let Err(err) = result {
            error!(
                "event=assist_replay module=assist status=error applied={applied} error={err}"
            );
            return Err(err);
        }
        applied += 1;
    }

    info!("event=assist_replay module=assist status=ok applied={applied}");
    Ok(applied)
}
