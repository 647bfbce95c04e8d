//! The only place where batch membership changes.
//!
//! Both aggregates are updated in the same call, so a bovine lists a batch exactly when that
//! batch lists the bovine.

use crate::modules::batch::domain::entities::batch::Batch;
use crate::modules::bovine::domain::entities::bovine::Bovine;

/// Make `bovine` a member of `batch`. Returns false when it already was.
pub fn link(bovine: &mut Bovine, batch: &mut Batch) -> bool {
    let added_to_batch = batch.members.insert(bovine.key());
    let added_to_bovine = bovine.batches.insert(batch.key());

    let changed = added_to_batch || added_to_bovine;
    if changed {
        bovine.touch();
    }
    changed
}

/// Remove `bovine` from `batch`. Returns false when it was not a member.
pub fn unlink(bovine: &mut Bovine, batch: &mut Batch) -> bool {
    let removed_from_batch = batch.members.remove(&bovine.key());
    let removed_from_bovine = bovine.batches.remove(&batch.key());

    let changed = removed_from_batch || removed_from_bovine;
    if changed {
        bovine.touch();
    }
    changed
}
