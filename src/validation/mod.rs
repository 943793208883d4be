//! Reproducible train/test partitioning.
//!
//! Every technique is a [`SeedHolder`]: the same dataset, parameters and seed
//! always produce the same [`Partition`].

mod cross_fold;
mod fold;
mod group_cross_fold;
mod groups;
mod hold_out;

use rand::Rng;

pub use cross_fold::CrossFoldValidation;
pub use fold::{Fold, Partition, TrainTestSplit};
pub use group_cross_fold::GroupCrossFoldValidation;
pub use groups::{FixedSizeGroups, UserGroup};
pub use hold_out::HoldOutRatings;

use crate::domain::{ItemId, RatingsDataset};
use crate::errors::{EngineError, EngineResult};
use crate::progress::ProgressHandle;
use crate::random::{SeedHolder, take_random};

pub trait ValidationTechnique: SeedHolder + Send + Sync {
    fn name(&self) -> &'static str;

    fn fold_count(&self) -> usize;

    fn partition(&self, dataset: &dyn RatingsDataset, progress: &ProgressHandle) -> EngineResult<Partition>;
}

pub const MIN_FOLDS: usize = 2;

fn check_fold_count(folds: usize) -> EngineResult<()> {
    if folds < MIN_FOLDS {
        return Err(EngineError::invalid(
            "folds",
            format!("at least {} folds are required, got {}", MIN_FOLDS, folds),
        ));
    }
    Ok(())
}

/// Draws items from `pool` at random and deals them to folds in turn,
/// starting from fold 0
fn deal_round_robin<R: Rng>(
    rng: &mut R,
    mut pool: Vec<ItemId>,
    fold_count: usize,
    mut assign: impl FnMut(usize, ItemId),
) {
    let mut fold_index = 0;
    while let Some(item_id) = take_random(rng, &mut pool) {
        assign(fold_index, item_id);
        fold_index = (fold_index + 1) % fold_count;
    }
}
