//! Percolation operators applied to a working copy of the substrate.
//!
//! A trial first disables a random fraction of nodes with [`random_attack`],
//! then cascades failures with [`prune_to_kcore`] until every surviving node
//! with edges meets its threshold.

mod attack;
mod prune;

pub use self::{
    attack::{AttackOutcome, attack_target, random_attack},
    prune::{PruneOutcome, prune_in_order, prune_to_kcore},
};

#[cfg(test)]
mod property;
