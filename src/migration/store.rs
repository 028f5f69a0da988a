//! Staging store for migrating individuals
//!
//! A two-level map `owner -> (origin -> batch)` holding individuals in
//! flight between islands. The store itself is plain data: the archipelago
//! keeps it behind its single migration mutex and passes it into the
//! pre/post-evolution hooks by exclusive reference, so no inner map ever
//! escapes to a reader.
//!
//! The meaning of a slot depends on the migration direction. Under
//! destination-initiated migration, `store[v][v]` is v's published offer
//! that neighbors peek before they evolve. Under source-initiated
//! migration, `store[v][u]` holds the batch u has pushed toward v, which v
//! consumes before it evolves.

use std::collections::HashMap;

use crate::population::Individual;

/// Pending migrant batches, keyed by owning island
#[derive(Clone, Debug, Default)]
pub struct MigrationStore {
    inner: HashMap<usize, HashMap<usize, Vec<Individual>>>,
}

impl MigrationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the batch under `(owner, from)`
    ///
    /// Replacement is last-writer-wins: a displaced batch is discarded, so
    /// a destination that never evolves cannot accumulate unbounded
    /// backlog from one origin.
    pub fn publish(&mut self, owner: usize, from: usize, individuals: Vec<Individual>) {
        self.inner.entry(owner).or_default().insert(from, individuals);
    }

    /// Atomically extract everything staged for `owner`
    pub fn consume(&mut self, owner: usize) -> HashMap<usize, Vec<Individual>> {
        self.inner.remove(&owner).unwrap_or_default()
    }

    /// Non-destructive read of the batch under `(owner, from)`
    pub fn peek(&self, owner: usize, from: usize) -> Option<&[Individual]> {
        self.inner
            .get(&owner)
            .and_then(|slots| slots.get(&from))
            .map(Vec::as_slice)
    }

    /// Whether nothing is staged
    pub fn is_empty(&self) -> bool {
        self.inner.values().all(|slots| slots.is_empty())
    }

    /// Largest island index referenced by any slot
    pub fn max_index(&self) -> Option<usize> {
        self.inner
            .iter()
            .flat_map(|(owner, slots)| {
                std::iter::once(*owner).chain(slots.keys().copied())
            })
            .max()
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}
