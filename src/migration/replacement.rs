//! Immigrant replacement policies
//!
//! A replacement policy integrates arriving individuals into a population
//! and reports how many it actually integrated.

use rand::{Rng, RngCore};

use crate::population::{Individual, Population};

/// Integrates immigrants into a population
pub trait ReplacementPolicy: Send + Sync {
    /// Deep copy behind a trait object
    fn clone_box(&self) -> Box<dyn ReplacementPolicy>;

    /// Policy name, used in reports
    fn name(&self) -> &str;

    /// Integrate (a subset of) `immigrants`, returning the number accepted
    fn assimilate(
        &self,
        population: &mut Population,
        immigrants: &[Individual],
        rng: &mut dyn RngCore,
    ) -> usize;
}

impl Clone for Box<dyn ReplacementPolicy> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Replace the worst residents, but only with better immigrants
///
/// Immigrants are considered best-first; integration stops at the first
/// immigrant that cannot beat the current worst resident.
#[derive(Clone, Debug, Default)]
pub struct ReplaceWorst;

impl ReplaceWorst {
    /// Create the policy
    pub fn new() -> Self {
        Self
    }
}

impl ReplacementPolicy for ReplaceWorst {
    fn clone_box(&self) -> Box<dyn ReplacementPolicy> {
        Box::new(self.clone())
    }

    fn name(&self) -> &str {
        "replace worst"
    }

    fn assimilate(
        &self,
        population: &mut Population,
        immigrants: &[Individual],
        _rng: &mut dyn RngCore,
    ) -> usize {
        let mut ordered: Vec<&Individual> = immigrants.iter().collect();
        ordered.sort_by(|a, b| {
            if a.compares_better(b) {
                std::cmp::Ordering::Less
            } else if b.compares_better(a) {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        });

        let mut accepted = 0;
        for immigrant in ordered {
            let worst = match population.worst_index() {
                Some(w) => w,
                None => break,
            };
            if immigrant.compares_better(&population[worst]) {
                population.set(worst, immigrant.clone());
                accepted += 1;
            } else {
                break;
            }
        }
        accepted
    }
}

/// Overwrite uniformly random residents, unconditionally
#[derive(Clone, Debug, Default)]
pub struct ReplaceRandom;

impl ReplaceRandom {
    /// Create the policy
    pub fn new() -> Self {
        Self
    }
}

impl ReplacementPolicy for ReplaceRandom {
    fn clone_box(&self) -> Box<dyn ReplacementPolicy> {
        Box::new(self.clone())
    }

    fn name(&self) -> &str {
        "replace random"
    }

    fn assimilate(
        &self,
        population: &mut Population,
        immigrants: &[Individual],
        rng: &mut dyn RngCore,
    ) -> usize {
        if population.is_empty() {
            return 0;
        }
        // At most one slot per resident; surplus immigrants are dropped.
        let limit = immigrants.len().min(population.len());
        for immigrant in immigrants.iter().take(limit) {
            let slot = rng.gen_range(0..population.len());
            population.set(slot, immigrant.clone());
        }
        limit
    }
}
