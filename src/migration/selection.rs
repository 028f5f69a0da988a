//! Emigrant selection policies
//!
//! A selection policy decides how many individuals leave an island per
//! epoch and which ones. Counts derive from a [`MigrationRate`], either an
//! absolute number of individuals or a fraction of the population.

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::EvolveError;
use crate::population::{Individual, Population};

/// How many individuals migrate per epoch
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum MigrationRate {
    /// A fixed number of individuals
    Absolute(usize),
    /// A fraction of the current population size, in [0, 1]
    Fractional(f64),
}

impl MigrationRate {
    /// Resolve the rate against the current population size
    ///
    /// An absolute rate above the population size or a fractional rate
    /// outside [0, 1] is a fatal configuration error.
    pub fn count(&self, population_size: usize) -> Result<usize, EvolveError> {
        match *self {
            MigrationRate::Absolute(n) => {
                if n > population_size {
                    Err(EvolveError::MigrationRate(format!(
                        "absolute rate {} exceeds population size {}",
                        n, population_size
                    )))
                } else {
                    Ok(n)
                }
            }
            MigrationRate::Fractional(f) => {
                if !(0.0..=1.0).contains(&f) {
                    Err(EvolveError::MigrationRate(format!(
                        "fractional rate {} is outside [0, 1]",
                        f
                    )))
                } else {
                    Ok((f * population_size as f64) as usize)
                }
            }
        }
    }
}

impl Default for MigrationRate {
    fn default() -> Self {
        MigrationRate::Absolute(1)
    }
}

/// Chooses emigrants from a population
pub trait SelectionPolicy: Send + Sync {
    /// Deep copy behind a trait object
    fn clone_box(&self) -> Box<dyn SelectionPolicy>;

    /// Policy name, used in reports
    fn name(&self) -> &str;

    /// Number of individuals this island offers or accepts per epoch
    fn migration_count(&self, population: &Population) -> Result<usize, EvolveError>;

    /// Deep copies of the chosen emigrants
    fn select(
        &self,
        population: &Population,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Individual>, EvolveError>;
}

impl Clone for Box<dyn SelectionPolicy> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Select the best individuals
#[derive(Clone, Debug, Default)]
pub struct SelectBest {
    /// Emigrant rate
    pub rate: MigrationRate,
}

impl SelectBest {
    /// Create a best-of selection with the given rate
    pub fn new(rate: MigrationRate) -> Self {
        Self { rate }
    }
}

impl SelectionPolicy for SelectBest {
    fn clone_box(&self) -> Box<dyn SelectionPolicy> {
        Box::new(self.clone())
    }

    fn name(&self) -> &str {
        "select best"
    }

    fn migration_count(&self, population: &Population) -> Result<usize, EvolveError> {
        self.rate.count(population.len())
    }

    fn select(
        &self,
        population: &Population,
        _rng: &mut dyn RngCore,
    ) -> Result<Vec<Individual>, EvolveError> {
        let count = self.migration_count(population)?;
        Ok(population
            .ranked_indices()
            .into_iter()
            .take(count)
            .map(|i| population[i].clone())
            .collect())
    }
}

/// Select uniformly random individuals
#[derive(Clone, Debug, Default)]
pub struct SelectRandom {
    /// Emigrant rate
    pub rate: MigrationRate,
}

impl SelectRandom {
    /// Create a random selection with the given rate
    pub fn new(rate: MigrationRate) -> Self {
        Self { rate }
    }
}

impl SelectionPolicy for SelectRandom {
    fn clone_box(&self) -> Box<dyn SelectionPolicy> {
        Box::new(self.clone())
    }

    fn name(&self) -> &str {
        "select random"
    }

    fn migration_count(&self, population: &Population) -> Result<usize, EvolveError> {
        self.rate.count(population.len())
    }

    fn select(
        &self,
        population: &Population,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Individual>, EvolveError> {
        let count = self.migration_count(population)?;
        let indices: Vec<usize> = (0..population.len()).collect();
        Ok(indices
            .choose_multiple(rng, count)
            .map(|&i| population[i].clone())
            .collect())
    }
}
