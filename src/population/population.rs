//! Population container
//!
//! An ordered sequence of individuals plus best-so-far (champion) tracking.
//! Each population is owned by exactly one island.

use rand::RngCore;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::population::individual::Individual;
use crate::problem::Problem;

/// A population of candidate solutions
#[derive(Clone, Debug, Default)]
pub struct Population {
    individuals: Vec<Individual>,
    /// Best individual ever seen in this population
    champion: Option<Individual>,
}

impl Population {
    /// Create an empty population
    pub fn new() -> Self {
        Self {
            individuals: Vec::new(),
            champion: None,
        }
    }

    /// Create a population from a vector of individuals
    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        let mut pop = Self::new();
        for ind in individuals {
            pop.push(ind);
        }
        pop
    }

    /// Create a population of random individuals evaluated on `problem`
    #[cfg(feature = "parallel")]
    pub fn random(problem: &dyn Problem, size: usize, rng: &mut dyn RngCore) -> Self {
        use rand::Rng;
        let decisions: Vec<Vec<f64>> = (0..size)
            .map(|_| {
                problem
                    .bounds()
                    .bounds
                    .iter()
                    .map(|b| rng.gen_range(b.min..=b.max))
                    .collect()
            })
            .collect();
        let individuals = decisions
            .into_par_iter()
            .map(|x| Individual::evaluated(problem, x))
            .collect();
        Self::from_individuals(individuals)
    }

    /// Create a population of random individuals evaluated on `problem`
    /// (sequential fallback when the `parallel` feature is disabled)
    #[cfg(not(feature = "parallel"))]
    pub fn random(problem: &dyn Problem, size: usize, rng: &mut dyn RngCore) -> Self {
        let individuals = (0..size)
            .map(|_| Individual::random(problem, &mut *rng))
            .collect();
        Self::from_individuals(individuals)
    }

    /// Get the population size
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Check if the population is empty
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Get an individual by index
    pub fn get(&self, index: usize) -> Option<&Individual> {
        self.individuals.get(index)
    }

    /// Add an individual
    pub fn push(&mut self, individual: Individual) {
        self.update_champion(&individual);
        self.individuals.push(individual);
    }

    /// Replace the individual at `index`
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn set(&mut self, index: usize, individual: Individual) {
        self.update_champion(&individual);
        self.individuals[index] = individual;
    }

    /// Replace the whole sequence, keeping the champion monotone
    pub fn replace_all(&mut self, individuals: Vec<Individual>) {
        for ind in &individuals {
            self.update_champion(ind);
        }
        self.individuals = individuals;
    }

    /// Get an iterator over the individuals
    pub fn iter(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.iter()
    }

    /// Get the underlying slice of individuals
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Index of the best current individual
    pub fn best_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, ind) in self.individuals.iter().enumerate() {
            match best {
                None => best = Some(i),
                Some(b) if ind.compares_better(&self.individuals[b]) => best = Some(i),
                _ => {}
            }
        }
        best
    }

    /// Index of the worst current individual
    pub fn worst_index(&self) -> Option<usize> {
        let mut worst: Option<usize> = None;
        for (i, ind) in self.individuals.iter().enumerate() {
            match worst {
                None => worst = Some(i),
                Some(w) if self.individuals[w].compares_better(ind) => worst = Some(i),
                _ => {}
            }
        }
        worst
    }

    /// Best current individual
    pub fn best(&self) -> Option<&Individual> {
        self.best_index().map(|i| &self.individuals[i])
    }

    /// Worst current individual
    pub fn worst(&self) -> Option<&Individual> {
        self.worst_index().map(|i| &self.individuals[i])
    }

    /// Best individual ever seen, surviving replacements
    pub fn champion(&self) -> Option<&Individual> {
        self.champion.as_ref()
    }

    /// Indices sorted best-first
    pub fn ranked_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.individuals.len()).collect();
        indices.sort_by(|&a, &b| {
            if self.individuals[a].compares_better(&self.individuals[b]) {
                std::cmp::Ordering::Less
            } else if self.individuals[b].compares_better(&self.individuals[a]) {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        });
        indices
    }

    /// Mean of the first objective
    pub fn mean_fitness(&self) -> Option<f64> {
        if self.individuals.is_empty() {
            return None;
        }
        let sum: f64 = self
            .individuals
            .iter()
            .filter_map(|i| i.fitness.first())
            .sum();
        Some(sum / self.individuals.len() as f64)
    }

    fn update_champion(&mut self, candidate: &Individual) {
        match &self.champion {
            None => self.champion = Some(candidate.clone()),
            Some(champ) if candidate.compares_better(champ) => {
                self.champion = Some(candidate.clone());
            }
            _ => {}
        }
    }
}

impl std::ops::Index<usize> for Population {
    type Output = Individual;

    fn index(&self, index: usize) -> &Self::Output {
        &self.individuals[index]
    }
}

impl std::ops::IndexMut<usize> for Population {
    // The value written through the returned reference is never observed
    // here, so champion tracking only happens on the insertion paths
    // (`push`, `set`, `replace_all`). Use `set` when the new individual
    // may advance the champion.
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.individuals[index]
    }
}

impl IntoIterator for Population {
    type Item = Individual;
    type IntoIter = std::vec::IntoIter<Individual>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.into_iter()
    }
}

impl FromIterator<Individual> for Population {
    fn from_iter<I: IntoIterator<Item = Individual>>(iter: I) -> Self {
        Self::from_individuals(iter.into_iter().collect())
    }
}
