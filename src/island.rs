//! Islands
//!
//! An island owns one population, a clone of its algorithm, a reference to
//! its problem, and the selection/replacement policies applied when
//! migrants leave or arrive. Islands are pushed into an archipelago, which
//! drives their evolution on a dedicated worker thread.

use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::algorithm::Algorithm;
use crate::error::EvolveError;
use crate::migration::{ReplaceWorst, ReplacementPolicy, SelectBest, SelectionPolicy};
use crate::population::{Individual, Population};
use crate::problem::Problem;

/// Identity of an archipelago, used for island ownership tracking
pub type ArchipelagoId = u64;

/// An autonomous evolutionary worker holding one population
pub struct Island {
    /// Zero-based index within the owning archipelago
    index: usize,
    population: Population,
    problem: Arc<dyn Problem>,
    algorithm: Box<dyn Algorithm>,
    selection: Box<dyn SelectionPolicy>,
    replacement: Box<dyn ReplacementPolicy>,
    /// Weak back-reference: set on attach, cleared by `detach`
    home: Option<ArchipelagoId>,
}

impl Island {
    /// Create an island with `size` random individuals
    ///
    /// Default migration policies are `SelectBest` with an absolute rate of
    /// one emigrant and `ReplaceWorst`.
    pub fn new(
        problem: impl Problem + 'static,
        algorithm: impl Algorithm + 'static,
        size: usize,
    ) -> Self {
        let mut rng = StdRng::from_entropy();
        Self::from_parts(Arc::new(problem), Box::new(algorithm), size, &mut rng)
    }

    pub(crate) fn from_parts(
        problem: Arc<dyn Problem>,
        algorithm: Box<dyn Algorithm>,
        size: usize,
        rng: &mut dyn RngCore,
    ) -> Self {
        let population = Population::random(problem.as_ref(), size, rng);
        Self {
            index: 0,
            population,
            problem,
            algorithm,
            selection: Box::new(SelectBest::default()),
            replacement: Box::new(ReplaceWorst::new()),
            home: None,
        }
    }

    /// Replace the migration policies
    pub fn with_policies(
        mut self,
        selection: impl SelectionPolicy + 'static,
        replacement: impl ReplacementPolicy + 'static,
    ) -> Self {
        self.selection = Box::new(selection);
        self.replacement = Box::new(replacement);
        self
    }

    /// Index of this island within its archipelago
    pub fn index(&self) -> usize {
        self.index
    }

    /// The local population
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[cfg(test)]
    pub(crate) fn population_mut(&mut self) -> &mut Population {
        &mut self.population
    }

    /// The problem this island evaluates against
    pub fn problem(&self) -> &dyn Problem {
        self.problem.as_ref()
    }

    /// The algorithm evolving this island
    pub fn algorithm(&self) -> &dyn Algorithm {
        self.algorithm.as_ref()
    }

    /// Identity of the owning archipelago, if attached
    pub fn home(&self) -> Option<ArchipelagoId> {
        self.home
    }

    /// Release this island from its archipelago binding
    ///
    /// Required before pushing a copy obtained from a live archipelago
    /// into another one.
    pub fn detach(&mut self) {
        self.home = None;
    }

    pub(crate) fn bind(&mut self, home: ArchipelagoId, index: usize) {
        self.home = Some(home);
        self.index = index;
    }

    /// Run the algorithm for one epoch
    pub(crate) fn evolve_once(&mut self, rng: &mut dyn RngCore) -> Result<(), EvolveError> {
        self.algorithm
            .evolve(&mut self.population, self.problem.as_ref(), rng)
    }

    /// Number of individuals this island's policy migrates per epoch
    pub(crate) fn migration_budget(&self) -> Result<usize, EvolveError> {
        self.selection.migration_count(&self.population)
    }

    /// Deep copies of this island's emigrants
    pub(crate) fn select_emigrants(
        &self,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Individual>, EvolveError> {
        self.selection.select(&self.population, rng)
    }

    /// Integrate immigrants, returning the number accepted
    pub(crate) fn assimilate(
        &mut self,
        immigrants: &[Individual],
        rng: &mut dyn RngCore,
    ) -> usize {
        self.replacement
            .assimilate(&mut self.population, immigrants, rng)
    }
}

impl Clone for Island {
    /// Deep copy of population, algorithm and policies
    ///
    /// The clone keeps the archipelago binding of the original; call
    /// [`Island::detach`] to obtain a pushable copy.
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            population: self.population.clone(),
            problem: Arc::clone(&self.problem),
            algorithm: self.algorithm.clone_box(),
            selection: self.selection.clone_box(),
            replacement: self.replacement.clone_box(),
            home: self.home,
        }
    }
}

impl fmt::Debug for Island {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Island")
            .field("index", &self.index)
            .field("population", &self.population.len())
            .field("problem", &self.problem.name())
            .field("algorithm", &self.algorithm.name())
            .field("home", &self.home)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::monte_carlo::MonteCarlo;
    use crate::migration::{MigrationRate, ReplaceRandom, SelectRandom};
    use crate::problem::benchmarks::Sphere;

    fn test_island(size: usize) -> Island {
        Island::new(Sphere::new(3), MonteCarlo::new(5), size)
    }

    #[test]
    fn test_new_island() {
        let island = test_island(12);
        assert_eq!(island.index(), 0);
        assert_eq!(island.population().len(), 12);
        assert_eq!(island.problem().name(), "sphere");
        assert_eq!(island.algorithm().name(), "monte carlo");
        assert!(island.home().is_none());
    }

    #[test]
    fn test_bind_and_detach() {
        let mut island = test_island(4);
        island.bind(17, 2);
        assert_eq!(island.home(), Some(17));
        assert_eq!(island.index(), 2);

        island.detach();
        assert!(island.home().is_none());
    }

    #[test]
    fn test_clone_keeps_binding_and_population() {
        let mut island = test_island(6);
        island.bind(5, 1);

        let copy = island.clone();
        assert_eq!(copy.home(), Some(5));
        assert_eq!(copy.population().individuals(), island.population().individuals());
    }

    #[test]
    fn test_evolve_once_changes_only_population() {
        let mut island = test_island(8);
        let mut rng = StdRng::seed_from_u64(2);
        island.evolve_once(&mut rng).unwrap();
        assert_eq!(island.population().len(), 8);
    }

    #[test]
    fn test_default_policies() {
        let island = test_island(5);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(island.migration_budget().unwrap(), 1);

        let emigrants = island.select_emigrants(&mut rng).unwrap();
        assert_eq!(emigrants.len(), 1);
        // best-of selection hands out the current best
        assert_eq!(&emigrants[0], island.population().best().unwrap());
    }

    #[test]
    fn test_with_policies() {
        let island = test_island(10).with_policies(
            SelectRandom::new(MigrationRate::Fractional(0.3)),
            ReplaceRandom::new(),
        );
        assert_eq!(island.migration_budget().unwrap(), 3);
    }
}
