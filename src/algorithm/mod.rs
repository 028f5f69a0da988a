//! Evolution algorithms
//!
//! This module defines the [`Algorithm`] trait and the concrete algorithms
//! shipped with the library. An algorithm evolves a population in place for
//! exactly one epoch per call; islands decide how many epochs to run.

pub mod monte_carlo;
pub mod simple_ga;

use rand::RngCore;

use crate::error::EvolveError;
use crate::population::Population;
use crate::problem::Problem;

/// An evolution algorithm
///
/// Algorithms are clonable capability objects: every island holds its own
/// clone so that stateful algorithms never share state across islands.
pub trait Algorithm: Send + Sync {
    /// Deep copy behind a trait object
    fn clone_box(&self) -> Box<dyn Algorithm>;

    /// Algorithm name, used in reports
    fn name(&self) -> &str;

    /// Evolve the population in place for one epoch
    fn evolve(
        &self,
        population: &mut Population,
        problem: &dyn Problem,
        rng: &mut dyn RngCore,
    ) -> Result<(), EvolveError>;
}

impl Clone for Box<dyn Algorithm> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use super::monte_carlo::MonteCarlo;
    pub use super::simple_ga::SimpleGa;
    pub use super::Algorithm;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::Individual;
    use crate::problem::benchmarks::Sphere;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // Mock algorithm that shifts every decision variable by a constant
    #[derive(Clone)]
    struct ShiftAlgorithm(f64);

    impl Algorithm for ShiftAlgorithm {
        fn clone_box(&self) -> Box<dyn Algorithm> {
            Box::new(self.clone())
        }

        fn name(&self) -> &str {
            "shift"
        }

        fn evolve(
            &self,
            population: &mut Population,
            problem: &dyn Problem,
            _rng: &mut dyn RngCore,
        ) -> Result<(), EvolveError> {
            let shifted: Vec<Individual> = population
                .iter()
                .map(|ind| {
                    let mut x = ind.decision.clone();
                    for xi in &mut x {
                        *xi += self.0;
                    }
                    problem.bounds().clamp_vec(&mut x);
                    Individual::evaluated(problem, x)
                })
                .collect();
            population.replace_all(shifted);
            Ok(())
        }
    }

    #[test]
    fn test_mock_algorithm_evolves_in_place() {
        let problem = Sphere::new(2);
        let mut rng = StdRng::seed_from_u64(1);
        let mut pop = Population::from_individuals(vec![Individual::evaluated(
            &problem,
            vec![1.0, 1.0],
        )]);

        let algo = ShiftAlgorithm(0.5);
        algo.evolve(&mut pop, &problem, &mut rng).unwrap();
        assert_eq!(pop[0].decision, vec![1.5, 1.5]);
        assert_eq!(pop[0].fitness, vec![4.5]);
    }

    #[test]
    fn test_boxed_clone() {
        let algo: Box<dyn Algorithm> = Box::new(ShiftAlgorithm(1.0));
        let copy = algo.clone();
        assert_eq!(copy.name(), "shift");
    }
}
