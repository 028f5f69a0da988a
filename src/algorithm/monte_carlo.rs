//! Monte Carlo search
//!
//! Pure random sampling: each epoch draws fresh candidates within bounds
//! and keeps them only when they beat the current worst individual. Useful
//! as a baseline and as a cheap default in tests.

use rand::RngCore;

use crate::algorithm::Algorithm;
use crate::error::EvolveError;
use crate::population::{Individual, Population};
use crate::problem::Problem;

/// Monte Carlo (random search) algorithm
#[derive(Clone, Debug)]
pub struct MonteCarlo {
    /// Candidates drawn per epoch
    pub samples: usize,
}

impl MonteCarlo {
    /// Create a Monte Carlo algorithm drawing `samples` candidates per epoch
    pub fn new(samples: usize) -> Self {
        assert!(samples >= 1, "Monte Carlo needs at least one sample per epoch");
        Self { samples }
    }
}

impl Default for MonteCarlo {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Algorithm for MonteCarlo {
    fn clone_box(&self) -> Box<dyn Algorithm> {
        Box::new(self.clone())
    }

    fn name(&self) -> &str {
        "monte carlo"
    }

    fn evolve(
        &self,
        population: &mut Population,
        problem: &dyn Problem,
        rng: &mut dyn RngCore,
    ) -> Result<(), EvolveError> {
        if population.is_empty() {
            return Err(EvolveError::EmptyPopulation);
        }
        for _ in 0..self.samples {
            let candidate = Individual::random(problem, &mut *rng);
            let worst = population
                .worst_index()
                .ok_or(EvolveError::EmptyPopulation)?;
            if candidate.compares_better(&population[worst]) {
                population.set(worst, candidate);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::benchmarks::Sphere;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_monte_carlo_never_worsens() {
        let problem = Sphere::new(3);
        let mut rng = StdRng::seed_from_u64(11);
        let mut pop = Population::random(&problem, 10, &mut rng);
        let before = pop.best().unwrap().fitness[0];

        let algo = MonteCarlo::new(50);
        for _ in 0..5 {
            algo.evolve(&mut pop, &problem, &mut rng).unwrap();
        }
        let after = pop.best().unwrap().fitness[0];
        assert!(after <= before);
        assert_eq!(pop.len(), 10);
    }

    #[test]
    fn test_monte_carlo_empty_population() {
        let problem = Sphere::new(2);
        let mut rng = StdRng::seed_from_u64(0);
        let mut pop = Population::new();
        let algo = MonteCarlo::new(1);
        assert_eq!(
            algo.evolve(&mut pop, &problem, &mut rng),
            Err(EvolveError::EmptyPopulation)
        );
    }
}
