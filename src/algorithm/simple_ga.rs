//! Simple generational genetic algorithm
//!
//! One epoch runs tournament selection, blend crossover, gaussian mutation
//! and elitist replacement over the whole population.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};

use crate::algorithm::Algorithm;
use crate::error::EvolveError;
use crate::population::{Individual, Population};
use crate::problem::Problem;

/// A simple generational GA
#[derive(Clone, Debug)]
pub struct SimpleGa {
    /// Probability of applying crossover to a parent pair
    pub crossover_rate: f64,
    /// Per-gene mutation probability
    pub mutation_rate: f64,
    /// Mutation standard deviation, as a fraction of each dimension's range
    pub mutation_sigma: f64,
    /// Tournament size for parent selection
    pub tournament_size: usize,
    /// Number of best individuals copied unchanged into the next epoch
    pub elitism: usize,
    /// Blend crossover expansion factor
    pub blend_alpha: f64,
}

impl SimpleGa {
    /// Create a GA with default parameters
    pub fn new() -> Self {
        Self {
            crossover_rate: 0.9,
            mutation_rate: 0.1,
            mutation_sigma: 0.1,
            tournament_size: 2,
            elitism: 1,
            blend_alpha: 0.5,
        }
    }

    /// Set the crossover probability
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        assert!((0.0..=1.0).contains(&rate), "Rate must be in [0, 1]");
        self.crossover_rate = rate;
        self
    }

    /// Set the per-gene mutation probability
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        assert!((0.0..=1.0).contains(&rate), "Rate must be in [0, 1]");
        self.mutation_rate = rate;
        self
    }

    /// Set the mutation width
    pub fn with_mutation_sigma(mut self, sigma: f64) -> Self {
        assert!(sigma >= 0.0, "Sigma must be non-negative");
        self.mutation_sigma = sigma;
        self
    }

    /// Set the tournament size
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        assert!(size >= 1, "Tournament size must be at least 1");
        self.tournament_size = size;
        self
    }

    /// Set the elite count
    pub fn with_elitism(mut self, elitism: usize) -> Self {
        self.elitism = elitism;
        self
    }

    /// Tournament selection over the current population
    fn tournament(&self, population: &Population, rng: &mut dyn RngCore) -> usize {
        let indices: Vec<usize> = (0..population.len()).collect();
        let size = self.tournament_size.min(population.len());
        let mut winner = None;
        for &i in indices.choose_multiple(rng, size) {
            winner = match winner {
                None => Some(i),
                Some(w) if population[i].compares_better(&population[w]) => Some(i),
                w => w,
            };
        }
        winner.unwrap_or(0)
    }

    /// Blend crossover of two decision vectors
    fn blend(&self, a: &[f64], b: &[f64], rng: &mut dyn RngCore) -> (Vec<f64>, Vec<f64>) {
        let gene = |x: f64, y: f64, rng: &mut dyn RngCore| {
            let (lo, hi) = if x <= y { (x, y) } else { (y, x) };
            let d = hi - lo;
            rng.gen_range((lo - self.blend_alpha * d)..=(hi + self.blend_alpha * d))
        };
        let c1 = a.iter().zip(b).map(|(&x, &y)| gene(x, y, &mut *rng)).collect();
        let c2 = a.iter().zip(b).map(|(&x, &y)| gene(x, y, &mut *rng)).collect();
        (c1, c2)
    }

    /// Gaussian mutation in place, scaled to each dimension's range
    fn mutate(&self, x: &mut [f64], problem: &dyn Problem, rng: &mut dyn RngCore) {
        for (i, xi) in x.iter_mut().enumerate() {
            if rng.gen::<f64>() < self.mutation_rate {
                let range = problem.bounds().get(i).map_or(1.0, |b| b.range());
                let normal = Normal::new(0.0, self.mutation_sigma * range).unwrap();
                *xi += normal.sample(&mut *rng);
            }
        }
    }
}

impl Default for SimpleGa {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for SimpleGa {
    fn clone_box(&self) -> Box<dyn Algorithm> {
        Box::new(self.clone())
    }

    fn name(&self) -> &str {
        "simple ga"
    }

    fn evolve(
        &self,
        population: &mut Population,
        problem: &dyn Problem,
        rng: &mut dyn RngCore,
    ) -> Result<(), EvolveError> {
        let size = population.len();
        if size < 2 {
            return Err(EvolveError::EmptyPopulation);
        }

        let elitism = self.elitism.min(size);
        let elites: Vec<Individual> = population
            .ranked_indices()
            .into_iter()
            .take(elitism)
            .map(|i| population[i].clone())
            .collect();

        let mut next = elites;
        while next.len() < size {
            let p1 = self.tournament(population, &mut *rng);
            let p2 = self.tournament(population, &mut *rng);

            let (mut x1, mut x2) = if rng.gen::<f64>() < self.crossover_rate {
                self.blend(&population[p1].decision, &population[p2].decision, &mut *rng)
            } else {
                (population[p1].decision.clone(), population[p2].decision.clone())
            };

            self.mutate(&mut x1, problem, &mut *rng);
            self.mutate(&mut x2, problem, &mut *rng);
            problem.bounds().clamp_vec(&mut x1);
            problem.bounds().clamp_vec(&mut x2);

            next.push(Individual::evaluated(problem, x1));
            if next.len() < size {
                next.push(Individual::evaluated(problem, x2));
            }
        }

        population.replace_all(next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::benchmarks::{Rastrigin, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_evolve_preserves_size_and_bounds() {
        let problem = Sphere::new(4);
        let mut rng = StdRng::seed_from_u64(3);
        let mut pop = Population::random(&problem, 21, &mut rng);

        let ga = SimpleGa::new();
        for _ in 0..5 {
            ga.evolve(&mut pop, &problem, &mut rng).unwrap();
            assert_eq!(pop.len(), 21);
            for ind in pop.iter() {
                assert!(problem.bounds().contains_vec(&ind.decision));
            }
        }
    }

    #[test]
    fn test_elitism_never_loses_the_best() {
        let problem = Rastrigin::new(3);
        let mut rng = StdRng::seed_from_u64(9);
        let mut pop = Population::random(&problem, 20, &mut rng);

        let ga = SimpleGa::new().with_elitism(2);
        let mut best_so_far = pop.best().unwrap().fitness[0];
        for _ in 0..10 {
            ga.evolve(&mut pop, &problem, &mut rng).unwrap();
            let best = pop.best().unwrap().fitness[0];
            assert!(best <= best_so_far + 1e-12);
            best_so_far = best;
        }
    }

    #[test]
    fn test_improves_on_sphere() {
        let problem = Sphere::new(5);
        let mut rng = StdRng::seed_from_u64(123);
        let mut pop = Population::random(&problem, 30, &mut rng);
        let before = pop.best().unwrap().fitness[0];

        let ga = SimpleGa::new();
        for _ in 0..30 {
            ga.evolve(&mut pop, &problem, &mut rng).unwrap();
        }
        let after = pop.champion().unwrap().fitness[0];
        assert!(after < before);
    }

    #[test]
    fn test_too_small_population() {
        let problem = Sphere::new(2);
        let mut rng = StdRng::seed_from_u64(5);
        let mut pop = Population::random(&problem, 1, &mut rng);
        let ga = SimpleGa::new();
        assert_eq!(
            ga.evolve(&mut pop, &problem, &mut rng),
            Err(EvolveError::EmptyPopulation)
        );
    }
}
