//! Individual value type
//!
//! An individual couples a decision vector with the fitness and constraint
//! vectors obtained by evaluating it on a problem.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::problem::Problem;

/// A candidate solution
///
/// Individuals are plain values: once created (or staged for migration)
/// they are never re-evaluated or mutated in place. All objectives are
/// minimized and constraints follow the `c(x) <= 0` convention.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    /// Decision vector
    pub decision: Vec<f64>,
    /// Fitness (objective) vector
    pub fitness: Vec<f64>,
    /// Constraint vector
    pub constraints: Vec<f64>,
}

impl Individual {
    /// Create an individual from already-computed vectors
    pub fn new(decision: Vec<f64>, fitness: Vec<f64>, constraints: Vec<f64>) -> Self {
        Self {
            decision,
            fitness,
            constraints,
        }
    }

    /// Evaluate a decision vector on a problem
    pub fn evaluated(problem: &dyn Problem, decision: Vec<f64>) -> Self {
        let fitness = problem.objfun(&decision);
        let constraints = problem.constraint_fun(&decision);
        Self {
            decision,
            fitness,
            constraints,
        }
    }

    /// Sample a random individual uniformly within the problem bounds
    pub fn random(problem: &dyn Problem, rng: &mut dyn RngCore) -> Self {
        let decision = problem
            .bounds()
            .bounds
            .iter()
            .map(|b| rng.gen_range(b.min..=b.max))
            .collect();
        Self::evaluated(problem, decision)
    }

    /// Total constraint violation: Σ max(0, cᵢ)
    pub fn violation(&self) -> f64 {
        self.constraints.iter().map(|c| c.max(0.0)).sum()
    }

    /// Whether every constraint is satisfied
    pub fn is_feasible(&self) -> bool {
        self.violation() == 0.0
    }

    /// Compare two individuals
    ///
    /// Lower total constraint violation wins; ties are broken by the first
    /// objective (minimization).
    pub fn compares_better(&self, other: &Individual) -> bool {
        let (va, vb) = (self.violation(), other.violation());
        if va != vb {
            return va < vb;
        }
        match (self.fitness.first(), other.fitness.first()) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::benchmarks::Sphere;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_evaluated() {
        let p = Sphere::new(3);
        let ind = Individual::evaluated(&p, vec![1.0, 2.0, 3.0]);
        assert_eq!(ind.fitness, vec![14.0]);
        assert!(ind.constraints.is_empty());
        assert!(ind.is_feasible());
    }

    #[test]
    fn test_random_within_bounds() {
        let p = Sphere::new(5);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let ind = Individual::random(&p, &mut rng);
            assert!(p.bounds().contains_vec(&ind.decision));
            assert_eq!(ind.fitness.len(), 1);
        }
    }

    #[test]
    fn test_violation() {
        let ind = Individual::new(vec![0.0], vec![1.0], vec![-1.0, 0.5, 2.0]);
        assert_eq!(ind.violation(), 2.5);
        assert!(!ind.is_feasible());
    }

    #[test]
    fn test_compares_better_by_fitness() {
        let a = Individual::new(vec![0.0], vec![1.0], vec![]);
        let b = Individual::new(vec![0.0], vec![2.0], vec![]);
        assert!(a.compares_better(&b));
        assert!(!b.compares_better(&a));
        assert!(!a.compares_better(&a));
    }

    #[test]
    fn test_compares_better_feasibility_first() {
        // Worse fitness but feasible beats better fitness with violations
        let feasible = Individual::new(vec![0.0], vec![10.0], vec![-1.0]);
        let infeasible = Individual::new(vec![0.0], vec![1.0], vec![0.5]);
        assert!(feasible.compares_better(&infeasible));
        assert!(!infeasible.compares_better(&feasible));
    }
}
