//! Error types for atoll-evo
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Error type for failures inside an island's evolution task
///
/// These are raised on a worker thread (migration hooks, algorithm step)
/// and surfaced to the caller when the archipelago is joined.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvolveError {
    /// Migration rate outside its valid range
    #[error("invalid migration rate: {0}")]
    MigrationRate(String),

    /// The algorithm failed to evolve the population
    #[error("algorithm failure: {0}")]
    Algorithm(String),

    /// The population is too small for the requested operation
    #[error("empty population")]
    EmptyPopulation,

    /// The worker thread panicked
    #[error("worker panicked: {0}")]
    Panicked(String),
}

/// A worker failure paired with the island it occurred on
#[derive(Debug, Clone, PartialEq)]
pub struct IslandFailure {
    /// Index of the failing island
    pub island: usize,
    /// The failure itself
    pub error: EvolveError,
}

impl std::fmt::Display for IslandFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "island {}: {}", self.island, self.error)
    }
}

/// Top-level error type for archipelago operations
#[derive(Debug, Error)]
pub enum ArchipelagoError {
    /// Invalid configuration (incompatible problem, topology size mismatch, ...)
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A mutating operation was invoked while the archipelago was evolving
    #[error("archipelago is busy evolving")]
    Busy,

    /// The pushed island is already assigned to an archipelago
    #[error("island is already assigned to an archipelago")]
    IslandBound,

    /// An inspector was called with an out-of-range island index
    #[error("island index {index} is out of range for size {size}")]
    InvalidIndex { index: usize, size: usize },

    /// One or more islands failed during evolution
    ///
    /// Populated by `join`; islands that completed keep their results and
    /// the migration history up to the failure point is preserved.
    #[error("evolution failed on {} island(s)", .failures.len())]
    Evolution {
        /// Per-island failures, in island order
        failures: Vec<IslandFailure>,
    },
}

/// Result type alias for archipelago operations
pub type ArchiResult<T> = Result<T, ArchipelagoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evolve_error_display() {
        let err = EvolveError::MigrationRate("fractional rate 1.5 exceeds 1.0".to_string());
        assert_eq!(
            err.to_string(),
            "invalid migration rate: fractional rate 1.5 exceeds 1.0"
        );

        let err = EvolveError::Algorithm("tournament on empty pool".to_string());
        assert_eq!(err.to_string(), "algorithm failure: tournament on empty pool");
    }

    #[test]
    fn test_island_failure_display() {
        let failure = IslandFailure {
            island: 3,
            error: EvolveError::EmptyPopulation,
        };
        assert_eq!(failure.to_string(), "island 3: empty population");
    }

    #[test]
    fn test_archipelago_error_display() {
        let err = ArchipelagoError::InvalidIndex { index: 7, size: 4 };
        assert_eq!(err.to_string(), "island index 7 is out of range for size 4");

        let err = ArchipelagoError::Evolution {
            failures: vec![
                IslandFailure {
                    island: 0,
                    error: EvolveError::EmptyPopulation,
                },
                IslandFailure {
                    island: 2,
                    error: EvolveError::Panicked("boom".to_string()),
                },
            ],
        };
        assert_eq!(err.to_string(), "evolution failed on 2 island(s)");
    }

    #[test]
    fn test_busy_error_display() {
        assert_eq!(
            ArchipelagoError::Busy.to_string(),
            "archipelago is busy evolving"
        );
    }
}
