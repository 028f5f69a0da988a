//! Migration machinery
//!
//! Everything that moves individuals between islands: the configuration
//! enums, the staging [`MigrationStore`], the history log, and the
//! selection/replacement policies islands delegate to.

pub mod history;
pub mod replacement;
pub mod selection;
pub mod store;

use serde::{Deserialize, Serialize};

pub use history::{MigrationLog, MigrationRecord};
pub use replacement::{ReplaceRandom, ReplaceWorst, ReplacementPolicy};
pub use selection::{MigrationRate, SelectBest, SelectRandom, SelectionPolicy};
pub use store::MigrationStore;

/// How emigrants are spread over a source island's neighbors
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionType {
    /// Emigrants go to one neighbor, chosen uniformly at random
    #[default]
    PointToPoint,
    /// Emigrants are copied to every neighbor
    ///
    /// On highly connected topologies this stages one copy per neighbor
    /// and can use considerable memory.
    Broadcast,
}

impl std::fmt::Display for DistributionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistributionType::PointToPoint => write!(f, "point-to-point"),
            DistributionType::Broadcast => write!(f, "broadcast"),
        }
    }
}

/// Which side of an edge initiates a migration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MigrationDirection {
    /// The source pushes: after evolving, an island stages its emigrants
    /// in the slots of the islands it connects to, and each island
    /// consumes whatever was pushed toward it before it evolves.
    Source,
    /// The destination pulls: after evolving, an island publishes its own
    /// best individuals, and each island pulls from its neighbors'
    /// published offers before it evolves.
    #[default]
    Destination,
}

impl std::fmt::Display for MigrationDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationDirection::Source => write!(f, "source"),
            MigrationDirection::Destination => write!(f, "destination"),
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use super::history::{MigrationLog, MigrationRecord};
    pub use super::replacement::{ReplaceRandom, ReplaceWorst, ReplacementPolicy};
    pub use super::selection::{MigrationRate, SelectBest, SelectRandom, SelectionPolicy};
    pub use super::store::MigrationStore;
    pub use super::{DistributionType, MigrationDirection};
}
