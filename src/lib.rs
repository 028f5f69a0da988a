//! # atoll-evo
//!
//! A parallel island-model evolutionary optimization engine.
//!
//! A population of candidate solutions is partitioned across several
//! *islands*. Each island independently evolves its local sub-population
//! on its own worker thread, and islands periodically exchange selected
//! individuals (*migration*) along the edges of a configurable topology.
//!
//! ## Features
//!
//! - **Archipelago coordinator**: concurrent evolution with a shared start
//!   barrier, non-blocking [`evolve`](archipelago::Archipelago::evolve),
//!   cooperative [`interrupt`](archipelago::Archipelago::interrupt), and a
//!   migration history log
//! - **Migration protocol**: source- or destination-initiated, with
//!   point-to-point or broadcast distribution over the topology
//! - **Pluggable collaborators**: problems, algorithms, topologies, and
//!   migration selection/replacement policies are all clonable trait
//!   objects
//! - **Parallel evaluation**: initial populations evaluate with rayon when
//!   the `parallel` feature (default) is enabled
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use atoll_evo::prelude::*;
//! use std::time::Duration;
//!
//! fn main() -> Result<(), ArchipelagoError> {
//!     // Eight islands of 32 individuals on a ring, pulling migrants
//!     // from their neighbors before each epoch.
//!     let mut archi = Archipelago::with_islands(
//!         Rastrigin::new(10),
//!         SimpleGa::new(),
//!         8,
//!         32,
//!         Ring::new(),
//!         DistributionType::PointToPoint,
//!         MigrationDirection::Destination,
//!     )?;
//!
//!     archi.evolve(200)?; // returns immediately
//!     archi.join()?;
//!
//!     println!("{}", archi.human_readable());
//!     println!("{}", archi.dump_migration_history());
//!     println!("best: {:?}", archi.champion());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`archipelago`]: the coordinator driving islands and migration
//! - [`island`]: a single evolutionary worker and its policies
//! - [`migration`]: staging store, history, direction/distribution modes,
//!   selection and replacement policies
//! - [`topology`]: neighbor graphs over island indices
//! - [`algorithm`]: the [`Algorithm`](algorithm::Algorithm) trait plus
//!   [`SimpleGa`](algorithm::simple_ga::SimpleGa) and
//!   [`MonteCarlo`](algorithm::monte_carlo::MonteCarlo)
//! - [`problem`]: the [`Problem`](problem::Problem) trait, bounds, and
//!   benchmark problems
//! - [`population`]: individuals and populations

pub mod algorithm;
pub mod archipelago;
pub mod error;
pub mod island;
pub mod migration;
pub mod population;
pub mod problem;
pub mod topology;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithm::prelude::*;
    pub use crate::archipelago::Archipelago;
    pub use crate::error::{ArchiResult, ArchipelagoError, EvolveError, IslandFailure};
    pub use crate::island::{ArchipelagoId, Island};
    pub use crate::migration::prelude::*;
    pub use crate::population::prelude::*;
    pub use crate::problem::prelude::*;
    pub use crate::topology::prelude::*;
}
