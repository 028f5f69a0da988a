//! The archipelago coordinator
//!
//! An archipelago drives the concurrent evolution of its islands and
//! mediates the migration protocol coupling them. Each call to
//! [`Archipelago::evolve`] spawns one worker thread per island; workers
//! rendezvous on a shared start barrier, then free-run their epochs with
//! no further synchronization beyond the single migration mutex.
//!
//! Per epoch, a worker runs the pre-evolution hook (integrate pending
//! immigrants), one algorithm step, and the post-evolution hook (stage
//! emigrants according to the distribution and direction modes). Workers
//! acquire at most one lock besides their own island (the migration
//! mutex) and never wait on another worker while holding it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Barrier, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::algorithm::Algorithm;
use crate::error::{ArchiResult, ArchipelagoError, EvolveError, IslandFailure};
use crate::island::{ArchipelagoId, Island};
use crate::migration::{
    DistributionType, MigrationDirection, MigrationLog, MigrationRecord, MigrationStore,
};
use crate::population::Individual;
use crate::problem::Problem;
use crate::topology::{Topology, Unconnected};

static NEXT_ARCHIPELAGO_ID: AtomicU64 = AtomicU64::new(1);

fn next_archipelago_id() -> ArchipelagoId {
    NEXT_ARCHIPELAGO_ID.fetch_add(1, Ordering::Relaxed)
}

/// Lock a mutex, recovering the guard if a worker died while holding it
fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// State behind the single migration mutex
///
/// The store, the history, and both shared RNGs are only ever touched
/// with this lock held, which gives migration a total publish/consume
/// order across islands.
#[derive(Clone)]
struct MigrationState {
    store: MigrationStore,
    history: MigrationLog,
    /// Double-valued draws, handed to the migration policies
    drng: StdRng,
    /// Integer-valued draws for neighbor choice and subset sampling
    urng: StdRng,
}

impl MigrationState {
    fn new() -> Self {
        Self {
            store: MigrationStore::new(),
            history: MigrationLog::new(),
            drng: StdRng::from_entropy(),
            urng: StdRng::from_entropy(),
        }
    }
}

struct Shared {
    migration: Mutex<MigrationState>,
    /// Cooperative stop flag, checked by workers at epoch boundaries
    interrupt: AtomicBool,
}

/// How long a worker keeps evolving
#[derive(Clone, Copy, Debug)]
enum EvolvePlan {
    Epochs(usize),
    Timed(Duration),
}

/// Snapshot of everything a worker needs; immutable for the whole run
struct EvolveContext {
    shared: Arc<Shared>,
    topology: Box<dyn Topology>,
    distribution: DistributionType,
    direction: MigrationDirection,
    barrier: Arc<Barrier>,
}

impl EvolveContext {
    fn interrupted(&self) -> bool {
        self.shared.interrupt.load(Ordering::Relaxed)
    }

    /// Integrate pending immigrants before an epoch
    fn pre_evolution(&self, island: &mut Island) -> Result<(), EvolveError> {
        let mut state = lock_unpoisoned(&self.shared.migration);
        let MigrationState {
            store,
            history,
            drng,
            urng,
        } = &mut *state;

        match self.direction {
            MigrationDirection::Destination => {
                let budget = island.migration_budget()?;
                if budget == 0 {
                    return Ok(());
                }

                // Pull the offers every neighbor has published for itself.
                let mut pool: Vec<(usize, Individual)> = Vec::new();
                for u in self.topology.neighbors(island.index()) {
                    if let Some(offer) = store.peek(u, u) {
                        pool.extend(offer.iter().cloned().map(|ind| (u, ind)));
                    }
                }
                if pool.is_empty() {
                    return Ok(());
                }

                // Random subset sized by this island's own budget.
                pool.shuffle(&mut *urng);
                pool.truncate(budget);

                // The whole subset goes to the replacement policy in one
                // call, so candidates from different origins compete
                // against each other. The policy only reports a count;
                // per-origin history entries come from diffing the
                // population around the call.
                let candidates: Vec<Individual> =
                    pool.iter().map(|(_, ind)| ind.clone()).collect();
                let before = island.population().individuals().to_vec();
                let accepted = island.assimilate(&candidates, &mut *drng);
                if accepted == 0 {
                    return Ok(());
                }

                let mut gained: Vec<&Individual> =
                    island.population().individuals().iter().collect();
                for prior in &before {
                    if let Some(pos) = gained.iter().position(|resident| *resident == prior) {
                        gained.swap_remove(pos);
                    }
                }

                let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
                for (origin, candidate) in &pool {
                    if let Some(pos) = gained.iter().position(|arrival| *arrival == candidate) {
                        gained.swap_remove(pos);
                        *counts.entry(*origin).or_insert(0) += 1;
                    }
                }

                for (&origin, &count) in &counts {
                    trace!(
                        count,
                        origin,
                        destination = island.index(),
                        "immigrants integrated"
                    );
                    history.push(MigrationRecord::new(count, origin, island.index()));
                }
                Ok(())
            }
            MigrationDirection::Source => {
                // Everything pushed toward this island since its last epoch.
                // History for these transfers was already recorded at
                // publication time.
                let staged = store.consume(island.index());
                let mut batches: Vec<(usize, Vec<Individual>)> = staged.into_iter().collect();
                batches.sort_by_key(|(origin, _)| *origin);
                for (_, batch) in batches {
                    island.assimilate(&batch, &mut *drng);
                }
                Ok(())
            }
        }
    }

    /// Stage emigrants after an epoch
    fn post_evolution(&self, island: &Island) -> Result<(), EvolveError> {
        let mut state = lock_unpoisoned(&self.shared.migration);
        let MigrationState {
            store,
            history,
            drng,
            urng,
        } = &mut *state;

        let emigrants = island.select_emigrants(&mut *drng)?;
        if emigrants.is_empty() {
            return Ok(());
        }

        match self.direction {
            MigrationDirection::Destination => {
                // Publish this island's offer under its own key; neighbors
                // peek it without removing, so offers are non-destructive.
                store.publish(island.index(), island.index(), emigrants);
            }
            MigrationDirection::Source => {
                let neighbors = self.topology.neighbors(island.index());
                if neighbors.is_empty() {
                    return Ok(());
                }
                let count = emigrants.len();
                match self.distribution {
                    DistributionType::PointToPoint => {
                        let dest = neighbors[urng.gen_range(0..neighbors.len())];
                        trace!(count, origin = island.index(), dest, "emigrants staged");
                        store.publish(dest, island.index(), emigrants);
                        history.push(MigrationRecord::new(count, island.index(), dest));
                    }
                    DistributionType::Broadcast => {
                        for &dest in &neighbors {
                            trace!(count, origin = island.index(), dest, "emigrants staged");
                            store.publish(dest, island.index(), emigrants.clone());
                            history.push(MigrationRecord::new(count, island.index(), dest));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// One epoch: pre-evolution hook, algorithm step, post-evolution hook
fn evolve_epoch(
    ctx: &EvolveContext,
    island: &Mutex<Island>,
    rng: &mut StdRng,
) -> Result<(), EvolveError> {
    let mut guard = lock_unpoisoned(island);
    ctx.pre_evolution(&mut guard)?;
    guard.evolve_once(rng)?;
    ctx.post_evolution(&guard)
}

/// Worker entry point for one island
fn run_island(
    ctx: Arc<EvolveContext>,
    island: Arc<Mutex<Island>>,
    plan: EvolvePlan,
) -> Result<(), EvolveError> {
    let mut rng = StdRng::from_entropy();

    // All islands experience their first pre-evolution hook at roughly the
    // same wall time.
    ctx.barrier.wait();

    match plan {
        EvolvePlan::Epochs(epochs) => {
            for _ in 0..epochs {
                if ctx.interrupted() {
                    break;
                }
                evolve_epoch(&ctx, &island, &mut rng)?;
            }
        }
        EvolvePlan::Timed(duration) => {
            let start = Instant::now();
            while start.elapsed() < duration {
                if ctx.interrupted() {
                    break;
                }
                evolve_epoch(&ctx, &island, &mut rng)?;
            }
        }
    }
    Ok(())
}

/// A set of islands evolving concurrently, coupled by migration
///
/// See the [module documentation](self) for the threading model. All
/// mutating operations (`push_back`, `set_topology`, `evolve`) fail with
/// [`ArchipelagoError::Busy`] while an evolution is in flight; population
/// inspectors are meant to be used while idle.
pub struct Archipelago {
    id: ArchipelagoId,
    islands: Vec<Arc<Mutex<Island>>>,
    topology: Box<dyn Topology>,
    distribution: DistributionType,
    direction: MigrationDirection,
    /// Start barrier, rebuilt whenever the island count changes
    barrier: Arc<Barrier>,
    shared: Arc<Shared>,
    workers: Mutex<Vec<(usize, JoinHandle<Result<(), EvolveError>>)>>,
}

impl Archipelago {
    /// Create an empty archipelago with an unconnected topology
    pub fn new(distribution: DistributionType, direction: MigrationDirection) -> Self {
        Self::build(Box::new(Unconnected::new()), distribution, direction)
    }

    /// Create an empty archipelago bound to a topology
    ///
    /// The topology must start empty; it grows one vertex per pushed
    /// island.
    pub fn with_topology(
        topology: impl Topology + 'static,
        distribution: DistributionType,
        direction: MigrationDirection,
    ) -> ArchiResult<Self> {
        if topology.num_vertices() != 0 {
            return Err(ArchipelagoError::Configuration(format!(
                "topology has {} vertices but the archipelago has 0 islands",
                topology.num_vertices()
            )));
        }
        Ok(Self::build(Box::new(topology), distribution, direction))
    }

    /// Create an archipelago of `islands` islands, each holding
    /// `individuals` random individuals on the given problem
    ///
    /// Every island clones the algorithm and shares the problem.
    #[allow(clippy::too_many_arguments)]
    pub fn with_islands(
        problem: impl Problem + 'static,
        algorithm: impl Algorithm + 'static,
        islands: usize,
        individuals: usize,
        topology: impl Topology + 'static,
        distribution: DistributionType,
        direction: MigrationDirection,
    ) -> ArchiResult<Self> {
        let mut archi = Self::with_topology(topology, distribution, direction)?;
        let problem: Arc<dyn Problem> = Arc::new(problem);
        let algorithm: Box<dyn Algorithm> = Box::new(algorithm);
        let mut rng = StdRng::from_entropy();
        for _ in 0..islands {
            let island = Island::from_parts(
                Arc::clone(&problem),
                algorithm.clone_box(),
                individuals,
                &mut rng,
            );
            archi.push_back(island)?;
        }
        Ok(archi)
    }

    fn build(
        topology: Box<dyn Topology>,
        distribution: DistributionType,
        direction: MigrationDirection,
    ) -> Self {
        Self {
            id: next_archipelago_id(),
            islands: Vec::new(),
            topology,
            distribution,
            direction,
            barrier: Arc::new(Barrier::new(0)),
            shared: Arc::new(Shared {
                migration: Mutex::new(MigrationState::new()),
                interrupt: AtomicBool::new(false),
            }),
            workers: Mutex::new(Vec::new()),
        }
    }

    /// Number of islands
    pub fn len(&self) -> usize {
        self.islands.len()
    }

    /// Whether the archipelago has no islands
    pub fn is_empty(&self) -> bool {
        self.islands.is_empty()
    }

    /// The distribution mode
    pub fn distribution(&self) -> DistributionType {
        self.distribution
    }

    /// The migration direction
    pub fn direction(&self) -> MigrationDirection {
        self.direction
    }

    /// Deep copy of the topology
    pub fn topology(&self) -> Box<dyn Topology> {
        self.topology.clone_box()
    }

    /// Replace the topology
    ///
    /// Fails while evolving, or when the vertex count does not match the
    /// island count.
    pub fn set_topology(&mut self, topology: impl Topology + 'static) -> ArchiResult<()> {
        self.ensure_idle()?;
        if topology.num_vertices() != self.islands.len() {
            return Err(ArchipelagoError::Configuration(format!(
                "topology has {} vertices but the archipelago has {} islands",
                topology.num_vertices(),
                self.islands.len()
            )));
        }
        self.topology = Box::new(topology);
        Ok(())
    }

    /// Append an island at index `len()`
    ///
    /// Grows the topology by one vertex and rebuilds the start barrier.
    /// Fails while evolving, when the island is already bound to an
    /// archipelago, or when its problem is incompatible with the existing
    /// islands' problem.
    pub fn push_back(&mut self, island: Island) -> ArchiResult<()> {
        self.ensure_idle()?;
        if island.home().is_some() {
            return Err(ArchipelagoError::IslandBound);
        }
        if let Some(first) = self.islands.first() {
            let first = lock_unpoisoned(first);
            if !first.problem().is_compatible(island.problem()) {
                return Err(ArchipelagoError::Configuration(format!(
                    "problem '{}' is incompatible with resident problem '{}'",
                    island.problem().name(),
                    first.problem().name()
                )));
            }
        }

        let index = self.islands.len();
        let mut island = island;
        island.bind(self.id, index);
        self.islands.push(Arc::new(Mutex::new(island)));
        self.topology.push_back();
        self.rebuild_barrier();
        debug!(index, islands = self.islands.len(), "island attached");
        Ok(())
    }

    /// Start evolving every island for `epochs` epochs
    ///
    /// Returns immediately; use [`join`](Self::join) to wait for
    /// completion. Fails with [`ArchipelagoError::Busy`] while a previous
    /// evolution is still running.
    pub fn evolve(&mut self, epochs: usize) -> ArchiResult<()> {
        self.spawn_workers(EvolvePlan::Epochs(epochs))
    }

    /// Start evolving every island for at least `duration`
    ///
    /// Workers complete whole epochs only; the last epoch may overrun the
    /// requested duration.
    pub fn evolve_for(&mut self, duration: Duration) -> ArchiResult<()> {
        self.spawn_workers(EvolvePlan::Timed(duration))
    }

    fn spawn_workers(&mut self, plan: EvolvePlan) -> ArchiResult<()> {
        self.ensure_idle()?;
        // Reap handles left over from a completed-but-unjoined run; a
        // failure stored there surfaces now instead of being lost.
        self.reap_workers()?;

        self.shared.interrupt.store(false, Ordering::Relaxed);
        if self.islands.is_empty() {
            return Ok(());
        }
        debug!(islands = self.islands.len(), ?plan, "starting evolution");

        let ctx = Arc::new(EvolveContext {
            shared: Arc::clone(&self.shared),
            topology: self.topology.clone_box(),
            distribution: self.distribution,
            direction: self.direction,
            barrier: Arc::clone(&self.barrier),
        });

        let mut workers = lock_unpoisoned(&self.workers);
        for (index, island) in self.islands.iter().enumerate() {
            let ctx = Arc::clone(&ctx);
            let island = Arc::clone(island);
            let handle = thread::Builder::new()
                .name(format!("island-{index}"))
                .spawn(move || run_island(ctx, island, plan))
                .expect("failed to spawn island worker thread");
            workers.push((index, handle));
        }
        Ok(())
    }

    /// Block until all in-flight evolution has completed
    ///
    /// Worker failures are aggregated into
    /// [`ArchipelagoError::Evolution`]; islands that completed keep their
    /// results, and the migration history up to any failure is preserved.
    pub fn join(&self) -> ArchiResult<()> {
        self.reap_workers()
    }

    fn reap_workers(&self) -> ArchiResult<()> {
        let handles: Vec<_> = lock_unpoisoned(&self.workers).drain(..).collect();
        if handles.is_empty() {
            return Ok(());
        }
        let mut failures = Vec::new();
        for (island, handle) in handles {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(error)) => failures.push(IslandFailure { island, error }),
                Err(panic) => failures.push(IslandFailure {
                    island,
                    error: EvolveError::Panicked(panic_message(panic.as_ref())),
                }),
            }
        }
        debug!(failures = failures.len(), "evolution joined");
        if failures.is_empty() {
            Ok(())
        } else {
            Err(ArchipelagoError::Evolution { failures })
        }
    }

    /// Whether any island worker is still running
    pub fn busy(&self) -> bool {
        lock_unpoisoned(&self.workers)
            .iter()
            .any(|(_, handle)| !handle.is_finished())
    }

    /// Ask all islands to stop at their next epoch boundary
    ///
    /// In-flight epochs are not aborted. [`join`](Self::join) must still
    /// be called to reclaim the workers; interruption is not an error.
    pub fn interrupt(&self) {
        debug!("interrupt requested");
        self.shared.interrupt.store(true, Ordering::Relaxed);
    }

    fn ensure_idle(&self) -> ArchiResult<()> {
        if self.busy() {
            Err(ArchipelagoError::Busy)
        } else {
            Ok(())
        }
    }

    fn rebuild_barrier(&mut self) {
        self.barrier = Arc::new(Barrier::new(self.islands.len()));
    }

    /// Deep copy of the island at `index`
    ///
    /// The copy keeps its archipelago binding; detach it before pushing it
    /// elsewhere. Meant to be used while idle.
    pub fn island(&self, index: usize) -> ArchiResult<Island> {
        match self.islands.get(index) {
            Some(island) => Ok(lock_unpoisoned(island).clone()),
            None => Err(ArchipelagoError::InvalidIndex {
                index,
                size: self.islands.len(),
            }),
        }
    }

    /// Best individual ever seen across all islands
    pub fn champion(&self) -> Option<Individual> {
        let mut best: Option<Individual> = None;
        for island in &self.islands {
            let guard = lock_unpoisoned(island);
            if let Some(champ) = guard.population().champion() {
                best = match best {
                    None => Some(champ.clone()),
                    Some(current) if champ.compares_better(&current) => Some(champ.clone()),
                    current => current,
                };
            }
        }
        best
    }

    /// Copy of the migration history, in arrival order
    pub fn migration_history(&self) -> Vec<MigrationRecord> {
        lock_unpoisoned(&self.shared.migration)
            .history
            .records()
            .to_vec()
    }

    /// Render the migration history, one `count origin -> destination`
    /// line per record
    pub fn dump_migration_history(&self) -> String {
        lock_unpoisoned(&self.shared.migration).history.dump()
    }

    /// Reset the migration history
    pub fn clear_migration_history(&self) {
        lock_unpoisoned(&self.shared.migration).history.clear();
    }

    /// Multi-line report of the archipelago's configuration
    pub fn human_readable(&self) -> String {
        let mut out = String::new();
        out.push_str("Archipelago\n===========\n");
        out.push_str(&format!("Islands: {}\n", self.islands.len()));
        out.push_str(&format!("Distribution type: {}\n", self.distribution));
        out.push_str(&format!("Migration direction: {}\n", self.direction));
        out.push_str(&format!("Topology: {}\n", self.topology.human_readable()));
        for (index, island) in self.islands.iter().enumerate() {
            let guard = lock_unpoisoned(island);
            out.push_str(&format!(
                "Island {}: {} individuals, algorithm: {}, problem: {}\n",
                index,
                guard.population().len(),
                guard.algorithm().name(),
                guard.problem().name()
            ));
        }
        out
    }
}

impl Clone for Archipelago {
    /// Deep copy of islands, topology, migration store and history
    ///
    /// A live archipelago joins its in-flight evolution first; any
    /// failures from that run are discarded here, so call
    /// [`join`](Self::join) beforehand to observe them. The copy starts
    /// idle, with its islands rebound to the copy.
    fn clone(&self) -> Self {
        let _ = self.join();
        let id = next_archipelago_id();
        let islands: Vec<Arc<Mutex<Island>>> = self
            .islands
            .iter()
            .map(|island| {
                let mut copy = lock_unpoisoned(island).clone();
                let index = copy.index();
                copy.bind(id, index);
                Arc::new(Mutex::new(copy))
            })
            .collect();
        let migration = lock_unpoisoned(&self.shared.migration).clone();
        Self {
            id,
            barrier: Arc::new(Barrier::new(islands.len())),
            islands,
            topology: self.topology.clone_box(),
            distribution: self.distribution,
            direction: self.direction,
            shared: Arc::new(Shared {
                migration: Mutex::new(migration),
                interrupt: AtomicBool::new(false),
            }),
            workers: Mutex::new(Vec::new()),
        }
    }
}

impl Drop for Archipelago {
    /// Join all in-flight evolution before releasing resources
    fn drop(&mut self) {
        let _ = self.join();
    }
}

impl fmt::Display for Archipelago {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.human_readable())
    }
}

impl fmt::Debug for Archipelago {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Archipelago")
            .field("islands", &self.islands.len())
            .field("topology", &self.topology.human_readable())
            .field("distribution", &self.distribution)
            .field("direction", &self.direction)
            .field("busy", &self.busy())
            .finish()
    }
}
