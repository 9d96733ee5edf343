//! Fixed-size worker pool over a partitioned artifact list
//!
//! The artifact list is split into contiguous shards, one per worker. Each
//! worker builds its own parser from the shared factory, resolves its shard
//! and sends exactly one [`ShardResult`] on a bounded channel. A completion
//! thread joins every worker and then drops the last sender, so the
//! receiving side sees the channel close only after all results are in.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use osdeps_core::types::Artifact;
use osdeps_parser::ArtifactParser;
use tracing::{debug, error, trace, warn};

use crate::resolve::{DependencyResolver, ProbeDirectories};

/// Number of workers to use for `artifact_count` artifacts
///
/// Non-positive requests select the number of logical CPUs. The result is
/// never larger than the artifact count, and zero only when there is
/// nothing to do.
pub fn effective_workers(requested: i64, artifact_count: usize) -> usize {
    let requested = if requested > 0 {
        usize::try_from(requested).unwrap_or(usize::MAX)
    } else {
        num_cpus::get()
    };
    requested.max(1).min(artifact_count)
}

/// Contiguous index range handled by `worker` out of `workers`
///
/// Ranges for `0..workers` are disjoint, cover `0..len` exactly and differ
/// in size by at most one.
pub fn shard_range(worker: usize, workers: usize, len: usize) -> Range<usize> {
    if workers == 0 {
        return 0..0;
    }
    (worker * len / workers)..((worker + 1) * len / workers)
}

/// Lifecycle of the pool as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    /// Shards assigned, threads being started
    Spawning,
    /// All workers started
    Running,
    /// Waiting for workers to finish
    Draining,
    /// Every worker joined, channel closed
    Closed,
}

/// Lifecycle of a single worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Assigned,
    Processing,
    Emitting,
    Done,
}

/// Output of one worker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardResult {
    /// Index of the worker that produced the result
    pub worker_id: usize,
    /// Slice of the artifact list the worker handled
    pub range: Range<usize>,
    /// Distinct resolved dependency strings found in the shard
    pub dependencies: HashSet<String>,
    /// Artifacts parsed successfully
    pub parsed: usize,
    /// Artifacts skipped because they could not be parsed
    pub skipped: usize,
    /// Symbolic references that could not be resolved
    pub unresolved: usize,
    /// Symbolic references with more than one valid candidate
    pub ambiguous: usize,
}

/// Pool of worker threads over a fixed artifact list
#[derive(Debug)]
pub struct WorkerPool {
    artifacts: Arc<[Artifact]>,
    probes: Arc<ProbeDirectories>,
    workers: usize,
}

impl WorkerPool {
    /// Create a pool for `artifacts` with the requested worker count
    pub fn new(artifacts: Vec<Artifact>, requested_workers: i64) -> Self {
        let workers = effective_workers(requested_workers, artifacts.len());
        let probes = ProbeDirectories::from_artifacts(&artifacts);

        Self {
            artifacts: artifacts.into(),
            probes: Arc::new(probes),
            workers,
        }
    }

    /// Number of workers that will be started
    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn artifact_count(&self) -> usize {
        self.artifacts.len()
    }

    /// Start the workers and return the receiving end of the result channel
    ///
    /// `parser_factory` is called once per worker so that no parser state is
    /// shared between threads. The channel closes after every worker has
    /// finished, including workers that panicked.
    pub fn start<F, P>(self, parser_factory: F) -> Receiver<ShardResult>
    where
        F: Fn() -> P + Send + Sync + 'static,
        P: ArtifactParser,
    {
        let (tx, rx) = bounded(self.workers.max(1));
        let factory = Arc::new(parser_factory);

        debug!("Pool state: {:?} ({} workers)", PoolState::Spawning, self.workers);
        let mut handles = Vec::with_capacity(self.workers);

        for worker_id in 0..self.workers {
            let job = self.job(worker_id, &tx);
            let worker_factory = Arc::clone(&factory);
            let spawned = thread::Builder::new()
                .name(format!("osdeps-worker-{}", worker_id))
                .spawn(move || job.run(worker_factory.as_ref()));

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    // The channel has room for every shard, so this cannot block
                    warn!("Failed to spawn worker {}: {}, running shard inline", worker_id, e);
                    self.job(worker_id, &tx).run(factory.as_ref());
                },
            }
        }
        debug!("Pool state: {:?}", PoolState::Running);

        let completion = move || {
            debug!("Pool state: {:?}", PoolState::Draining);
            for handle in handles {
                let name = handle.thread().name().unwrap_or("worker").to_string();
                if handle.join().is_err() {
                    error!("{} panicked; its shard result is lost", name);
                }
            }
            drop(tx);
            debug!("Pool state: {:?}", PoolState::Closed);
        };

        // If this fails the closure is dropped with the last sender, and the
        // channel still closes once the workers drop their clones.
        if let Err(e) = thread::Builder::new()
            .name("osdeps-pool-completion".to_string())
            .spawn(completion)
        {
            warn!("Failed to spawn completion thread: {}", e);
        }

        rx
    }

    fn job(&self, worker_id: usize, results: &Sender<ShardResult>) -> ShardJob {
        ShardJob {
            worker_id,
            range: shard_range(worker_id, self.workers, self.artifacts.len()),
            artifacts: Arc::clone(&self.artifacts),
            probes: Arc::clone(&self.probes),
            results: results.clone(),
        }
    }
}

/// Everything one worker needs, moved into its thread
struct ShardJob {
    worker_id: usize,
    range: Range<usize>,
    artifacts: Arc<[Artifact]>,
    probes: Arc<ProbeDirectories>,
    results: Sender<ShardResult>,
}

impl ShardJob {
    fn run<F, P>(self, factory: &F)
    where
        F: Fn() -> P,
        P: ArtifactParser,
    {
        let id = self.worker_id;
        trace!("Worker {} {:?}: artifacts {:?}", id, WorkerState::Assigned, self.range);

        let mut resolver = DependencyResolver::new(factory(), &self.probes);
        let mut shard = ShardResult {
            worker_id: id,
            range: self.range.clone(),
            ..Default::default()
        };

        trace!("Worker {} {:?}", id, WorkerState::Processing);
        for artifact in &self.artifacts[self.range.clone()] {
            match resolver.resolve(artifact) {
                Ok(resolved) => {
                    shard.parsed += 1;
                    shard.unresolved += resolved.unresolved;
                    shard.ambiguous += resolved.ambiguous;
                    shard.dependencies.extend(
                        resolved
                            .dependencies
                            .into_iter()
                            .filter(|dep| !dep.is_empty()),
                    );
                },
                Err(e) if e.is_recoverable() => {
                    debug!("Skipping {}: {}", artifact.path, e);
                    shard.skipped += 1;
                },
                Err(e) => {
                    warn!("Skipping {} after unexpected error: {}", artifact.path, e);
                    shard.skipped += 1;
                },
            }
        }

        trace!("Worker {} {:?}", id, WorkerState::Emitting);
        if self.results.send(shard).is_err() {
            debug!("Result channel closed before worker {} could report", id);
        }
        trace!("Worker {} {:?}", id, WorkerState::Done);
    }
}
