//! All-pairs similarity pipeline: one producer, N workers, one index.
//!
//! ```text
//! PairJobGenerator --(bounded queue)--> WorkerPool --> ConcurrentSimilarityIndex
//!                                                          |  (join all workers)
//!                                                          v
//!                                                   SimilarityIndex
//! ```
//!
//! The index is only frozen after every worker thread has been joined, so the
//! read view handed to callers can never be observed mid-computation.

use crate::error::{PipelineError, Result};
use crate::index::{ConcurrentSimilarityIndex, SimilarityIndex};
use crate::jobs::PairJobGenerator;
use crate::pool::{WorkerPool, WorkerStats};
use data_loader::{RatingTable, UserId};
use std::collections::HashSet;
use std::panic;
use std::thread::{self, ScopedJoinHandle};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{info, instrument};

/// Default capacity of the job queue between the generator and the workers
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Result of one completed pipeline run
#[derive(Debug)]
pub struct SimilarityRun {
    pub index: SimilarityIndex,
    pub elapsed: Duration,
    pub jobs_processed: usize,
    pub pairs_accepted: usize,
}

/// Computes pairwise cosine similarity over a user sample.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityPipeline {
    queue_capacity: usize,
}

impl SimilarityPipeline {
    pub fn new() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    /// Configure the bounded queue size (default: 1000, minimum: 1)
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Score every pair of `user_ids` with `num_workers` threads.
    ///
    /// Preconditions are checked before any thread starts. The accepted edges
    /// and their scores do not depend on `num_workers`; only the order of edges
    /// inside each user's list does.
    #[instrument(skip(self, ratings, user_ids), fields(users = user_ids.len()))]
    pub fn run(
        &self,
        ratings: &RatingTable,
        user_ids: &[UserId],
        num_workers: usize,
    ) -> Result<SimilarityRun> {
        validate_sample(ratings, user_ids)?;
        if num_workers == 0 {
            return Err(PipelineError::NoWorkers);
        }

        let start = Instant::now();
        let index = ConcurrentSimilarityIndex::new();
        let generator = PairJobGenerator::new(user_ids);
        let pool = WorkerPool::new(num_workers);

        info!(
            "Starting {} workers for {} pair jobs",
            pool.size(),
            generator.job_count()
        );

        let (sender, receiver) = mpsc::channel(self.queue_capacity);

        let stats = thread::scope(|scope| {
            let producer = scope.spawn(move || generator.run(sender));
            let workers = pool.spawn(scope, ratings, &index, receiver);

            // Barrier: every worker has exited before the index is touched again
            let stats = workers
                .into_iter()
                .map(join)
                .fold(WorkerStats::default(), WorkerStats::merge);
            join(producer);
            stats
        });

        let index = index.freeze();
        let elapsed = start.elapsed();

        info!(
            "All workers finished: {} jobs, {} pairs accepted, {} users with neighbors in {:.2?}",
            stats.jobs,
            stats.accepted,
            index.len(),
            elapsed
        );

        Ok(SimilarityRun {
            index,
            elapsed,
            jobs_processed: stats.jobs,
            pairs_accepted: stats.accepted,
        })
    }
}

impl Default for SimilarityPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that every sampled user is rated and appears only once.
pub fn validate_sample(ratings: &RatingTable, user_ids: &[UserId]) -> Result<()> {
    let mut seen = HashSet::with_capacity(user_ids.len());
    for user_id in user_ids {
        if !ratings.contains_user(user_id) {
            return Err(PipelineError::UnknownUser {
                user_id: user_id.clone(),
            });
        }
        if !seen.insert(user_id.as_str()) {
            return Err(PipelineError::DuplicateUser {
                user_id: user_id.clone(),
            });
        }
    }
    Ok(())
}

// A panicking thread means a broken precondition; re-raise it on the caller
fn join<T>(handle: ScopedJoinHandle<'_, T>) -> T {
    match handle.join() {
        Ok(value) => value,
        Err(payload) => panic::resume_unwind(payload),
    }
}
