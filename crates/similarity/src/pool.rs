//! Fixed-size pool of scoring workers draining one bounded job queue.

use crate::cosine::cosine_similarity;
use crate::index::ConcurrentSimilarityIndex;
use crate::jobs::Job;
use data_loader::{RatingTable, UserRatings};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{Scope, ScopedJoinHandle};
use tokio::sync::mpsc::Receiver;
use tracing::debug;

/// The consumer half of the job queue, shared by every worker.
///
/// Held in an `Arc` so the receiver is dropped together with the last worker;
/// a pool that died early then unblocks the producer instead of leaving it
/// waiting on a full queue.
type SharedReceiver<'a> = Arc<Mutex<Receiver<Job<'a>>>>;

/// What a single worker did during a run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    pub jobs: usize,
    pub accepted: usize,
}

impl WorkerStats {
    pub fn merge(self, other: WorkerStats) -> WorkerStats {
        WorkerStats {
            jobs: self.jobs + other.jobs,
            accepted: self.accepted + other.accepted,
        }
    }
}

/// A fixed number of workers, spawned onto a thread scope.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    num_workers: usize,
}

impl WorkerPool {
    pub fn new(num_workers: usize) -> Self {
        Self { num_workers }
    }

    pub fn size(&self) -> usize {
        self.num_workers
    }

    /// Spawn every worker on `scope`; each returns its stats when the queue is
    /// closed and drained.
    pub fn spawn<'scope, 'env>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        ratings: &'env RatingTable,
        index: &'env ConcurrentSimilarityIndex,
        jobs: Receiver<Job<'env>>,
    ) -> Vec<ScopedJoinHandle<'scope, WorkerStats>> {
        let jobs: SharedReceiver<'env> = Arc::new(Mutex::new(jobs));

        (0..self.num_workers)
            .map(|id| {
                let worker = Worker { id, ratings, index };
                let jobs = Arc::clone(&jobs);
                scope.spawn(move || worker.run(jobs))
            })
            .collect()
    }
}

struct Worker<'a> {
    id: usize,
    ratings: &'a RatingTable,
    index: &'a ConcurrentSimilarityIndex,
}

impl<'a> Worker<'a> {
    fn run(self, jobs: SharedReceiver<'a>) -> WorkerStats {
        let mut stats = WorkerStats::default();

        loop {
            // The guard is released before scoring so other workers can pull
            let next = jobs
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .blocking_recv();
            let Some(job) = next else {
                break;
            };

            stats.jobs += 1;
            if self.process(job) {
                stats.accepted += 1;
            }
        }

        debug!(
            worker = self.id,
            jobs = stats.jobs,
            accepted = stats.accepted,
            "Worker finished"
        );
        stats
    }

    /// Score one pair; returns whether it was recorded in the index
    fn process(&self, job: Job<'a>) -> bool {
        let ratings_a = self.lookup(job.user_a);
        let ratings_b = self.lookup(job.user_b);
        let score = cosine_similarity(ratings_a, ratings_b);

        if score > 0.0 {
            self.index.add(job.user_a, job.user_b, score);
            true
        } else {
            false
        }
    }

    fn lookup(&self, user_id: &str) -> &'a UserRatings {
        match self.ratings.get_user_ratings(user_id) {
            Some(ratings) => ratings,
            None => panic!(
                "user {} is not in the rating table; the sample must be validated before scoring",
                user_id
            ),
        }
    }
}
