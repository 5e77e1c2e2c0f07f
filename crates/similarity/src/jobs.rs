//! Pair job enumeration.
//!
//! Every unordered pair of sampled users becomes one job. Enumeration order is
//! fixed (`i < j` over the sample order) even though the order in which
//! workers pick jobs up is not.

use data_loader::UserId;
use tokio::sync::mpsc::Sender;
use tracing::{debug, warn};

/// One unit of work: score `user_a` against `user_b`.
///
/// Jobs borrow the ids from the sample instead of cloning them, since a run
/// creates N(N-1)/2 of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Job<'a> {
    pub user_a: &'a str,
    pub user_b: &'a str,
}

/// Number of unordered pairs among `n` users
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Produces one job per unordered pair of an ordered user sample.
#[derive(Debug, Clone, Copy)]
pub struct PairJobGenerator<'a> {
    user_ids: &'a [UserId],
}

impl<'a> PairJobGenerator<'a> {
    pub fn new(user_ids: &'a [UserId]) -> Self {
        Self { user_ids }
    }

    /// Number of jobs this generator will emit
    pub fn job_count(&self) -> usize {
        pair_count(self.user_ids.len())
    }

    /// All pairs, in `for i { for j in i+1.. }` order
    pub fn jobs(self) -> impl Iterator<Item = Job<'a>> {
        let ids = self.user_ids;
        ids.iter().enumerate().flat_map(move |(i, user_a)| {
            ids[i + 1..].iter().map(move |user_b| Job {
                user_a: user_a.as_str(),
                user_b: user_b.as_str(),
            })
        })
    }

    /// Push every job into the bounded queue, blocking while it is full.
    ///
    /// Dropping `sender` on return closes the stream, which is how workers learn
    /// there is nothing left. Returns the number of jobs delivered. Must not be
    /// called from inside an async task.
    pub fn run(self, sender: Sender<Job<'a>>) -> usize {
        let mut emitted = 0;
        for job in self.jobs() {
            if sender.blocking_send(job).is_err() {
                // Only happens when every worker is gone
                warn!("Job queue closed after {} jobs, stopping generator", emitted);
                return emitted;
            }
            emitted += 1;
        }
        debug!("Generator finished emitting {} jobs", emitted);
        emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn ids(n: usize) -> Vec<UserId> {
        (0..n).map(|i| format!("u{}", i)).collect()
    }

    fn assert_unique_pairs(n: usize) {
        let users = ids(n);
        let generator = PairJobGenerator::new(&users);
        let jobs: Vec<Job> = generator.jobs().collect();

        assert_eq!(jobs.len(), n * n.saturating_sub(1) / 2);
        assert_eq!(jobs.len(), generator.job_count());

        let mut seen = HashSet::new();
        for job in &jobs {
            assert_ne!(job.user_a, job.user_b, "self-pair emitted");
            let key = if job.user_a < job.user_b {
                (job.user_a, job.user_b)
            } else {
                (job.user_b, job.user_a)
            };
            assert!(seen.insert(key), "duplicate pair {:?}", key);
        }
    }

    #[test]
    fn test_pair_counts() {
        for n in [0, 1, 2, 5, 100] {
            assert_unique_pairs(n);
        }
    }

    #[test]
    fn test_enumeration_order() {
        let users = ids(4);
        let pairs: Vec<(&str, &str)> = PairJobGenerator::new(&users)
            .jobs()
            .map(|job| (job.user_a, job.user_b))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("u0", "u1"),
                ("u0", "u2"),
                ("u0", "u3"),
                ("u1", "u2"),
                ("u1", "u3"),
                ("u2", "u3"),
            ]
        );
    }

    #[test]
    fn test_run_closes_stream() {
        let users = ids(5);
        let generator = PairJobGenerator::new(&users);
        let (sender, mut receiver) = tokio::sync::mpsc::channel(2);

        let received = std::thread::scope(|scope| {
            let producer = scope.spawn(move || generator.run(sender));

            let mut received = Vec::new();
            while let Some(job) = receiver.blocking_recv() {
                received.push((job.user_a.to_string(), job.user_b.to_string()));
            }
            assert_eq!(producer.join().unwrap(), 10);
            received
        });

        assert_eq!(received.len(), 10);
        assert_eq!(received[0], ("u0".to_string(), "u1".to_string()));
    }

    #[test]
    fn test_run_stops_when_receiver_dropped() {
        let users = ids(10);
        let (sender, receiver) = tokio::sync::mpsc::channel(3);
        drop(receiver);

        assert_eq!(PairJobGenerator::new(&users).run(sender), 0);
    }

    proptest! {
        #[test]
        fn prop_job_count_matches_formula(n in 0usize..60) {
            let users = ids(n);
            prop_assert_eq!(PairJobGenerator::new(&users).jobs().count(), pair_count(n));
        }
    }
}
