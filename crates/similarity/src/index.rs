//! Per-user neighbor lists, written concurrently and read after the barrier.
//!
//! [`ConcurrentSimilarityIndex`] is the only shared mutable state among
//! workers. It is guarded by a single coarse mutex so that both halves of a
//! symmetric pair land in one critical section. Once every worker has been
//! joined it is frozen into a [`SimilarityIndex`], the read-only view the
//! recommendation stage works from.

use data_loader::UserId;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

type EdgeMap = HashMap<UserId, Vec<SimilarityEdge>>;

/// A directed record of one user's similarity to another
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityEdge {
    pub neighbor: UserId,
    pub score: f64,
}

/// Thread-safe accumulator of similarity edges.
#[derive(Debug, Default)]
pub struct ConcurrentSimilarityIndex {
    edges: Mutex<EdgeMap>,
}

impl ConcurrentSimilarityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a scored pair under both users as one indivisible update.
    pub fn add(&self, user_a: &str, user_b: &str, score: f64) {
        let mut edges = self.lock();
        push_edge(&mut edges, user_a, user_b, score);
        push_edge(&mut edges, user_b, user_a, score);
    }

    /// Snapshot of the edges currently recorded for `user_id`
    pub fn edges_for(&self, user_id: &str) -> Vec<SimilarityEdge> {
        self.lock().get(user_id).cloned().unwrap_or_default()
    }

    /// Consume the index once all writers are done and hand out the read view.
    pub fn freeze(self) -> SimilarityIndex {
        let edges = self
            .edges
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        SimilarityIndex { edges }
    }

    // A writer can only poison the lock by panicking, and that panic already
    // takes the whole run down; the map itself is never left half-updated.
    fn lock(&self) -> MutexGuard<'_, EdgeMap> {
        self.edges.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn push_edge(edges: &mut EdgeMap, owner: &str, neighbor: &str, score: f64) {
    let edge = SimilarityEdge {
        neighbor: neighbor.to_string(),
        score,
    };
    match edges.get_mut(owner) {
        Some(list) => list.push(edge),
        None => {
            edges.insert(owner.to_string(), vec![edge]);
        }
    }
}

/// Read-only neighbor lists produced by a completed pipeline run.
///
/// Users with no positive-similarity neighbor have no entry at all.
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    edges: EdgeMap,
}

impl SimilarityIndex {
    /// Edges recorded for a user, in arrival order (not sorted).
    ///
    /// Returns an empty slice for users without neighbors
    pub fn edges_for(&self, user_id: &str) -> &[SimilarityEdge] {
        self.edges
            .get(user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains_user(&self, user_id: &str) -> bool {
        self.edges.contains_key(user_id)
    }

    /// Number of users with at least one neighbor
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Total directed edges; twice the number of accepted pairs
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(|v| v.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UserId, &[SimilarityEdge])> {
        self.edges.iter().map(|(user, edges)| (user, edges.as_slice()))
    }

    /// Accepted pairs keyed by (smaller id, larger id), independent of the
    /// order in which workers delivered them.
    pub fn pair_scores(&self) -> BTreeMap<(UserId, UserId), f64> {
        let mut pairs = BTreeMap::new();
        for (user, edges) in &self.edges {
            for edge in edges {
                if *user < edge.neighbor {
                    pairs.insert((user.clone(), edge.neighbor.clone()), edge.score);
                }
            }
        }
        pairs
    }
}
