//! The recommendation engine.
//!
//! Votes are presence counts: a neighbor contributes one vote to each item it
//! rated that the target has not, regardless of the rating value or of how
//! similar the neighbor is. Both rankings use an explicit secondary key so the
//! output is reproducible even though neighbor lists arrive in whatever order
//! the workers produced them.

use data_loader::{ItemId, RatingTable};
use similarity::{SimilarityEdge, SimilarityIndex};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Default number of neighbors consulted per recommendation
pub const DEFAULT_MAX_NEIGHBORS: usize = 10;

/// Default number of items returned
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 7;

/// A candidate item and the number of selected neighbors who rated it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub item_id: ItemId,
    pub votes: u32,
}

/// Selects top-N neighbors and ranks the items they rated.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationEngine {
    max_neighbors: usize,
    max_recommendations: usize,
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self {
            max_neighbors: DEFAULT_MAX_NEIGHBORS,
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
        }
    }

    /// Configure how many neighbors vote (default: 10)
    pub fn with_max_neighbors(mut self, max_neighbors: usize) -> Self {
        self.max_neighbors = max_neighbors;
        self
    }

    /// Configure how many items are returned (default: 7)
    pub fn with_max_recommendations(mut self, max_recommendations: usize) -> Self {
        self.max_recommendations = max_recommendations;
        self
    }

    /// Ranked recommendations for `target_user`.
    ///
    /// Returns an empty list when the target has no positive-similarity
    /// neighbor or every neighbor item is already rated by the target.
    #[instrument(skip(self, index, ratings))]
    pub fn recommend(
        &self,
        target_user: &str,
        index: &SimilarityIndex,
        ratings: &RatingTable,
    ) -> Vec<Recommendation> {
        let neighbors = self.select_neighbors(target_user, index);
        if neighbors.is_empty() {
            debug!("No neighbors for user {}", target_user);
            return Vec::new();
        }

        let votes = tally_votes(target_user, &neighbors, ratings);
        debug!(
            "{} neighbors proposed {} candidate items",
            neighbors.len(),
            votes.len()
        );

        let mut ranked: Vec<(&str, u32)> = votes.into_iter().collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.max_recommendations);

        ranked
            .into_iter()
            .map(|(item_id, votes)| Recommendation {
                item_id: item_id.to_string(),
                votes,
            })
            .collect()
    }

    /// Same as [`recommend`](Self::recommend), keeping only the item ids
    pub fn recommend_items(
        &self,
        target_user: &str,
        index: &SimilarityIndex,
        ratings: &RatingTable,
    ) -> Vec<ItemId> {
        self.recommend(target_user, index, ratings)
            .into_iter()
            .map(|r| r.item_id)
            .collect()
    }

    /// Top neighbors by score descending, ties by neighbor id ascending
    pub fn select_neighbors<'a>(
        &self,
        target_user: &str,
        index: &'a SimilarityIndex,
    ) -> Vec<&'a SimilarityEdge> {
        let mut neighbors: Vec<&SimilarityEdge> = index.edges_for(target_user).iter().collect();
        neighbors.sort_unstable_by(|a, b| compare_edges(a, b));
        neighbors.truncate(self.max_neighbors);
        neighbors
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn compare_edges(a: &SimilarityEdge, b: &SimilarityEdge) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.neighbor.cmp(&b.neighbor))
}

/// One vote per (neighbor, item) for items the target has not rated.
fn tally_votes<'a>(
    target_user: &str,
    neighbors: &[&SimilarityEdge],
    ratings: &'a RatingTable,
) -> HashMap<&'a str, u32> {
    let target_ratings = ratings.get_user_ratings(target_user);
    let mut votes: HashMap<&str, u32> = HashMap::new();

    for neighbor in neighbors {
        let Some(neighbor_ratings) = ratings.get_user_ratings(&neighbor.neighbor) else {
            continue;
        };
        for item_id in neighbor_ratings.keys() {
            let already_rated = target_ratings.is_some_and(|t| t.contains_key(item_id));
            if !already_rated {
                *votes.entry(item_id.as_str()).or_insert(0) += 1;
            }
        }
    }

    votes
}
