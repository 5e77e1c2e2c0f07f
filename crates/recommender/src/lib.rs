//! Neighbor-based item recommendation.
//!
//! Works from the frozen [`similarity::SimilarityIndex`] produced by a
//! completed pipeline run:
//! 1. Rank the target's neighbors by similarity and keep the top N
//! 2. Every item a neighbor rated and the target did not gets one vote
//! 3. Rank items by votes and keep the top K
//!
//! ## Example Usage
//! ```ignore
//! use recommender::RecommendationEngine;
//!
//! let engine = RecommendationEngine::new()
//!     .with_max_neighbors(10)
//!     .with_max_recommendations(7);
//!
//! let items = engine.recommend_items("42", &run.index, &data.ratings);
//! ```

pub mod engine;

// Re-export main types
pub use engine::{
    DEFAULT_MAX_NEIGHBORS, DEFAULT_MAX_RECOMMENDATIONS, Recommendation, RecommendationEngine,
};
