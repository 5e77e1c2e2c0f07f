//! # Similarity Crate
//!
//! Exact all-pairs user similarity over a sparse rating table.
//!
//! ## Components
//!
//! - **cosine**: cosine similarity between two sparse rating vectors
//! - **jobs**: enumerates every unordered user pair as a job
//! - **index**: thread-safe neighbor lists and their frozen read view
//! - **pool**: fixed-size worker pool draining the job queue
//! - **pipeline**: wires generator, pool and index together
//!
//! ## Example Usage
//!
//! ```ignore
//! use similarity::SimilarityPipeline;
//!
//! let run = SimilarityPipeline::new().run(&data.ratings, &sample, 8)?;
//! println!(
//!     "{} pairs accepted in {:?}",
//!     run.pairs_accepted, run.elapsed
//! );
//! let neighbors = run.index.edges_for("42");
//! ```
//!
//! ## Concurrency model
//!
//! One producer thread feeds a bounded queue (capacity 1000 by default) and
//! `num_workers` consumer threads drain it. Each accepted pair is written to
//! the index under a single lock, so the two directed edges of a pair are
//! always visible together. The rating table is shared read-only.

pub mod cosine;
pub mod error;
pub mod index;
pub mod jobs;
pub mod pipeline;
pub mod pool;

// Re-export commonly used types
pub use cosine::cosine_similarity;
pub use error::PipelineError;
pub use index::{ConcurrentSimilarityIndex, SimilarityEdge, SimilarityIndex};
pub use jobs::{Job, PairJobGenerator, pair_count};
pub use pipeline::{DEFAULT_QUEUE_CAPACITY, SimilarityPipeline, SimilarityRun, validate_sample};
pub use pool::{WorkerPool, WorkerStats};
