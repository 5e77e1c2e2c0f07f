//! Validated settings for a benchmark session.

use anyhow::{ensure, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    pub data_dir: PathBuf,
    /// Number of users to sample; 0 means the whole dataset
    pub sample_size: usize,
    pub seed: u64,
    /// One pipeline run per entry, in order
    pub worker_counts: Vec<usize>,
    pub max_neighbors: usize,
    pub max_recommendations: usize,
    pub queue_capacity: usize,
    /// CSV files are written to `<output_prefix>_<workers>w.csv`
    pub output_prefix: String,
}

impl BenchmarkConfig {
    pub fn validate(self) -> Result<Self> {
        ensure!(
            !self.worker_counts.is_empty(),
            "At least one worker count is required"
        );
        ensure!(
            self.worker_counts.iter().all(|&w| w >= 1),
            "Worker counts must be at least 1, got {:?}",
            self.worker_counts
        );
        ensure!(self.queue_capacity >= 1, "Queue capacity must be at least 1");
        ensure!(!self.output_prefix.is_empty(), "Output prefix must not be empty");
        Ok(self)
    }
}
