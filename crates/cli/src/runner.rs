//! One timed pipeline + recommendation run per worker count.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::info;

use data_loader::{DataSet, UserId};
use recommender::RecommendationEngine;
use similarity::SimilarityPipeline;

/// Timings and output of a single benchmark run
#[derive(Debug, Clone)]
pub struct RunResult {
    pub sample_size: usize,
    pub num_workers: usize,
    pub load_time: Duration,
    pub calc_time: Duration,
    pub recommend_time: Duration,
    pub target_user: Option<UserId>,
    /// Titles in rank order, falling back to the item id
    pub recommendations: Vec<String>,
    pub jobs_processed: usize,
    pub pairs_accepted: usize,
}

impl RunResult {
    pub fn total_time(&self) -> Duration {
        self.load_time + self.calc_time + self.recommend_time
    }
}

/// Runs the similarity pipeline and the recommendation engine over a fixed
/// sample, once per requested worker count.
#[derive(Clone)]
pub struct BenchmarkRunner {
    data: Arc<DataSet>,
    sample: Arc<Vec<UserId>>,
    target: Option<UserId>,
    pipeline: SimilarityPipeline,
    engine: RecommendationEngine,
}

impl BenchmarkRunner {
    pub fn new(
        data: Arc<DataSet>,
        sample: Vec<UserId>,
        target: Option<UserId>,
        pipeline: SimilarityPipeline,
        engine: RecommendationEngine,
    ) -> Self {
        Self {
            data,
            sample: Arc::new(sample),
            target,
            pipeline,
            engine,
        }
    }

    pub fn sample_size(&self) -> usize {
        self.sample.len()
    }

    /// Execute one full run on the blocking pool.
    pub async fn run(&self, num_workers: usize) -> Result<RunResult> {
        let runner = self.clone();
        tokio::task::spawn_blocking(move || runner.run_blocking(num_workers))
            .await
            .context("Benchmark task panicked")?
    }

    fn run_blocking(&self, num_workers: usize) -> Result<RunResult> {
        let ratings = &self.data.ratings;

        info!(
            "Computing similarities for {} users with {} workers",
            self.sample.len(),
            num_workers
        );
        let similarity = self
            .pipeline
            .run(ratings, &self.sample, num_workers)
            .with_context(|| format!("Similarity run with {} workers failed", num_workers))?;

        let start = Instant::now();
        let recommendations: Vec<String> = match &self.target {
            Some(target) => self
                .engine
                .recommend_items(target, &similarity.index, ratings)
                .iter()
                .map(|item_id| self.data.titles.title_or_id(item_id).to_string())
                .collect(),
            None => Vec::new(),
        };
        let recommend_time = start.elapsed();

        info!(
            "Run with {} workers: calc {:.2?}, recommend {:.2?}, {} recommendations",
            num_workers,
            similarity.elapsed,
            recommend_time,
            recommendations.len()
        );

        Ok(RunResult {
            sample_size: self.sample.len(),
            num_workers,
            load_time: self.data.stats.load_time,
            calc_time: similarity.elapsed,
            recommend_time,
            target_user: self.target.clone(),
            recommendations,
            jobs_processed: similarity.jobs_processed,
            pairs_accepted: similarity.pairs_accepted,
        })
    }
}
