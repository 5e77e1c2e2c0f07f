mod config;
mod report;
mod runner;
mod sample;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use config::BenchmarkConfig;
use data_loader::DataSet;
use recommender::RecommendationEngine;
use runner::{BenchmarkRunner, RunResult};
use similarity::SimilarityPipeline;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// SimRecs - user similarity benchmark and neighbor recommendations
#[derive(Parser)]
#[command(name = "simrecs")]
#[command(about = "User cosine similarity benchmark with neighbor recommendations", long_about = None)]
struct Cli {
    /// Path to the MovieLens 10M dataset directory
    #[arg(short, long, default_value = "ml-10M100K")]
    data_dir: PathBuf,

    /// Number of users to sample (0 = all users)
    #[arg(short, long, default_value = "0")]
    size: usize,

    /// Prefix for the per-run CSV files
    #[arg(short, long, default_value = "benchmark")]
    output: String,

    /// Worker counts to benchmark, comma separated
    #[arg(short, long, value_delimiter = ',', default_value = "4,12,20")]
    workers: Vec<usize>,

    /// Neighbors consulted per recommendation
    #[arg(long, default_value = "10")]
    neighbors: usize,

    /// Recommendations returned for the target user
    #[arg(long, default_value = "7")]
    recommendations: usize,

    /// Seed for user sampling
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Capacity of the bounded job queue
    #[arg(long, default_value = "1000")]
    queue_capacity: usize,
}

impl From<Cli> for BenchmarkConfig {
    fn from(cli: Cli) -> Self {
        BenchmarkConfig {
            data_dir: cli.data_dir,
            sample_size: cli.size,
            seed: cli.seed,
            worker_counts: cli.workers,
            max_neighbors: cli.neighbors,
            max_recommendations: cli.recommendations,
            queue_capacity: cli.queue_capacity,
            output_prefix: cli.output,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = BenchmarkConfig::from(Cli::parse()).validate()?;

    println!("Loading MovieLens dataset from {}...", config.data_dir.display());
    let data = load_dataset(config.data_dir.clone()).await?;
    println!(
        "{} Loaded {} ratings from {} users in {:.2?}",
        "✓".green(),
        data.ratings.rating_count(),
        data.ratings.len(),
        data.stats.load_time
    );
    if data.stats.skipped_rating_lines + data.stats.skipped_title_lines > 0 {
        println!(
            "{} Skipped {} rating lines and {} title lines",
            "!".yellow(),
            data.stats.skipped_rating_lines,
            data.stats.skipped_title_lines
        );
    }

    let sample = sample::select_sample(data.ratings.user_ids(), config.sample_size, config.seed);
    let target = sample::select_target(&data.ratings, &sample);
    match &target {
        Some((user, count)) => info!(
            "Sampled {} users, target user {} with {} ratings",
            sample.len(),
            user,
            count
        ),
        None => info!("Sampled {} users, no target user", sample.len()),
    }

    let runner = BenchmarkRunner::new(
        data,
        sample,
        target.map(|(user, _)| user),
        SimilarityPipeline::new().with_queue_capacity(config.queue_capacity),
        RecommendationEngine::new()
            .with_max_neighbors(config.max_neighbors)
            .with_max_recommendations(config.max_recommendations),
    );

    let results = run_calibration(&runner, &config).await?;
    report::print_final_summary(&results);

    Ok(())
}

async fn load_dataset(data_dir: PathBuf) -> Result<Arc<DataSet>> {
    let data = tokio::task::spawn_blocking(move || DataSet::load_from_files(&data_dir))
        .await
        .context("Dataset loading task panicked")?
        .context("Failed to load MovieLens dataset")?;
    Ok(Arc::new(data))
}

/// One run per worker count, each written to its own CSV file
async fn run_calibration(
    runner: &BenchmarkRunner,
    config: &BenchmarkConfig,
) -> Result<Vec<RunResult>> {
    let mut results = Vec::with_capacity(config.worker_counts.len());

    for &num_workers in &config.worker_counts {
        let result = runner.run(num_workers).await?;
        report::print_run_summary(&result);

        let path = report::output_path(&config.output_prefix, num_workers);
        report::write_csv(&path, std::slice::from_ref(&result))?;
        println!("{} Results written to {}", "✓".green(), path.display());

        results.push(result);
    }

    info!(
        "Benchmarked {} worker counts over {} sampled users",
        results.len(),
        runner.sample_size()
    );
    Ok(results)
}
