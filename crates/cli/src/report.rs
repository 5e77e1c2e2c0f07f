//! CSV export and console tables for benchmark results.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use csv::Writer;
use serde::Serialize;

use crate::runner::RunResult;

const NOT_AVAILABLE: &str = "N/A";

/// One CSV row; seconds are pre-formatted to six decimals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct RunRecord {
    sample_size: usize,
    num_workers: usize,
    load_seconds: String,
    calc_seconds: String,
    recommend_seconds: String,
    total_seconds: String,
    target_user_id: String,
    recommendations: String,
}

impl From<&RunResult> for RunRecord {
    fn from(result: &RunResult) -> Self {
        let recommendations = if result.recommendations.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            result.recommendations.join("|")
        };

        Self {
            sample_size: result.sample_size,
            num_workers: result.num_workers,
            load_seconds: seconds(result.load_time),
            calc_seconds: seconds(result.calc_time),
            recommend_seconds: seconds(result.recommend_time),
            total_seconds: seconds(result.total_time()),
            target_user_id: result
                .target_user
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            recommendations,
        }
    }
}

fn seconds(duration: Duration) -> String {
    format!("{:.6}", duration.as_secs_f64())
}

/// `<prefix>_<workers>w.csv`
pub fn output_path(prefix: &str, num_workers: usize) -> PathBuf {
    PathBuf::from(format!("{}_{}w.csv", prefix, num_workers))
}

/// Write a header row plus one row per result.
pub fn write_csv_to<W: io::Write>(writer: W, results: &[RunResult]) -> Result<()> {
    let mut writer = Writer::from_writer(writer);
    for result in results {
        writer.serialize(RunRecord::from(result))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_csv(path: &Path, results: &[RunResult]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv_to(file, results).with_context(|| format!("Failed to write {}", path.display()))
}

/// Phase breakdown of a single run
pub fn print_run_summary(result: &RunResult) {
    println!(
        "\n{}",
        format!("Run with {} workers", result.num_workers).bold().blue()
    );
    println!("  {:<12} {:>12}", "Phase", "Seconds");
    println!("  {:<12} {:>12}", "Load", seconds(result.load_time));
    println!("  {:<12} {:>12}", "Calculation", seconds(result.calc_time));
    println!("  {:<12} {:>12}", "Recommend", seconds(result.recommend_time));
    println!(
        "  {:<12} {:>12}",
        "Total".bold(),
        seconds(result.total_time()).bold()
    );
    println!(
        "  {} {} pair jobs, {} similar pairs",
        "•".cyan(),
        result.jobs_processed,
        result.pairs_accepted
    );

    match &result.target_user {
        Some(user) => println!("  {} Recommendations for user {}:", "•".cyan(), user),
        None => println!("  {} No target user", "•".cyan()),
    }
    if result.recommendations.is_empty() {
        println!("    {}", NOT_AVAILABLE.yellow());
    }
    for (rank, title) in result.recommendations.iter().enumerate() {
        println!("    {}. {}", (rank + 1).to_string().green(), title);
    }
}

/// Side-by-side comparison of every run
pub fn print_final_summary(results: &[RunResult]) {
    println!("\n{}", "Benchmark summary".bold().blue());
    println!(
        "{:>8} {:>12} {:>12} {:>12} {:>12}",
        "Workers", "Load", "Calc", "Recommend", "Total"
    );

    let fastest = results.iter().map(|r| r.calc_time).min();
    for result in results {
        let calc = format!("{:>12}", seconds(result.calc_time));
        let calc = if Some(result.calc_time) == fastest {
            calc.green().to_string()
        } else {
            calc
        };
        println!(
            "{:>8} {:>12} {} {:>12} {:>12}",
            result.num_workers,
            seconds(result.load_time),
            calc,
            seconds(result.recommend_time),
            seconds(result.total_time())
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(recommendations: Vec<&str>) -> RunResult {
        RunResult {
            sample_size: 100,
            num_workers: 4,
            load_time: Duration::from_millis(1500),
            calc_time: Duration::from_micros(2_250_001),
            recommend_time: Duration::from_micros(42),
            target_user: Some("59269".to_string()),
            recommendations: recommendations.into_iter().map(String::from).collect(),
            jobs_processed: 4950,
            pairs_accepted: 4000,
        }
    }

    fn render(results: &[RunResult]) -> String {
        let mut buf = Vec::new();
        write_csv_to(&mut buf, results).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_csv_header_and_row() {
        let csv = render(&[result(vec!["Heat (1995)", "Fargo (1996)"])]);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "SampleSize,NumWorkers,LoadSeconds,CalcSeconds,RecommendSeconds,TotalSeconds,TargetUserId,Recommendations"
        );
        assert_eq!(
            lines[1],
            "100,4,1.500000,2.250001,0.000042,3.750043,59269,Heat (1995)|Fargo (1996)"
        );
    }

    #[test]
    fn test_empty_recommendations_are_na() {
        let mut no_target = result(vec![]);
        no_target.target_user = None;

        let csv = render(&[no_target]);
        assert!(csv.lines().nth(1).unwrap().ends_with(",N/A,N/A"));
    }

    #[test]
    fn test_titles_with_commas_are_quoted() {
        let csv = render(&[result(vec!["Good, the Bad and the Ugly, The (1966)"])]);
        assert!(csv.contains("\"Good, the Bad and the Ugly, The (1966)\""));
    }

    #[test]
    fn test_output_path() {
        assert_eq!(output_path("benchmark", 12), PathBuf::from("benchmark_12w.csv"));
        assert_eq!(output_path("out/run", 4), PathBuf::from("out/run_4w.csv"));
    }
}
