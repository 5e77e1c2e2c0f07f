use data_loader::DataSet;
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("ml-10M100K");

    println!("Loading MovieLens 10M dataset...\n");

    let start = Instant::now();
    let data = DataSet::load_from_files(data_dir).expect("Failed to load dataset");
    let elapsed = start.elapsed();

    let ratings = data.ratings.rating_count();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Users: {}", data.ratings.len());
    println!("Titles: {}", data.titles.len());
    println!("Ratings: {}", ratings);
    println!("Skipped lines: {}", data.stats.skipped_rating_lines);
    println!(
        "\nPerformance: {:.0} ratings/second",
        ratings as f64 / elapsed.as_secs_f64()
    );
}
