//! Building a [`DataSet`] from the MovieLens files on disk.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::path::Path;
use std::time::Instant;
use tracing::info;

pub const RATINGS_FILE: &str = "ratings.dat";
pub const TITLES_FILE: &str = "movies.dat";

impl DataSet {
    /// Load ratings and titles from a MovieLens directory
    ///
    /// Steps:
    /// 1. Parse movies.dat and ratings.dat in parallel
    /// 2. Build the rating table and the title lookup
    /// 3. Reject a dataset without users
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading rating dataset from {}", data_dir.display());
        let start = Instant::now();

        let ratings_path = data_dir.join(RATINGS_FILE);
        let titles_path = data_dir.join(TITLES_FILE);

        // Titles are small, ratings are the bulk of the work; run both at once
        let (titles, ratings) = rayon::join(
            || parser::parse_titles(&titles_path),
            || parser::parse_ratings(&ratings_path),
        );
        let titles = titles?;
        let ratings = ratings?;

        let mut item_titles = ItemTitles::new();
        for (item_id, title) in titles.records {
            item_titles.insert(item_id, title);
        }

        let rating_count = ratings.records.len();
        let table: RatingTable = ratings.records.into_iter().collect();

        if table.is_empty() {
            return Err(DataLoadError::EmptyDataset {
                path: ratings_path.display().to_string(),
            });
        }

        let stats = LoadStats {
            skipped_rating_lines: ratings.skipped,
            skipped_title_lines: titles.skipped,
            load_time: start.elapsed(),
        };

        info!(
            "Loaded {} users, {} ratings, {} titles in {:.2?}",
            table.len(),
            rating_count,
            item_titles.len(),
            stats.load_time
        );

        Ok(DataSet {
            ratings: table,
            titles: item_titles,
            stats,
        })
    }
}
