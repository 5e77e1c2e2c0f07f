//! # Data Loader Crate
//!
//! Loads a MovieLens style rating dump into the in-memory tables consumed by
//! the similarity pipeline.
//!
//! ## Main Components
//!
//! - **types**: RatingTable, ItemTitles, DataSet
//! - **parser**: Parse .dat files, skipping malformed lines
//! - **dataset**: Build a DataSet from a directory
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataSet;
//! use std::path::Path;
//!
//! let data = DataSet::load_from_files(Path::new("ml-10M100K"))?;
//! let ratings = data.ratings.get_user_ratings("1").unwrap();
//!
//! println!("User 1 rated {} movies", ratings.len());
//! ```

pub mod dataset;
pub mod error;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{DataSet, ItemId, ItemTitles, LoadStats, Rating, RatingTable, UserId, UserRatings};
