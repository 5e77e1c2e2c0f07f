//! Core domain types for the rating dataset.
//!
//! Identifiers are kept as opaque strings: the similarity core never does
//! arithmetic on them, and keeping the raw text avoids a lossy round trip
//! through integer parsing for datasets that are not purely numeric.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::time::Duration;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user
pub type UserId = String;

/// Unique identifier for an item (a movie in MovieLens)
pub type ItemId = String;

/// Sparse rating vector of one user: only rated items are present.
pub type UserRatings = HashMap<ItemId, f64>;

// =============================================================================
// Rating
// =============================================================================

/// A single rating from a user for an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub rating: f64,
}

impl Rating {
    pub fn new(user_id: impl Into<UserId>, item_id: impl Into<ItemId>, rating: f64) -> Self {
        Self {
            user_id: user_id.into(),
            item_id: item_id.into(),
            rating,
        }
    }
}

// =============================================================================
// RatingTable
// =============================================================================

/// Mapping from user to that user's sparse rating vector.
///
/// A user only exists in the table once a rating has been inserted for them,
/// so every entry is non-empty. Users are remembered in first-insertion order,
/// which makes [`RatingTable::user_ids`] deterministic for a given input file.
#[derive(Debug, Clone, Default)]
pub struct RatingTable {
    ratings: HashMap<UserId, UserRatings>,
    user_order: Vec<UserId>,
}

impl RatingTable {
    /// Creates a new, empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rating. A repeated (user, item) pair overwrites the earlier value.
    pub fn insert_rating(&mut self, rating: Rating) {
        let Rating {
            user_id,
            item_id,
            rating,
        } = rating;

        match self.ratings.entry(user_id) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().insert(item_id, rating);
            }
            Entry::Vacant(entry) => {
                self.user_order.push(entry.key().clone());
                entry.insert(UserRatings::from([(item_id, rating)]));
            }
        }
    }

    /// Get the rating vector of a user, `None` if the user never rated anything
    pub fn get_user_ratings(&self, user_id: &str) -> Option<&UserRatings> {
        self.ratings.get(user_id)
    }

    pub fn contains_user(&self, user_id: &str) -> bool {
        self.ratings.contains_key(user_id)
    }

    /// All users, in the order they were first seen
    pub fn user_ids(&self) -> &[UserId] {
        &self.user_order
    }

    /// Number of users
    pub fn len(&self) -> usize {
        self.user_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.user_order.is_empty()
    }

    /// Total number of (user, item) ratings stored
    pub fn rating_count(&self) -> usize {
        self.ratings.values().map(|r| r.len()).sum()
    }
}

impl FromIterator<Rating> for RatingTable {
    fn from_iter<T: IntoIterator<Item = Rating>>(iter: T) -> Self {
        let mut table = RatingTable::new();
        for rating in iter {
            table.insert_rating(rating);
        }
        table
    }
}

// =============================================================================
// Item titles
// =============================================================================

/// Human readable item titles, used only by the reporting layer.
#[derive(Debug, Clone, Default)]
pub struct ItemTitles {
    titles: HashMap<ItemId, String>,
}

impl ItemTitles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item_id: impl Into<ItemId>, title: impl Into<String>) {
        self.titles.insert(item_id.into(), title.into());
    }

    pub fn get(&self, item_id: &str) -> Option<&str> {
        self.titles.get(item_id).map(String::as_str)
    }

    /// Title of an item, or the item id itself when no title is known
    pub fn title_or_id<'a>(&'a self, item_id: &'a str) -> &'a str {
        self.get(item_id).unwrap_or(item_id)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

// =============================================================================
// DataSet
// =============================================================================

/// Counters collected while loading, for the summary printed by the CLI
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadStats {
    pub skipped_rating_lines: usize,
    pub skipped_title_lines: usize,
    pub load_time: Duration,
}

/// Everything the similarity core and the reporting layer need from disk.
#[derive(Debug)]
pub struct DataSet {
    pub ratings: RatingTable,
    pub titles: ItemTitles,
    pub stats: LoadStats,
}
