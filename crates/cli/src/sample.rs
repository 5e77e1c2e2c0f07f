//! Choosing which users take part in a run, and whom to recommend for.

use data_loader::{RatingTable, UserId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Pick the user sample.
///
/// `size == 0` or a size larger than the dataset selects every user in load
/// order. Otherwise all ids are shuffled with a seeded RNG and the first
/// `size` are kept, so the same seed always yields the same sample.
pub fn select_sample(user_ids: &[UserId], size: usize, seed: u64) -> Vec<UserId> {
    if size == 0 || size > user_ids.len() {
        return user_ids.to_vec();
    }

    let mut shuffled = user_ids.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);
    shuffled.truncate(size);
    shuffled
}

/// The sampled user with the most ratings; ties keep the earliest in the sample.
pub fn select_target(ratings: &RatingTable, sample: &[UserId]) -> Option<(UserId, usize)> {
    let mut best: Option<(&UserId, usize)> = None;
    for user_id in sample {
        let count = ratings.get_user_ratings(user_id).map_or(0, |r| r.len());
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((user_id, count));
        }
    }
    best.map(|(user_id, count)| (user_id.clone(), count))
}
