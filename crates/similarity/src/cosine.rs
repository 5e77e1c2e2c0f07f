//! Cosine similarity between sparse rating vectors.

use data_loader::UserRatings;

/// Cosine similarity of two sparse rating vectors.
///
/// The dot product only runs over items rated by both users (an absent item
/// is unrated, not rated zero), while each norm covers all of that user's
/// ratings. Either vector having zero norm yields 0, as does a non-finite
/// ratio. Rounding error that would push identical vectors above 1.0 is clamped.
pub fn cosine_similarity(ratings_a: &UserRatings, ratings_b: &UserRatings) -> f64 {
    let mut dot_product = 0.0;
    let mut norm_a_sq = 0.0;

    for (item_id, rating_a) in ratings_a {
        if let Some(rating_b) = ratings_b.get(item_id) {
            dot_product += rating_a * rating_b;
        }
        norm_a_sq += rating_a * rating_a;
    }

    let norm_b_sq: f64 = ratings_b.values().map(|r| r * r).sum();

    if norm_a_sq == 0.0 || norm_b_sq == 0.0 {
        return 0.0;
    }

    let similarity = dot_product / (norm_a_sq.sqrt() * norm_b_sq.sqrt());
    if !similarity.is_finite() {
        return 0.0;
    }
    similarity.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn vector(entries: &[(&str, f64)]) -> UserRatings {
        entries
            .iter()
            .map(|(item, rating)| (item.to_string(), *rating))
            .collect()
    }

    #[test]
    fn test_empty_vectors() {
        assert_eq!(cosine_similarity(&vector(&[]), &vector(&[])), 0.0);
        assert_eq!(cosine_similarity(&vector(&[("a", 1.0)]), &vector(&[])), 0.0);
        assert_eq!(cosine_similarity(&vector(&[]), &vector(&[("a", 1.0)])), 0.0);
    }

    #[test]
    fn test_identical_vectors() {
        let a = vector(&[("m1", 5.0), ("m2", 3.0)]);
        let sim = cosine_similarity(&a, &a.clone());
        assert!((sim - 1.0).abs() < 1e-12);
        assert!(sim <= 1.0);
    }

    #[test]
    fn test_disjoint_items() {
        let a = vector(&[("m1", 5.0)]);
        let b = vector(&[("m2", 5.0)]);
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_all_zero_ratings() {
        let a = vector(&[("m1", 0.0), ("m2", 0.0)]);
        let b = vector(&[("m1", 4.0)]);
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_norms_cover_unshared_items() {
        // dot = 3*4 = 12, |a| = 5, |b| = 4 -> 0.6
        let a = vector(&[("x", 3.0), ("y", 4.0)]);
        let b = vector(&[("x", 4.0)]);
        assert!((cosine_similarity(&a, &b) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_ratings_score_zero() {
        let nan = vector(&[("m1", f64::NAN)]);
        let inf = vector(&[("m1", f64::INFINITY)]);
        let b = vector(&[("m2", 5.0)]);
        let c = vector(&[("m1", 5.0)]);

        assert_eq!(cosine_similarity(&nan, &b), 0.0);
        assert_eq!(cosine_similarity(&b, &nan), 0.0);
        assert_eq!(cosine_similarity(&nan, &c), 0.0);
        assert_eq!(cosine_similarity(&inf, &c), 0.0);
    }

    fn ratings_strategy() -> impl Strategy<Value = UserRatings> {
        prop::collection::hash_map("[a-f]", 0.5f64..=5.0, 0..6)
    }

    proptest! {
        #[test]
        fn prop_score_in_unit_interval(a in ratings_strategy(), b in ratings_strategy()) {
            let sim = cosine_similarity(&a, &b);
            prop_assert!((0.0..=1.0).contains(&sim));
        }

        #[test]
        fn prop_symmetric(a in ratings_strategy(), b in ratings_strategy()) {
            let ab = cosine_similarity(&a, &b);
            let ba = cosine_similarity(&b, &a);
            prop_assert!((ab - ba).abs() < 1e-12);
        }
    }
}
