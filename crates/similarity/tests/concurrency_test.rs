//! Properties of the pipeline that must hold for any worker count.

use data_loader::{Rating, RatingTable, UserId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use similarity::{SimilarityPipeline, cosine_similarity, pair_count};

/// Sparse random table: 60 users over 40 items, some users sharing nothing
fn random_table(seed: u64) -> RatingTable {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut ratings = Vec::new();

    for user in 0..60 {
        let rated = rng.random_range(1..=8);
        for _ in 0..rated {
            let item = rng.random_range(0..40);
            let value = rng.random_range(1..=10) as f64 / 2.0;
            ratings.push(Rating::new(format!("user{}", user), format!("item{}", item), value));
        }
    }

    ratings.into_iter().collect()
}

fn sample(table: &RatingTable) -> Vec<UserId> {
    table.user_ids().to_vec()
}

#[test]
fn test_accepted_edges_independent_of_worker_count() {
    let table = random_table(7);
    let users = sample(&table);
    let pipeline = SimilarityPipeline::new();

    let baseline = pipeline.run(&table, &users, 1).unwrap();
    let expected = baseline.index.pair_scores();
    assert!(!expected.is_empty());

    for workers in 2..=8 {
        let run = pipeline.run(&table, &users, workers).unwrap();
        assert_eq!(run.jobs_processed, pair_count(users.len()));
        assert_eq!(run.pairs_accepted, baseline.pairs_accepted);
        assert_eq!(run.index.pair_scores(), expected, "workers = {}", workers);
    }
}

#[test]
fn test_every_edge_has_its_mirror() {
    let table = random_table(11);
    let users = sample(&table);

    let run = SimilarityPipeline::new()
        .with_queue_capacity(8)
        .run(&table, &users, 6)
        .unwrap();

    assert_eq!(run.index.edge_count(), 2 * run.pairs_accepted);
    for (user, edges) in run.index.iter() {
        for edge in edges {
            assert!(edge.score > 0.0 && edge.score <= 1.0);
            let mirror = run
                .index
                .edges_for(&edge.neighbor)
                .iter()
                .find(|back| &back.neighbor == user)
                .expect("missing mirror edge");
            assert_eq!(mirror.score, edge.score);
        }
    }
}

#[test]
fn test_scores_match_direct_computation() {
    let table = random_table(3);
    let users = sample(&table);

    let run = SimilarityPipeline::new().run(&table, &users, 4).unwrap();

    for ((a, b), score) in run.index.pair_scores() {
        let ratings_a = table.get_user_ratings(&a).unwrap();
        let ratings_b = table.get_user_ratings(&b).unwrap();
        let direct = cosine_similarity(ratings_a, ratings_b);
        assert!((direct - score).abs() < 1e-12);
    }
}

#[test]
fn test_sub_sample_only_scores_sampled_users() {
    let table = random_table(5);
    let users: Vec<UserId> = sample(&table).into_iter().take(10).collect();

    let run = SimilarityPipeline::new().run(&table, &users, 3).unwrap();

    assert_eq!(run.jobs_processed, 45);
    for (user, edges) in run.index.iter() {
        assert!(users.contains(user));
        assert!(edges.iter().all(|e| users.contains(&e.neighbor)));
    }
}
