//! Property-based tests for mutex fairness

use flockfill::fetcher::{FlockSampler, MutexKey};
use proptest::prelude::*;
use tempfile::TempDir;

fn sampler_with_pool(size: usize, seed: u64) -> (TempDir, FlockSampler) {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("overall");
    std::fs::create_dir_all(&dir).unwrap();
    let body: String = (0..size).map(|i| format!("phrase {}\n", i)).collect();
    std::fs::write(dir.join("a.txt"), body).unwrap();
    let sampler = FlockSampler::with_seed(temp.path(), seed);
    (temp, sampler)
}

/// After every draw, use counts within a group differ by at most one.
#[test]
fn test_spread_never_exceeds_one() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(1usize..8, 0usize..40, any::<u64>()),
            |(size, draws, seed)| {
                let (_temp, mut sampler) = sampler_with_pool(size, seed);
                let key = MutexKey::new("g", "overall", "a");
                for _ in 0..draws {
                    sampler.sample("overall", "a", Some("g")).unwrap();
                    let counter = sampler.counter(&key).unwrap();
                    prop_assert!(counter.spread() <= 1);
                }
                Ok(())
            },
        )
        .unwrap();
}

/// After n draws from a pool of k, each phrase is used floor(n/k) or ceil(n/k) times.
#[test]
fn test_counts_are_floor_or_ceil() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(1usize..8, 1usize..40, any::<u64>()),
            |(size, draws, seed)| {
                let (_temp, mut sampler) = sampler_with_pool(size, seed);
                for _ in 0..draws {
                    sampler.sample("overall", "a", Some("g")).unwrap();
                }
                let counter = sampler
                    .counter(&MutexKey::new("g", "overall", "a"))
                    .unwrap();
                let floor = (draws / size) as u64;
                let ceil = draws.div_ceil(size) as u64;
                for i in 0..size {
                    let count = counter.count(&format!("phrase {}", i));
                    prop_assert!(count == floor || count == ceil, "count {} for {}/{}", count, draws, size);
                }
                prop_assert_eq!(counter.iter().map(|(_, n)| n).sum::<u64>(), draws as u64);
                Ok(())
            },
        )
        .unwrap();
}
