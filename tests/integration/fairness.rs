//! Fairness of mutex-grouped sampling across a batch

use flockfill::fetcher::{FlockSampler, MutexKey};
use std::collections::BTreeMap;
use tempfile::TempDir;

use crate::integration::test_utils::write_pool;

fn tally(draws: &[String]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for d in draws {
        *counts.entry(d.as_str()).or_insert(0) += 1;
    }
    counts
}

#[test]
fn test_six_draws_use_each_phrase_twice() {
    let temp = TempDir::new().unwrap();
    write_pool(temp.path(), "overall", "a", "a\nb\nc\n");

    for seed in 0..20 {
        let mut sampler = FlockSampler::with_seed(temp.path().join("flock"), seed);
        let draws: Vec<String> = (0..6)
            .map(|_| sampler.sample("overall", "a", Some("g")).unwrap())
            .collect();
        let counts = tally(&draws);
        assert_eq!(counts.len(), 3, "seed {}", seed);
        assert!(counts.values().all(|&n| n == 2), "seed {}: {:?}", seed, counts);
    }
}

#[test]
fn test_first_three_draws_are_distinct() {
    let temp = TempDir::new().unwrap();
    write_pool(temp.path(), "overall", "a", "a\nb\nc\n");
    let mut sampler = FlockSampler::with_seed(temp.path().join("flock"), 3);

    let mut first: Vec<String> = (0..3)
        .map(|_| sampler.sample("overall", "a", Some("g")).unwrap())
        .collect();
    first.sort();
    assert_eq!(first, vec!["a", "b", "c"]);
}

#[test]
fn test_groups_are_tracked_independently() {
    let temp = TempDir::new().unwrap();
    write_pool(temp.path(), "overall", "a", "x\ny\n");
    let mut sampler = FlockSampler::with_seed(temp.path().join("flock"), 11);

    for _ in 0..4 {
        sampler.sample("overall", "a", Some("north")).unwrap();
    }
    sampler.sample("overall", "a", Some("south")).unwrap();

    let north = sampler
        .counter(&MutexKey::new("north", "overall", "a"))
        .unwrap();
    assert_eq!(north.total(), 4);
    assert_eq!(north.count("x"), 2);
    assert_eq!(north.count("y"), 2);

    let south = sampler
        .counter(&MutexKey::new("south", "overall", "a"))
        .unwrap();
    assert_eq!(south.total(), 1);
}

#[test]
fn test_blank_mutex_draws_leave_no_counter() {
    let temp = TempDir::new().unwrap();
    write_pool(temp.path(), "overall", "a", "x\ny\n");
    let mut sampler = FlockSampler::with_seed(temp.path().join("flock"), 1);

    for _ in 0..5 {
        let phrase = sampler.sample("overall", "a", None).unwrap();
        assert!(phrase == "x" || phrase == "y");
    }
    sampler.sample("overall", "a", Some("  ")).unwrap();
    assert!(sampler.counter(&MutexKey::new("", "overall", "a")).is_none());
    assert!(sampler.counter(&MutexKey::new("  ", "overall", "a")).is_none());
}

#[test]
fn test_same_seed_same_draws() {
    let temp = TempDir::new().unwrap();
    write_pool(temp.path(), "final", "b", "one\ntwo\nthree\nfour\n");
    let root = temp.path().join("flock");

    let run = |seed: u64| {
        let mut sampler = FlockSampler::with_seed(root.clone(), seed);
        (0..8)
            .map(|_| sampler.sample("final", "b", Some("g")).unwrap())
            .collect::<Vec<_>>()
    };
    assert_eq!(run(42), run(42));
}

#[test]
fn test_unmutexed_draws_are_uniform() {
    let temp = TempDir::new().unwrap();
    write_pool(temp.path(), "overall", "a", "p\nq\nr\ns\n");
    let mut sampler = FlockSampler::with_seed(temp.path().join("flock"), 2024);

    let draws: Vec<String> = (0..40_000)
        .map(|_| sampler.sample("overall", "a", None).unwrap())
        .collect();
    let counts = tally(&draws);

    assert_eq!(counts.len(), 4);
    let expected = 10_000.0;
    for (phrase, &n) in &counts {
        let deviation = (n as f64 - expected).abs() / expected;
        assert!(deviation < 0.05, "{} drawn {} times", phrase, n);
    }
}
