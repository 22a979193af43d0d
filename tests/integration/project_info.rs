//! Project info caching and parsing

use flockfill::error::FillError;
use flockfill::fetcher::{Fetcher, InfoMode, InfoPaths, ProjectInfoCache};
use std::collections::BTreeSet;
use std::fs;

use crate::integration::test_utils::project_fixture;

#[test]
fn test_parsed_info_slots() {
    let temp = project_fixture();
    let mut cache = ProjectInfoCache::with_seed(temp.path().join("program_info"), 0);
    let slots = cache.fetch(InfoMode::Parsed).unwrap();

    assert_eq!(slots.len(), 4);
    assert_eq!(slots["program_name"].render(), "Robotics Camp");
    assert_eq!(
        slots["program_description"].render(),
        "A summer course. It covers robotics."
    );
    assert_eq!(
        slots["instructor_signature"].render(),
        "Dr. Kim\nLead Instructor"
    );
    assert_eq!(slots["date"].render(), "June 1, 2026");
}

#[test]
fn test_verbatim_info_keeps_raw_text() {
    let temp = project_fixture();
    let mut cache = ProjectInfoCache::with_seed(temp.path().join("program_info"), 0);
    let slots = cache.fetch(InfoMode::Verbatim).unwrap();
    assert_eq!(
        slots["program_description"].render(),
        "A summer course.\nIt covers robotics."
    );
}

#[test]
fn test_info_is_cached_until_cleared() {
    let temp = project_fixture();
    let info = temp.path().join("program_info");
    let mut cache = ProjectInfoCache::with_seed(&info, 0);
    cache.fetch(InfoMode::Parsed).unwrap();
    assert!(cache.is_cached());

    fs::write(info.join("program_name.txt"), "Art Studio\n").unwrap();
    let slots = cache.fetch(InfoMode::Parsed).unwrap();
    assert_eq!(slots["program_name"].render(), "Robotics Camp");

    cache.clear_cache();
    assert!(!cache.is_cached());
    let slots = cache.fetch(InfoMode::Parsed).unwrap();
    assert_eq!(slots["program_name"].render(), "Art Studio");
}

#[test]
fn test_multiple_dates_vary_across_fetches() {
    let temp = project_fixture();
    let info = temp.path().join("program_info");
    fs::write(info.join("date.txt"), "June 1\n\nJune 2\nJune 3\n").unwrap();

    let mut cache = ProjectInfoCache::with_seed(&info, 5);
    let seen: BTreeSet<String> = (0..60)
        .map(|_| cache.fetch(InfoMode::Parsed).unwrap()["date"].render())
        .collect();
    let expected: BTreeSet<String> = ["June 1", "June 2", "June 3"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(seen, expected);
}

#[test]
fn test_blank_date_file_is_empty_choices() {
    let temp = project_fixture();
    let info = temp.path().join("program_info");
    fs::write(info.join("date.txt"), "\n  \n").unwrap();
    let err = ProjectInfoCache::new(&info)
        .fetch(InfoMode::Parsed)
        .unwrap_err();
    assert!(matches!(err, FillError::EmptyChoices { .. }));
}

#[test]
fn test_renamed_info_files() {
    let temp = project_fixture();
    let info = temp.path().join("program_info");
    fs::rename(info.join("date.txt"), info.join("when.txt")).unwrap();

    let err = ProjectInfoCache::new(&info)
        .fetch(InfoMode::Parsed)
        .unwrap_err();
    assert!(matches!(err, FillError::NotFound { ref path } if path.ends_with("date.txt")));

    let paths = InfoPaths {
        date: "when.txt".into(),
        ..InfoPaths::default()
    };
    let slots = ProjectInfoCache::new(&info)
        .with_paths(paths)
        .fetch(InfoMode::Parsed)
        .unwrap();
    assert_eq!(slots["date"].render(), "June 1, 2026");
}
