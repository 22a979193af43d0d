//! Layered configuration loading

use flockfill::config::ConfigLoader;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_env_overrides_project_file() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("flockfill.toml"),
        "[sampling]\nseed = 1\n\n[project]\nroster = \"students.csv\"\n",
    )
    .unwrap();

    std::env::set_var("FLOCKFILL_SAMPLING__SEED", "99");
    let loaded = ConfigLoader::load(temp.path());
    std::env::remove_var("FLOCKFILL_SAMPLING__SEED");

    let config = loaded.unwrap();
    assert_eq!(config.sampling.seed, Some(99));
    assert_eq!(config.project.roster, PathBuf::from("students.csv"));
}

#[test]
fn test_missing_explicit_file_is_error() {
    let temp = TempDir::new().unwrap();
    assert!(ConfigLoader::load_from_file(&temp.path().join("absent.toml")).is_err());
}
