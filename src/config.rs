//! Configuration System
//!
//! Layered configuration for project layout, sampling, and logging. Sources,
//! lowest to highest precedence: built-in defaults, the global config file,
//! the project's `flockfill.toml`, then `FLOCKFILL_*` environment variables.

use crate::fetcher::InfoPaths;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlockfillConfig {
    /// Where the pieces of a project live
    #[serde(default)]
    pub project: ProjectLayout,

    /// Sampling and composition behaviour
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Paths of a project's inputs and outputs, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLayout {
    #[serde(default = "default_flock_dir")]
    pub flock_dir: PathBuf,

    #[serde(default = "default_program_info_dir")]
    pub program_info_dir: PathBuf,

    #[serde(default = "default_roster")]
    pub roster: PathBuf,

    #[serde(default = "default_genre_dir")]
    pub genre_dir: PathBuf,

    #[serde(default = "default_genre_file")]
    pub genre_file: PathBuf,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Metadata file names inside `program_info_dir`
    #[serde(default)]
    pub info_files: InfoPaths,
}

fn default_flock_dir() -> PathBuf {
    PathBuf::from("flock")
}

fn default_program_info_dir() -> PathBuf {
    PathBuf::from("program_info")
}

fn default_roster() -> PathBuf {
    PathBuf::from("eval.csv")
}

fn default_genre_dir() -> PathBuf {
    PathBuf::from("genre")
}

fn default_genre_file() -> PathBuf {
    PathBuf::from("genre.txt")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            flock_dir: default_flock_dir(),
            program_info_dir: default_program_info_dir(),
            roster: default_roster(),
            genre_dir: default_genre_dir(),
            genre_file: default_genre_file(),
            output_dir: default_output_dir(),
            info_files: InfoPaths::default(),
        }
    }
}

/// Sampling configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Seed for every random draw of a batch; entropy when unset
    #[serde(default)]
    pub seed: Option<u64>,

    /// Use project info files as raw text instead of parsing them
    #[serde(default)]
    pub verbatim_info: bool,

    /// Reject letters that still contain unbound slots
    #[serde(default)]
    pub strict: bool,
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Project(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Project(msg) => write!(f, "Project: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ProjectLayout {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let named = [
            ("flock_dir", &self.flock_dir),
            ("program_info_dir", &self.program_info_dir),
            ("roster", &self.roster),
            ("genre_file", &self.genre_file),
            ("output_dir", &self.output_dir),
        ];
        for (name, path) in named {
            if path.as_os_str().is_empty() {
                errors.push(format!("{} cannot be empty", name));
            }
        }
        errors
    }
}

impl FlockfillConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors: Vec<ValidationError> = self
            .project
            .validate()
            .into_iter()
            .map(ValidationError::Project)
            .collect();

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            errors.push(ValidationError::Logging(format!(
                "invalid format '{}' (must be 'text' or 'json')",
                self.logging.format
            )));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
