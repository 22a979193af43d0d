//! Config loader facade: assembles sources in precedence order.

use super::merge::merge_policy;
use super::sources::{global_file, project_file};
use super::FlockfillConfig;
use config::{Environment, File};
use std::path::Path;

/// Environment variable prefix; nested keys use `__` (`FLOCKFILL_SAMPLING__SEED`).
pub const ENV_PREFIX: &str = "FLOCKFILL";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for the project at `project_root`.
    pub fn load(project_root: &Path) -> Result<FlockfillConfig, config::ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = project_file::add_to_builder(builder, project_root)?;
        builder
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from an explicit file, skipping the global and
    /// project files. Environment overrides still apply.
    pub fn load_from_file(path: &Path) -> Result<FlockfillConfig, config::ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
