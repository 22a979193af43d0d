//! CLI route: single route table and run context. Dispatches to the project and presentation.

use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_bindings_json, format_check_report, format_names, format_pool_inventory,
};
use crate::config::{ConfigLoader, FlockfillConfig};
use crate::error::FillError;
use crate::project::Project;
use std::path::PathBuf;
use tracing::info;

/// Runtime context for CLI execution: project root and effective config.
/// Built from the project path and optional config path using ConfigLoader only.
pub struct RunContext {
    project_root: PathBuf,
    config: FlockfillConfig,
}

impl RunContext {
    /// Create run context from project root and optional config path.
    pub fn new(project_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, FillError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&project_root)?
        };

        config.validate().map_err(|errors| {
            let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
            FillError::ConfigError(joined.join("; "))
        })?;

        Ok(Self {
            project_root,
            config,
        })
    }

    /// Override the sampling seed (CLI `--seed`).
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        if seed.is_some() {
            self.config.sampling.seed = seed;
        }
        self
    }

    pub fn config(&self) -> &FlockfillConfig {
        &self.config
    }

    fn project(&self) -> Project {
        Project::new(self.project_root.clone(), self.config.clone())
    }

    /// Execute a command and return the text to print.
    pub fn execute(&self, command: &Commands) -> Result<String, FillError> {
        match command {
            Commands::Check { format } => {
                let report = self.project().check()?;
                info!(
                    recipients = report.recipients,
                    missing = report.missing_pools.len(),
                    "Checked project"
                );
                format_check_report(&report, format)
            }
            Commands::Bind => {
                let rows = self.project().bind()?;
                format_bindings_json(&rows)
            }
            Commands::Render {
                output,
                strict,
                verbatim_info,
            } => {
                let mut config = self.config.clone();
                config.sampling.strict |= *strict;
                config.sampling.verbatim_info |= *verbatim_info;
                let project = Project::new(self.project_root.clone(), config);
                let (dir, count) = project.render(output.as_deref())?;
                Ok(format!("Wrote {} letter(s) to {}", count, dir.display()))
            }
            Commands::Names { extra_words } => {
                let words = self.project().accepted_spellings(extra_words)?;
                Ok(format_names(&words))
            }
            Commands::Pools { format } => {
                let pools = self.project().flock_sampler().inventory()?;
                format_pool_inventory(&pools, format)
            }
            Commands::Config => toml::to_string_pretty(&self.config)
                .map_err(|e| FillError::ConfigError(format!("Failed to serialize config: {}", e))),
        }
    }
}
