//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("project.flock_dir", "flock")?
        .set_default("project.program_info_dir", "program_info")?
        .set_default("project.roster", "eval.csv")?
        .set_default("project.genre_dir", "genre")?
        .set_default("project.genre_file", "genre.txt")?
        .set_default("project.output_dir", "output")?
        .set_default("sampling.verbatim_info", false)?
        .set_default("sampling.strict", false)
}
