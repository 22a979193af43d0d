//! Project: one uploaded letter project and the components of a batch.
//!
//! A project directory holds the flock phrase pools, the program info files,
//! the roster and the genre skeleton (layout per [`ProjectLayout`]). Each
//! batch builds fresh components so caches and fairness counters never leak
//! between batches.

use crate::compose::{compose_letters, write_letters, Letter};
use crate::config::{FlockfillConfig, ProjectLayout};
use crate::content::SlotMapping;
use crate::error::FillError;
use crate::fetcher::{Fetcher, FlockSampler, InfoMode, ProjectInfoCache, RosterFetcher};
use crate::genre::GenreLoader;
use crate::roster::{EvalColumn, Roster, RosterLoader};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::info;

/// Offsets applied to the configured seed so components draw independent streams.
const SAMPLER_SEED_OFFSET: u64 = 0;
const INFO_SEED_OFFSET: u64 = 1;

pub struct Project {
    root: PathBuf,
    config: FlockfillConfig,
}

/// Result of checking a project's inputs without composing letters.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub recipients: usize,
    pub additional_columns: Vec<String>,
    /// Recipients per (column, grade).
    pub grade_counts: BTreeMap<String, BTreeMap<String, usize>>,
    /// Pool files referenced by the roster, with phrase counts.
    pub pools: BTreeMap<String, usize>,
    /// Referenced pool files that are missing or empty.
    pub missing_pools: Vec<PathBuf>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.missing_pools.is_empty()
    }
}

impl Project {
    pub fn new(root: impl Into<PathBuf>, config: FlockfillConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &FlockfillConfig {
        &self.config
    }

    fn layout(&self) -> &ProjectLayout {
        &self.config.project
    }

    pub fn flock_dir(&self) -> PathBuf {
        self.root.join(&self.layout().flock_dir)
    }

    pub fn roster_path(&self) -> PathBuf {
        self.root.join(&self.layout().roster)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.layout().output_dir)
    }

    pub fn flock_sampler(&self) -> FlockSampler {
        match self.config.sampling.seed {
            Some(seed) => FlockSampler::with_seed(
                self.flock_dir(),
                seed.wrapping_add(SAMPLER_SEED_OFFSET),
            ),
            None => FlockSampler::new(self.flock_dir()),
        }
    }

    pub fn program_info(&self) -> ProjectInfoCache {
        let root = self.root.join(&self.layout().program_info_dir);
        let cache = match self.config.sampling.seed {
            Some(seed) => ProjectInfoCache::with_seed(root, seed.wrapping_add(INFO_SEED_OFFSET)),
            None => ProjectInfoCache::new(root),
        };
        cache.with_paths(self.layout().info_files.clone())
    }

    pub fn roster_fetcher(&self) -> RosterFetcher {
        RosterFetcher::new(self.roster_path(), self.flock_sampler())
    }

    pub fn genre_loader(&self) -> GenreLoader {
        let layout = self.layout();
        GenreLoader::new(self.root.join(&layout.genre_dir).join(&layout.genre_file))
    }

    pub fn info_mode(&self) -> InfoMode {
        if self.config.sampling.verbatim_info {
            InfoMode::Verbatim
        } else {
            InfoMode::Parsed
        }
    }

    pub fn load_roster(&self) -> Result<Roster, FillError> {
        RosterLoader::new(self.roster_path()).load_and_validate()
    }

    /// Bind every roster row with one shared sampler.
    pub fn bind(&self) -> Result<Vec<SlotMapping>, FillError> {
        self.roster_fetcher().fetch(())
    }

    /// Compose one letter per recipient.
    pub fn compose(&self) -> Result<Vec<Letter>, FillError> {
        let genre = self.genre_loader().load_genre()?;
        let rows = self.bind()?;
        let mut info = self.program_info();
        let letters = compose_letters(
            &genre,
            &mut info,
            self.info_mode(),
            &rows,
            self.config.sampling.strict,
        )?;
        info!(letters = letters.len(), "Composed letters");
        Ok(letters)
    }

    /// Compose and write letters to `output` (or the configured output dir).
    pub fn render(&self, output: Option<&Path>) -> Result<(PathBuf, usize), FillError> {
        let letters = self.compose()?;
        let dir = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.output_dir());
        write_letters(&dir, &letters)?;
        Ok((dir, letters.len()))
    }

    /// Roster names plus whitespace-separated extra words, deduplicated.
    pub fn accepted_spellings(&self, extra_words: &str) -> Result<Vec<String>, FillError> {
        let mut words: BTreeSet<String> = self.load_roster()?.names();
        words.extend(extra_words.split_whitespace().map(String::from));
        Ok(words.into_iter().collect())
    }

    /// Validate the roster and every pool file it references.
    pub fn check(&self) -> Result<CheckReport, FillError> {
        let roster = self.load_roster()?;
        let mut sampler = self.flock_sampler();

        let mut grade_counts: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
        let mut referenced = BTreeSet::new();
        for row in &roster.rows {
            for column in EvalColumn::BINDING_ORDER {
                let grade = row.grade(column);
                *grade_counts
                    .entry(column.to_string())
                    .or_default()
                    .entry(grade.to_string())
                    .or_default() += 1;
                referenced.insert((column.as_str(), grade.class_label()));
            }
        }

        let mut pools = BTreeMap::new();
        let mut missing_pools = Vec::new();
        for (category, class_label) in referenced {
            let path = sampler.pool_path(category, class_label);
            match sampler.pool(category, class_label) {
                Ok(pool) if !pool.is_empty() => {
                    pools.insert(format!("{}/{}", category, class_label), pool.len());
                }
                Ok(_) | Err(FillError::NotFound { .. }) => missing_pools.push(path),
                Err(e) => return Err(e),
            }
        }

        Ok(CheckReport {
            recipients: roster.len(),
            additional_columns: roster.additional_columns.clone(),
            grade_counts,
            pools,
            missing_pools,
        })
    }
}
