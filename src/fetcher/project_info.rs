//! Project metadata shared by every letter of a batch.

use crate::content::{BlockKind, Fillable, SlotMapping};
use crate::error::{read_text, FillError};
use crate::fetcher::Fetcher;
use crate::parser::{nonempty_segments, Parser, TemplateParser};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// The four fixed project metadata slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InfoKey {
    ProgramDescription,
    InstructorSignature,
    Date,
    ProgramName,
}

impl InfoKey {
    pub fn as_str(self) -> &'static str {
        match self {
            InfoKey::ProgramDescription => "program_description",
            InfoKey::InstructorSignature => "instructor_signature",
            InfoKey::Date => "date",
            InfoKey::ProgramName => "program_name",
        }
    }
}

/// How metadata files are turned into slot content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InfoMode {
    /// Raw text atoms; slot references are not recognized.
    Verbatim,
    /// Parsed through the template parser.
    #[default]
    Parsed,
}

/// File names of the metadata files, relative to the info root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoPaths {
    #[serde(default = "default_description")]
    pub description: PathBuf,
    #[serde(default = "default_signature")]
    pub signature: PathBuf,
    #[serde(default = "default_date")]
    pub date: PathBuf,
    #[serde(default = "default_program_name")]
    pub program_name: PathBuf,
}

fn default_description() -> PathBuf {
    PathBuf::from("program_description.txt")
}

fn default_signature() -> PathBuf {
    PathBuf::from("instructor_signature.txt")
}

fn default_date() -> PathBuf {
    PathBuf::from("date.txt")
}

fn default_program_name() -> PathBuf {
    PathBuf::from("program_name.txt")
}

impl Default for InfoPaths {
    fn default() -> Self {
        Self {
            description: default_description(),
            signature: default_signature(),
            date: default_date(),
            program_name: default_program_name(),
        }
    }
}

#[derive(Debug, Clone)]
enum CachedInfo {
    Single(Fillable),
    Choices(Vec<Fillable>),
}

/// Lazily built cache of project metadata.
///
/// The first [`Fetcher::fetch`] decides the [`InfoMode`]; later fetches reuse the
/// cache whatever mode they ask for until [`Fetcher::clear_cache`]. Multi-entry
/// values (the date) are resolved to one random entry on every fetch.
pub struct ProjectInfoCache {
    root: PathBuf,
    paths: InfoPaths,
    parser: Arc<dyn Parser>,
    rng: StdRng,
    cache: Option<BTreeMap<InfoKey, CachedInfo>>,
}

impl ProjectInfoCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_rng(root, StdRng::from_entropy())
    }

    pub fn with_seed(root: impl Into<PathBuf>, seed: u64) -> Self {
        Self::with_rng(root, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(root: impl Into<PathBuf>, rng: StdRng) -> Self {
        Self {
            root: root.into(),
            paths: InfoPaths::default(),
            parser: Arc::new(TemplateParser::new()),
            rng,
            cache: None,
        }
    }

    pub fn with_paths(mut self, paths: InfoPaths) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_parser(mut self, parser: Arc<dyn Parser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    pub fn path_for(&self, key: InfoKey) -> PathBuf {
        let relative: &Path = match key {
            InfoKey::ProgramDescription => &self.paths.description,
            InfoKey::InstructorSignature => &self.paths.signature,
            InfoKey::Date => &self.paths.date,
            InfoKey::ProgramName => &self.paths.program_name,
        };
        self.root.join(relative)
    }

    fn build(&self, mode: InfoMode) -> Result<BTreeMap<InfoKey, CachedInfo>, FillError> {
        let description = read_text(&self.path_for(InfoKey::ProgramDescription))?;
        let signature = read_text(&self.path_for(InfoKey::InstructorSignature))?;
        let date_path = self.path_for(InfoKey::Date);
        let date_text = read_text(&date_path)?;
        let program_name = read_text(&self.path_for(InfoKey::ProgramName))?;

        let dates = nonempty_segments(&date_text, "\n");
        if dates.is_empty() {
            return Err(FillError::EmptyChoices { path: date_path });
        }

        let mut cache = BTreeMap::new();
        match mode {
            InfoMode::Verbatim => {
                cache.insert(
                    InfoKey::ProgramDescription,
                    CachedInfo::Single(Fillable::atom(description.trim())),
                );
                cache.insert(
                    InfoKey::InstructorSignature,
                    CachedInfo::Single(Fillable::atom(signature.trim())),
                );
                cache.insert(
                    InfoKey::Date,
                    CachedInfo::Choices(dates.into_iter().map(Fillable::atom).collect()),
                );
                cache.insert(
                    InfoKey::ProgramName,
                    CachedInfo::Single(Fillable::atom(program_name.trim())),
                );
            }
            InfoMode::Parsed => {
                let lines = signature
                    .trim_end()
                    .split('\n')
                    .map(|line| self.parser.parse_sentence(line))
                    .collect();
                cache.insert(
                    InfoKey::ProgramDescription,
                    CachedInfo::Single(self.parser.parse_paragraph(&description)),
                );
                cache.insert(
                    InfoKey::InstructorSignature,
                    CachedInfo::Single(Fillable::block_with_separator(
                        BlockKind::Block,
                        lines,
                        "\n",
                    )),
                );
                cache.insert(
                    InfoKey::Date,
                    CachedInfo::Choices(
                        dates
                            .into_iter()
                            .map(|d| self.parser.parse_sentence(d))
                            .collect(),
                    ),
                );
                cache.insert(
                    InfoKey::ProgramName,
                    CachedInfo::Single(self.parser.parse_sentence(&program_name)),
                );
            }
        }
        debug!(root = %self.root.display(), ?mode, "Loaded project info");
        Ok(cache)
    }
}

impl Fetcher for ProjectInfoCache {
    type Request = InfoMode;
    type Output = SlotMapping;

    fn fetch(&mut self, mode: InfoMode) -> Result<SlotMapping, FillError> {
        let cache = match self.cache.take() {
            Some(cache) => cache,
            None => self.build(mode)?,
        };
        let cache = self.cache.insert(cache);

        let mut out = SlotMapping::new();
        for (key, value) in cache.iter() {
            let chosen = match value {
                CachedInfo::Single(node) => Some(node.clone()),
                CachedInfo::Choices(options) => options.choose(&mut self.rng).cloned(),
            };
            if let Some(node) = chosen {
                out.insert(key.as_str().to_string(), node);
            }
        }
        Ok(out)
    }

    fn clear_cache(&mut self) {
        self.cache = None;
    }
}
