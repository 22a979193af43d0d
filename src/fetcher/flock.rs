//! Flock sampler: fairness-constrained phrase sampling.
//!
//! Phrases live in `<root>/<category>/<class_label>.txt`, one per line. Draws
//! made under a mutex key are tracked per (mutex, category, class_label) group
//! and always prefer phrases that have been used less than the most-used ones,
//! so within a group use counts never differ by more than one.

use crate::content::{Fillable, SlotMapping};
use crate::error::{read_text, FillError};
use crate::fetcher::Fetcher;
use crate::parser::{Grain, Parser, TemplateParser};
use rand::rngs::StdRng;
use rand::seq::{IteratorRandom, SliceRandom};
use rand::SeedableRng;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Distinct candidate phrases for one (category, class_label) pair.
pub type PhrasePool = BTreeSet<String>;

/// Identifies one fairness-tracked population.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MutexKey {
    pub mutex: String,
    pub category: String,
    pub class_label: String,
}

impl MutexKey {
    pub fn new(
        mutex: impl Into<String>,
        category: impl Into<String>,
        class_label: impl Into<String>,
    ) -> Self {
        Self {
            mutex: mutex.into(),
            category: category.into(),
            class_label: class_label.into(),
        }
    }
}

/// Per-group phrase use counts. Phrases never drawn are absent (count 0).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FairnessCounter {
    counts: BTreeMap<String, u64>,
}

impl FairnessCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn count(&self, phrase: &str) -> u64 {
        self.counts.get(phrase).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn max_count(&self) -> Option<u64> {
        self.counts.values().copied().max()
    }

    pub fn min_count(&self) -> Option<u64> {
        self.counts.values().copied().min()
    }

    /// `max - min` over phrases drawn at least once.
    pub fn spread(&self) -> u64 {
        match (self.max_count(), self.min_count()) {
            (Some(max), Some(min)) => max - min,
            _ => 0,
        }
    }

    pub fn is_balanced(&self) -> bool {
        self.spread() <= 1
    }

    /// Phrases whose count equals the current maximum.
    pub fn saturated(&self) -> BTreeSet<&str> {
        let Some(max) = self.max_count() else {
            return BTreeSet::new();
        };
        self.counts
            .iter()
            .filter(|(_, &count)| count == max)
            .map(|(phrase, _)| phrase.as_str())
            .collect()
    }

    pub fn record(&mut self, phrase: &str) {
        *self.counts.entry(phrase.to_string()).or_insert(0) += 1;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }
}

/// One flock fetch: sample a phrase and wrap it as the slot `tag`.
#[derive(Debug, Clone)]
pub struct FlockRequest {
    pub tag: String,
    pub category: String,
    pub class_label: String,
    pub grain: Grain,
    pub wrap_kind: String,
    pub mutex: Option<String>,
}

impl FlockRequest {
    pub fn new(
        tag: impl Into<String>,
        category: impl Into<String>,
        class_label: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            category: category.into(),
            class_label: class_label.into(),
            grain: Grain::Paragraph,
            wrap_kind: "block".to_string(),
            mutex: None,
        }
    }

    pub fn with_grain(mut self, grain: Grain) -> Self {
        self.grain = grain;
        self
    }

    pub fn with_wrap_kind(mut self, wrap_kind: impl Into<String>) -> Self {
        self.wrap_kind = wrap_kind.into();
        self
    }

    pub fn with_mutex(mut self, mutex: Option<String>) -> Self {
        self.mutex = mutex;
        self
    }
}

/// Inventory entry for one pool file under the flock root.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PoolSummary {
    pub category: String,
    pub class_label: String,
    pub phrases: usize,
}

/// Category/class keyed phrase sampler with per-group fairness.
///
/// Not synchronized: one instance serves one batch, sequentially.
pub struct FlockSampler {
    root: PathBuf,
    parser: Arc<dyn Parser>,
    rng: StdRng,
    pools: HashMap<PathBuf, PhrasePool>,
    counters: HashMap<MutexKey, FairnessCounter>,
}

impl FlockSampler {
    /// Sampler seeded from system entropy.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_rng(root, StdRng::from_entropy())
    }

    /// Sampler with a reproducible draw sequence.
    pub fn with_seed(root: impl Into<PathBuf>, seed: u64) -> Self {
        Self::with_rng(root, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(root: impl Into<PathBuf>, rng: StdRng) -> Self {
        Self {
            root: root.into(),
            parser: Arc::new(TemplateParser::new()),
            rng,
            pools: HashMap::new(),
            counters: HashMap::new(),
        }
    }

    pub fn with_parser(mut self, parser: Arc<dyn Parser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn pool_path(&self, category: &str, class_label: &str) -> PathBuf {
        self.root.join(category).join(format!("{}.txt", class_label))
    }

    pub fn loaded_pools(&self) -> usize {
        self.pools.len()
    }

    pub fn counter(&self, key: &MutexKey) -> Option<&FairnessCounter> {
        self.counters.get(key)
    }

    /// Load (or fetch from cache) the pool for (category, class_label).
    pub fn pool(&mut self, category: &str, class_label: &str) -> Result<&PhrasePool, FillError> {
        let path = self.pool_path(category, class_label);
        self.ensure_pool(&path)?;
        self.pools
            .get(&path)
            .ok_or(FillError::NotFound { path })
    }

    fn ensure_pool(&mut self, path: &Path) -> Result<(), FillError> {
        if self.pools.contains_key(path) {
            return Ok(());
        }
        let text = read_text(path)?;
        let pool: PhrasePool = text
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        debug!(path = %path.display(), phrases = pool.len(), "Loaded phrase pool");
        self.pools.insert(path.to_path_buf(), pool);
        Ok(())
    }

    /// Draw one phrase from (category, class_label).
    ///
    /// Without a mutex the draw is uniform over the pool. With one, phrases at
    /// the group's maximum use count are excluded; if that leaves nothing, every
    /// phrase is equally used and the whole pool is eligible again.
    pub fn sample(
        &mut self,
        category: &str,
        class_label: &str,
        mutex: Option<&str>,
    ) -> Result<String, FillError> {
        let path = self.pool_path(category, class_label);
        self.ensure_pool(&path)?;
        let Some(pool) = self.pools.get(&path) else {
            return Err(FillError::NotFound { path });
        };
        if pool.is_empty() {
            return Err(FillError::EmptyChoices { path });
        }

        let mutex = mutex.map(str::trim).filter(|m| !m.is_empty());
        let Some(mutex) = mutex else {
            return pool
                .iter()
                .choose(&mut self.rng)
                .cloned()
                .ok_or(FillError::EmptyChoices { path });
        };

        let counter = self
            .counters
            .entry(MutexKey::new(mutex, category, class_label))
            .or_insert_with(FairnessCounter::new);
        debug_assert!(counter.is_balanced(), "fairness spread exceeded before draw");

        let mut eligible: Vec<&String> = {
            let saturated = counter.saturated();
            pool.iter()
                .filter(|phrase| !saturated.contains(phrase.as_str()))
                .collect()
        };
        debug!(
            mutex,
            category,
            class_label,
            available = eligible.len(),
            pool = pool.len(),
            "Sampling under mutex"
        );
        if eligible.is_empty() {
            warn!(
                mutex,
                category, class_label, "Choices drained for mutex; falling back to full pool"
            );
            eligible = pool.iter().collect();
        }

        let choice = eligible
            .choose(&mut self.rng)
            .map(|phrase| (*phrase).clone())
            .ok_or_else(|| FillError::EmptyChoices { path: path.clone() })?;
        counter.record(&choice);

        if !counter.is_balanced() {
            warn!(
                mutex,
                category,
                class_label,
                spread = counter.spread(),
                "Fairness spread above one after draw"
            );
        }
        Ok(choice)
    }

    /// Walk the flock root and load every `<category>/<class_label>.txt` pool.
    pub fn inventory(&mut self) -> Result<Vec<PoolSummary>, FillError> {
        if !self.root.is_dir() {
            return Err(FillError::NotFound {
                path: self.root.clone(),
            });
        }
        let mut found = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(2).max_depth(2).sort_by_file_name() {
            let entry = entry.map_err(walk_error)?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            let category = path
                .parent()
                .and_then(Path::file_name)
                .and_then(|n| n.to_str())
                .map(String::from);
            let class_label = path.file_stem().and_then(|n| n.to_str()).map(String::from);
            if let (Some(category), Some(class_label)) = (category, class_label) {
                found.push((category, class_label));
            }
        }

        let mut out = Vec::with_capacity(found.len());
        for (category, class_label) in found {
            let phrases = self.pool(&category, &class_label)?.len();
            out.push(PoolSummary {
                category,
                class_label,
                phrases,
            });
        }
        Ok(out)
    }
}

/// Keeps the underlying io error (and its kind) of a failed walk step.
fn walk_error(err: walkdir::Error) -> FillError {
    FillError::Io(err.into())
}

impl Fetcher for FlockSampler {
    type Request = FlockRequest;
    type Output = SlotMapping;

    fn fetch(&mut self, request: FlockRequest) -> Result<SlotMapping, FillError> {
        let phrase = self.sample(
            &request.category,
            &request.class_label,
            request.mutex.as_deref(),
        )?;
        let parsed = self.parser.parse(&phrase, request.grain);
        let wrapped = Fillable::wrap(&request.wrap_kind, vec![parsed])?;

        let mut out = SlotMapping::new();
        out.insert(request.tag, wrapped);
        Ok(out)
    }

    fn clear_cache(&mut self) {
        self.pools.clear();
        self.counters.clear();
    }
}
