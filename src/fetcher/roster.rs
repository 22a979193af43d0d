//! Roster fetcher: validated roster rows bound to slot mappings.

use crate::binder::RowBinder;
use crate::content::SlotMapping;
use crate::error::FillError;
use crate::fetcher::{Fetcher, FlockSampler};
use crate::parser::{Grain, Parser, TemplateParser};
use crate::roster::{Roster, RosterLoader};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Owns the batch's roster and flock sampler. The roster is loaded and
/// validated on first use; every fetch binds all rows in roster order.
pub struct RosterFetcher {
    loader: RosterLoader,
    roster: Option<Roster>,
    sampler: FlockSampler,
    parser: Arc<dyn Parser>,
    grain: Grain,
}

impl RosterFetcher {
    pub fn new(path: impl Into<PathBuf>, sampler: FlockSampler) -> Self {
        Self {
            loader: RosterLoader::new(path),
            roster: None,
            sampler,
            parser: Arc::new(TemplateParser::new()),
            grain: Grain::Sentence,
        }
    }

    pub fn with_parser(mut self, parser: Arc<dyn Parser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_grain(mut self, grain: Grain) -> Self {
        self.grain = grain;
        self
    }

    /// The validated roster, loading it if needed.
    pub fn roster(&mut self) -> Result<&Roster, FillError> {
        let roster = match self.roster.take() {
            Some(roster) => roster,
            None => self.loader.load_and_validate()?,
        };
        Ok(self.roster.insert(roster))
    }

    /// Distinct first and last names of the roster.
    pub fn names(&mut self) -> Result<BTreeSet<String>, FillError> {
        Ok(self.roster()?.names())
    }

    pub fn sampler(&self) -> &FlockSampler {
        &self.sampler
    }
}

impl Fetcher for RosterFetcher {
    type Request = ();
    type Output = Vec<SlotMapping>;

    fn fetch(&mut self, _request: ()) -> Result<Vec<SlotMapping>, FillError> {
        let roster = match self.roster.take() {
            Some(roster) => roster,
            None => self.loader.load_and_validate()?,
        };
        let roster = self.roster.insert(roster);

        let mut binder =
            RowBinder::new(&mut self.sampler, self.parser.as_ref()).with_grain(self.grain);
        let bound = binder.bind_all(&roster.rows)?;
        info!(rows = bound.len(), "Bound roster");
        Ok(bound)
    }

    /// Drops the roster and resets the sampler's pools and fairness counters.
    fn clear_cache(&mut self) {
        self.roster = None;
        self.sampler.clear_cache();
    }
}
