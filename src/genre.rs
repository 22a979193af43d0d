//! Genre (letter skeleton) loading.

use crate::content::Fillable;
use crate::error::{read_text, FillError};
use crate::parser::{Parser, TemplateParser};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Reads the genre file and parses it as an article. Not cached: the skeleton
/// is loaded once per batch by the caller.
pub struct GenreLoader {
    path: PathBuf,
    parser: Arc<dyn Parser>,
}

impl GenreLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            parser: Arc::new(TemplateParser::new()),
        }
    }

    pub fn with_parser(mut self, parser: Arc<dyn Parser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_genre(&self) -> Result<Fillable, FillError> {
        let text = read_text(&self.path)?;
        Ok(self.parser.parse_article(&text))
    }
}
