//! Components accept an injected parser in place of the template parser

use flockfill::content::{BlockKind, Fillable, SlotMapping};
use flockfill::error::FillError;
use flockfill::fetcher::{Fetcher, FlockRequest, FlockSampler, InfoMode, ProjectInfoCache, RosterFetcher};
use flockfill::genre::GenreLoader;
use flockfill::parser::{nonempty_segments, Parser, TemplateParser};
use std::sync::Arc;

use crate::integration::test_utils::{project_fixture, write_pool};

/// Upper-cases everything and treats text as plain atoms (no slot references).
struct ShoutingParser;

impl Parser for ShoutingParser {
    fn parse_sentence(&self, text: &str) -> Fillable {
        Fillable::atom(text.trim().to_uppercase())
    }

    fn parse_paragraph(&self, text: &str) -> Fillable {
        let sentences = nonempty_segments(text, "\n")
            .into_iter()
            .map(|line| self.parse_sentence(line))
            .collect();
        Fillable::block(BlockKind::Paragraph, sentences)
    }

    fn parse_article(&self, text: &str) -> Fillable {
        Fillable::atom(text.trim().to_uppercase())
    }

    fn parse_by_tag(&self, tag: &str, text: &str) -> Result<SlotMapping, FillError> {
        TemplateParser.parse_by_tag(tag, &text.to_uppercase())
    }
}

fn shouting() -> Arc<dyn Parser> {
    Arc::new(ShoutingParser)
}

#[test]
fn test_sampler_uses_injected_parser() {
    let temp = tempfile::TempDir::new().unwrap();
    write_pool(temp.path(), "overall", "a", "quiet {He} progress\n");
    let mut sampler =
        FlockSampler::with_seed(temp.path().join("flock"), 0).with_parser(shouting());

    let out = sampler
        .fetch(FlockRequest::new("sent_overall", "overall", "a"))
        .unwrap();
    let node = &out["sent_overall"];
    assert_eq!(node.render(), "QUIET {HE} PROGRESS");
    assert!(node.unresolved_slots().is_empty());
}

#[test]
fn test_project_info_uses_injected_parser() {
    let temp = project_fixture();
    let mut cache = ProjectInfoCache::with_seed(temp.path().join("program_info"), 0)
        .with_parser(shouting());
    let slots = cache.fetch(InfoMode::Parsed).unwrap();
    assert_eq!(slots["program_name"].render(), "ROBOTICS CAMP");
    assert_eq!(slots["date"].render(), "JUNE 1, 2026");
}

#[test]
fn test_genre_loader_uses_injected_parser() {
    let temp = project_fixture();
    let genre = GenreLoader::new(temp.path().join("genre").join("genre.txt"))
        .with_parser(shouting())
        .load_genre()
        .unwrap();
    assert!(genre.unresolved_slots().is_empty());
    assert!(genre.render().starts_with("{DATE}\n\nDEAR {FIRST_NAME}"));
}

#[test]
fn test_roster_fetcher_parses_additional_columns_with_injected_parser() {
    let temp = project_fixture();
    let mut fetcher = RosterFetcher::new(
        temp.path().join("eval.csv"),
        FlockSampler::with_seed(temp.path().join("flock"), 1),
    )
    .with_parser(shouting());
    let rows = fetcher.fetch(()).unwrap();

    assert_eq!(rows[0]["word_hobby"].render(), "CHESS");
    // evaluation phrases still go through the sampler's own parser
    assert_eq!(
        rows[0]["sent_overall"].render(),
        "She did a overall work in {program_name}."
    );
}
