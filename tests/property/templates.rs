//! Property-based tests for template parsing

use flockfill::content::SlotMapping;
use flockfill::parser::{Parser, TemplateParser};
use proptest::prelude::*;

/// Parsing and rendering with nothing bound gives back the trimmed text.
#[test]
fn test_unbound_sentence_renders_verbatim() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&"[a-z {}_.,!]{0,40}", |text| {
            let node = TemplateParser.parse_sentence(&text);
            prop_assert_eq!(node.render(), text.trim());
            Ok(())
        })
        .unwrap();
}

/// Filling with an empty mapping is a no-op.
#[test]
fn test_fill_with_nothing_bound_is_identity() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&"[a-z {}_\n]{0,60}", |text| {
            let node = TemplateParser.parse_article(&text);
            let filled = node.clone().filled(&SlotMapping::new());
            prop_assert_eq!(filled, node);
            Ok(())
        })
        .unwrap();
}
