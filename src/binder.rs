//! Row Binding
//!
//! Builds the slot mapping for one roster row. Slots are bound in a fixed
//! order and every new slot is filled against the slots bound before it:
//!
//! 1. the ten identity slots: `first_name`, `last_name` and eight pronoun forms
//! 2. one sampled evaluation slot per graded column (`sent_participation`, ...)
//! 3. the row's additional tagged columns
//!
//! so additional columns may reference evaluation slots but not the reverse.

use crate::content::{Fillable, SlotMapping};
use crate::error::FillError;
use crate::fetcher::{Fetcher, FlockRequest, FlockSampler};
use crate::parser::{Grain, Parser};
use crate::roster::{EvalColumn, Gender, RosterRow};
use tracing::debug;

/// Wrap kind used for sampled evaluation slots.
const EVAL_WRAP_KIND: &str = "paragraph";

/// Pronoun slot names and their (male, female) forms.
const PRONOUNS: [(&str, &str, &str); 8] = [
    ("he", "he", "she"),
    ("him", "him", "her"),
    ("his", "his", "her"),
    ("himself", "himself", "herself"),
    ("He", "He", "She"),
    ("Him", "Him", "Her"),
    ("His", "His", "Her"),
    ("Himself", "Himself", "Herself"),
];

/// The eight pronoun slots for `gender`, as (slot name, form).
pub fn pronoun_forms(gender: Gender) -> impl Iterator<Item = (&'static str, &'static str)> {
    PRONOUNS.iter().map(move |&(slot, male, female)| match gender {
        Gender::Male => (slot, male),
        Gender::Female => (slot, female),
    })
}

/// Binds roster rows to slot mappings, drawing evaluation phrases from a
/// shared sampler so fairness accumulates across the whole batch.
pub struct RowBinder<'a> {
    sampler: &'a mut FlockSampler,
    parser: &'a dyn Parser,
    grain: Grain,
}

impl<'a> RowBinder<'a> {
    pub fn new(sampler: &'a mut FlockSampler, parser: &'a dyn Parser) -> Self {
        Self {
            sampler,
            parser,
            grain: Grain::Sentence,
        }
    }

    /// Granularity tag for evaluation slot names (`sent_` or `para_`).
    pub fn with_grain(mut self, grain: Grain) -> Self {
        self.grain = grain;
        self
    }

    pub fn bind_row(&mut self, row: &RosterRow) -> Result<SlotMapping, FillError> {
        let mut slots = SlotMapping::new();
        slots.insert("first_name".to_string(), Fillable::atom(&row.first_name));
        slots.insert("last_name".to_string(), Fillable::atom(&row.last_name));
        for (name, form) in pronoun_forms(row.gender) {
            slots.insert(name.to_string(), Fillable::atom(form));
        }

        for column in EvalColumn::BINDING_ORDER {
            let request = FlockRequest::new(
                format!("{}_{}", self.grain.tag_prefix(), column),
                column.as_str(),
                row.grade(column).class_label(),
            )
            .with_wrap_kind(EVAL_WRAP_KIND)
            .with_mutex(row.mutex.clone());
            let fetched = self.sampler.fetch(request)?;
            merge_filled(&mut slots, fetched);
        }

        for (column, value) in &row.additional {
            let parsed = self.parser.parse_by_tag(column, value)?;
            merge_filled(&mut slots, parsed);
        }

        debug!(recipient = %row.display_name(), slots = slots.len(), "Bound roster row");
        Ok(slots)
    }

    /// One mapping per row, in roster order.
    pub fn bind_all(&mut self, rows: &[RosterRow]) -> Result<Vec<SlotMapping>, FillError> {
        rows.iter().map(|row| self.bind_row(row)).collect()
    }
}

/// Fill every new slot against what is already bound, then add them all.
/// Slots arriving together never see each other.
fn merge_filled(slots: &mut SlotMapping, incoming: SlotMapping) {
    let filled: Vec<(String, Fillable)> = incoming
        .into_iter()
        .map(|(name, node)| (name, node.filled(slots)))
        .collect();
    slots.extend(filled);
}
