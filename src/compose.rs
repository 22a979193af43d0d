//! Letter Composition
//!
//! Merges the genre skeleton with project info and one row's slot mapping,
//! renders plain text, and writes a batch of letters to disk.

use crate::content::{Fillable, SlotMapping};
use crate::error::FillError;
use crate::fetcher::{Fetcher, InfoMode, ProjectInfoCache};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Upper bound on fill passes over a letter. Bound slot content may itself
/// reference project info (e.g. `{program_name}` inside a sampled phrase), so
/// a single pass is not always enough; self-referencing slots stop here.
pub const MAX_FILL_PASSES: usize = 8;

pub const MANIFEST_FILE: &str = "manifest.json";

/// One rendered letter.
#[derive(Debug, Clone, Serialize)]
pub struct Letter {
    pub recipient: String,
    pub file_stem: String,
    pub text: String,
    pub unresolved: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Manifest<'a> {
    generated_at: String,
    letters: Vec<ManifestEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct ManifestEntry<'a> {
    recipient: &'a str,
    file: String,
}

/// Fill `node` against `bound` until no bound reference remains.
pub fn resolve(node: &mut Fillable, bound: &SlotMapping) {
    for _ in 0..MAX_FILL_PASSES {
        let pending = node.unresolved_slots();
        if !pending.iter().any(|name| bound.contains_key(name)) {
            break;
        }
        node.fill(bound);
    }
}

/// Compose one letter. Row slots take precedence over project info slots.
///
/// In strict mode a letter with unbound slot references is rejected.
pub fn compose_letter(
    genre: &Fillable,
    info: &SlotMapping,
    row: &SlotMapping,
    strict: bool,
) -> Result<Letter, FillError> {
    let mut bound = info.clone();
    bound.extend(row.iter().map(|(k, v)| (k.clone(), v.clone())));

    let mut body = genre.clone();
    resolve(&mut body, &bound);

    let first = row.get("first_name").map(Fillable::render).unwrap_or_default();
    let last = row.get("last_name").map(Fillable::render).unwrap_or_default();
    let recipient = format!("{} {}", first, last).trim().to_string();
    let unresolved: Vec<String> = body.unresolved_slots().into_iter().collect();

    if !unresolved.is_empty() {
        if strict {
            return Err(FillError::UnresolvedSlots {
                recipient,
                slots: unresolved,
            });
        }
        warn!(recipient = %recipient, slots = ?unresolved, "Letter has unresolved slots");
    }

    Ok(Letter {
        file_stem: file_stem(&last, &first),
        recipient,
        text: body.render(),
        unresolved,
    })
}

/// Compose a letter per row. Project info is fetched per letter so
/// multi-entry values (the date) vary across the batch.
pub fn compose_letters(
    genre: &Fillable,
    info: &mut ProjectInfoCache,
    mode: InfoMode,
    rows: &[SlotMapping],
    strict: bool,
) -> Result<Vec<Letter>, FillError> {
    rows.iter()
        .map(|row| {
            let info_slots = info.fetch(mode)?;
            compose_letter(genre, &info_slots, row, strict)
        })
        .collect()
}

fn file_stem(last: &str, first: &str) -> String {
    let raw = match (last.is_empty(), first.is_empty()) {
        (true, true) => "letter".to_string(),
        (false, true) => last.to_string(),
        (true, false) => first.to_string(),
        (false, false) => format!("{}_{}", last, first),
    };
    raw.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

/// Write one `<stem>.txt` per letter plus a manifest into `dir`.
/// Duplicate stems get a numeric suffix. Returns the manifest path.
pub fn write_letters(dir: &Path, letters: &[Letter]) -> Result<PathBuf, FillError> {
    std::fs::create_dir_all(dir)?;

    let mut used = BTreeSet::new();
    let mut entries = Vec::with_capacity(letters.len());
    for letter in letters {
        let mut stem = letter.file_stem.clone();
        let mut n = 2;
        while !used.insert(stem.clone()) {
            stem = format!("{}_{}", letter.file_stem, n);
            n += 1;
        }
        let file = format!("{}.txt", stem);
        let mut text = letter.text.clone();
        text.push('\n');
        std::fs::write(dir.join(&file), text)?;
        entries.push(ManifestEntry {
            recipient: &letter.recipient,
            file,
        });
    }

    let manifest = Manifest {
        generated_at: chrono::Utc::now().to_rfc3339(),
        letters: entries,
    };
    let manifest_path = dir.join(MANIFEST_FILE);
    std::fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;
    info!(dir = %dir.display(), letters = letters.len(), "Wrote letters");
    Ok(manifest_path)
}
