//! Roster loading and validation.
//!
//! A roster is a UTF-8 CSV file with a header row. Seven basic columns are
//! required; the optional `mutex` column scopes phrase fairness per recipient
//! group; every other column is a free-form tagged column bound per row.

use crate::error::FillError;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;
use unicode_normalization::UnicodeNormalization;

pub const BASIC_COLUMNS: [&str; 7] = [
    "first_name",
    "last_name",
    "gender",
    "assignment",
    "participation",
    "final",
    "overall",
];

/// Control column read for fairness scoping; never bound as a slot.
pub const MUTEX_COLUMN: &str = "mutex";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Gender::Male),
            "F" => Ok(Gender::Female),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    /// Pool class label for this grade (`a`..`d`).
    pub fn class_label(self) -> &'static str {
        match self {
            Grade::A => "a",
            Grade::B => "b",
            Grade::C => "c",
            Grade::D => "d",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        })
    }
}

impl FromStr for Grade {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "D" => Ok(Grade::D),
            _ => Err(()),
        }
    }
}

/// The four graded evaluation columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum EvalColumn {
    Assignment,
    Participation,
    Final,
    Overall,
}

impl EvalColumn {
    /// Order in which evaluation slots are sampled and bound.
    pub const BINDING_ORDER: [EvalColumn; 4] = [
        EvalColumn::Participation,
        EvalColumn::Overall,
        EvalColumn::Assignment,
        EvalColumn::Final,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EvalColumn::Assignment => "assignment",
            EvalColumn::Participation => "participation",
            EvalColumn::Final => "final",
            EvalColumn::Overall => "overall",
        }
    }
}

impl fmt::Display for EvalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validated recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterRow {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub assignment: Grade,
    pub participation: Grade,
    pub final_grade: Grade,
    pub overall: Grade,
    pub mutex: Option<String>,
    /// Additional (tagged) columns in header order, raw cell text.
    pub additional: Vec<(String, String)>,
}

impl RosterRow {
    pub fn grade(&self, column: EvalColumn) -> Grade {
        match column {
            EvalColumn::Assignment => self.assignment,
            EvalColumn::Participation => self.participation,
            EvalColumn::Final => self.final_grade,
            EvalColumn::Overall => self.overall,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A loaded, validated roster.
#[derive(Debug, Clone, Serialize)]
pub struct Roster {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub additional_columns: Vec<String>,
    pub rows: Vec<RosterRow>,
}

impl Roster {
    /// Distinct first and last names, sorted. Used as extra accepted spellings
    /// by spell/grammar checking of the rendered letters.
    pub fn names(&self) -> BTreeSet<String> {
        self.rows
            .iter()
            .flat_map(|row| [row.first_name.clone(), row.last_name.clone()])
            .filter(|name| !name.is_empty())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Trim and capitalize the first letter, leaving the rest unchanged.
pub fn normalize_cell(raw: &str) -> String {
    let composed: String = raw.nfc().collect();
    capitalize(composed.trim())
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub struct RosterLoader {
    path: PathBuf,
}

impl RosterLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_and_validate(&self) -> Result<Roster, FillError> {
        let path = &self.path;
        if !path.is_file() {
            return Err(FillError::NotFound { path: path.clone() });
        }
        let bytes = std::fs::read(path)?;
        let text = String::from_utf8(bytes).map_err(|e| FillError::Encoding {
            path: path.clone(),
            detail: e.to_string(),
        })?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text.as_str());

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(text.as_bytes());
        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();

        let mut basic = [0usize; 7];
        for (slot, column) in basic.iter_mut().zip(BASIC_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| FillError::MissingColumn {
                    column: column.to_string(),
                    path: path.clone(),
                    headers: headers.clone(),
                })?;
        }
        let [first_idx, last_idx, gender_idx, assignment_idx, participation_idx, final_idx, overall_idx] =
            basic;
        let mutex_idx = headers.iter().position(|h| h == MUTEX_COLUMN);

        let additional: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !BASIC_COLUMNS.contains(&h.as_str()) && h.as_str() != MUTEX_COLUMN)
            .map(|(i, h)| (i, h.clone()))
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let cell = |idx: usize| record.get(idx).unwrap_or("");

            let first_name = normalize_cell(cell(first_idx));
            let last_name = normalize_cell(cell(last_idx));
            let invalid = |column: &str, value: String| FillError::InvalidValue {
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                column: column.to_string(),
                value,
            };

            let gender_raw = normalize_cell(cell(gender_idx));
            let gender: Gender = gender_raw
                .parse()
                .map_err(|_| invalid("gender", gender_raw.clone()))?;

            let mut grades = [Grade::A; 4];
            for (grade, (column, idx)) in grades.iter_mut().zip([
                (EvalColumn::Assignment, assignment_idx),
                (EvalColumn::Participation, participation_idx),
                (EvalColumn::Final, final_idx),
                (EvalColumn::Overall, overall_idx),
            ]) {
                let raw = normalize_cell(cell(idx));
                *grade = raw
                    .parse()
                    .map_err(|_| invalid(column.as_str(), raw.clone()))?;
            }
            let [assignment, participation, final_grade, overall] = grades;

            let mutex = mutex_idx
                .map(|idx| cell(idx).trim().to_string())
                .filter(|m| !m.is_empty());

            let additional = additional
                .iter()
                .map(|(idx, name)| (name.clone(), cell(*idx).to_string()))
                .collect();

            rows.push(RosterRow {
                first_name,
                last_name,
                gender,
                assignment,
                participation,
                final_grade,
                overall,
                mutex,
                additional,
            });
        }

        info!(
            path = %path.display(),
            rows = rows.len(),
            additional_columns = additional.len(),
            "Loaded roster"
        );

        Ok(Roster {
            path: path.clone(),
            additional_columns: additional.into_iter().map(|(_, name)| name).collect(),
            headers,
            rows,
        })
    }
}
