//! Per-character correct/total counters.
//!
//! Every character string is its own key: the hiragana, katakana and romaji
//! spellings of one sound are tracked independently.

use crate::kana::table::{all_characters, Script};
use crate::util::percentage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts for one character. `correct <= total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ProficiencyRecord {
    correct: u64,
    total: u64,
}

impl ProficiencyRecord {
    /// Builds a record, clamping `correct` down to `total` if it exceeds it
    pub fn new(correct: u64, total: u64) -> Self {
        Self {
            correct: correct.min(total),
            total,
        }
    }

    pub fn correct(&self) -> u64 {
        self.correct
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Count one answer worth `increment` attempts
    pub fn record(&mut self, was_correct: bool, increment: u64) {
        self.total += increment;
        if was_correct {
            self.correct += increment;
        }
    }

    /// `correct / total`, or None before the first attempt
    pub fn accuracy(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.correct as f64 / self.total as f64)
        }
    }

    pub fn percentage(&self) -> f64 {
        percentage(self.correct, self.total)
    }

    pub fn band(&self) -> ProficiencyBand {
        ProficiencyBand::from_percentage(self.percentage())
    }
}

/// Coarse proficiency level used to color the proficiency map
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ProficiencyBand {
    Weak,
    Developing,
    Strong,
}

impl ProficiencyBand {
    pub fn from_percentage(pct: f64) -> Self {
        if pct >= 70.0 {
            ProficiencyBand::Strong
        } else if pct >= 30.0 {
            ProficiencyBand::Developing
        } else {
            ProficiencyBand::Weak
        }
    }
}

/// One cell of the proficiency map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapCell {
    pub character: &'static str,
    pub percentage: f64,
    pub band: ProficiencyBand,
}

/// Records for every character, keyed by the exact character string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProficiencyTable {
    records: BTreeMap<String, ProficiencyRecord>,
}

impl ProficiencyTable {
    /// A {0, 0} record for every character of all three scripts
    pub fn zeroed() -> Self {
        Self {
            records: all_characters()
                .map(|c| (c.to_string(), ProficiencyRecord::default()))
                .collect(),
        }
    }

    pub fn get(&self, character: &str) -> ProficiencyRecord {
        self.records.get(character).copied().unwrap_or_default()
    }

    pub fn contains(&self, character: &str) -> bool {
        self.records.contains_key(character)
    }

    /// Store a record, repairing it if `correct` exceeds `total`
    pub fn insert(&mut self, character: impl Into<String>, record: ProficiencyRecord) {
        let character = character.into();
        let repaired = ProficiencyRecord::new(record.correct, record.total);
        if repaired != record {
            log::warn!(
                "clamped record for {character}: {}/{} -> {}/{}",
                record.correct,
                record.total,
                repaired.correct,
                repaired.total
            );
        }
        self.records.insert(character, repaired);
    }

    /// Count one answer against `character` and return the updated record
    pub fn record(
        &mut self,
        character: &str,
        was_correct: bool,
        increment: u64,
    ) -> ProficiencyRecord {
        let entry = self.records.entry(character.to_string()).or_default();
        entry.record(was_correct, increment);
        *entry
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ProficiencyRecord)> {
        self.records.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fill in a zero record for any known character that is missing
    pub fn fill_missing(&mut self) {
        for c in all_characters() {
            self.records.entry(c.to_string()).or_default();
        }
    }

    /// Sum of all records
    pub fn combined(&self) -> ProficiencyRecord {
        self.records
            .values()
            .fold(ProficiencyRecord::default(), |acc, r| {
                ProficiencyRecord::new(acc.correct + r.correct, acc.total + r.total)
            })
    }

    /// Proficiency of every character of `script`, laid out on the chart grid
    pub fn map_rows(&self, script: Script) -> Vec<Vec<Option<MapCell>>> {
        script
            .rows()
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| {
                        cell.map(|character| {
                            let record = self.get(character);
                            MapCell {
                                character,
                                percentage: record.percentage(),
                                band: record.band(),
                            }
                        })
                    })
                    .collect()
            })
            .collect()
    }
}
