//! Yes/no classification of RSVP records and aggregate counts

use serde::{Deserialize, Serialize};

use crate::record::RsvpRecord;

const YES_WORDS: &[&str] = &["ja", "yes", "y", "true", "1"];
const NO_WORDS: &[&str] = &["nee", "no", "n", "false", "0"];

/// Outcome of interpreting a record's answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Yes,
    No,
    Unknown,
}

/// Classify a record.
///
/// A boolean `attending` wins. Otherwise `response` is used, falling back to
/// `status` only when `response` is absent.
pub fn classify(record: &RsvpRecord) -> Classification {
    if let Some(attending) = record.attending {
        return if attending {
            Classification::Yes
        } else {
            Classification::No
        };
    }

    let answer = record
        .response
        .as_deref()
        .or(record.status.as_deref())
        .unwrap_or_default();

    classify_answer(answer)
}

/// Classify a free-form answer, ignoring case and surrounding whitespace
pub fn classify_answer(answer: &str) -> Classification {
    let normalized = answer.to_lowercase();
    let normalized = normalized.trim();

    if YES_WORDS.contains(&normalized) {
        Classification::Yes
    } else if NO_WORDS.contains(&normalized) {
        Classification::No
    } else {
        Classification::Unknown
    }
}

impl RsvpRecord {
    pub fn classification(&self) -> Classification {
        classify(self)
    }
}

/// Aggregate counts over a set of records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub total: usize,
    pub yes: usize,
    pub no: usize,
}

impl Tally {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a RsvpRecord>,
    {
        records.into_iter().fold(Tally::default(), |mut tally, record| {
            tally.add(classify(record));
            tally
        })
    }

    pub fn add(&mut self, classification: Classification) {
        self.total += 1;
        match classification {
            Classification::Yes => self.yes += 1,
            Classification::No => self.no += 1,
            Classification::Unknown => {}
        }
    }
}
