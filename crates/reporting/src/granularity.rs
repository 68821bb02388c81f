//! Report bucketing: period granularity and date windows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How report rows are bucketed along the time axis.
///
/// The format strings below exist in both chrono's `strftime` and the document
/// database's `$dateToString`, which is what keeps the in-memory and
/// database-side rollups labeling periods identically. Weekly buckets use ISO
/// week labels (`2024-W09`) so a week never straddles a year label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Granularity {
    /// Format string understood by both chrono and `$dateToString`.
    pub fn format(&self) -> &'static str {
        match self {
            Granularity::Daily => "%Y-%m-%d",
            Granularity::Weekly => "%G-W%V",
            Granularity::Monthly => "%Y-%m",
            Granularity::Yearly => "%Y",
        }
    }

    /// The period label a timestamp falls into.
    pub fn bucket_key(&self, at: DateTime<Utc>) -> String {
        at.format(self.format()).to_string()
    }
}

/// Half-open date window `[start, end)`. Either bound may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn since(start: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        if let Some(start) = self.start {
            if at < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if at >= end {
                return false;
            }
        }
        true
    }
}
