//! Timeframe and validity filtering over parsed records.
//!
//! Both filters are pure: they read a borrowed slice and return a new,
//! order-preserving `Vec`. A record is kept or dropped as a whole, so a
//! timestamp can never be separated from its temperature.

use chrono::{Datelike, NaiveDateTime};
use tracing::debug;

use crate::model::{ObservationRecord, TimeframeSpec};

pub fn matches_year(timestamp: &NaiveDateTime, year: i32) -> bool {
    timestamp.year() == year
}

pub fn matches_month(timestamp: &NaiveDateTime, month: u32) -> bool {
    timestamp.month() == month
}

pub fn matches_day(timestamp: &NaiveDateTime, day: u32) -> bool {
    timestamp.day() == day
}

impl TimeframeSpec {
    /// Checks year, then month, then day, skipping any this timeframe does not set.
    pub fn matches(&self, timestamp: &NaiveDateTime) -> bool {
        self.year().is_none_or(|y| matches_year(timestamp, y))
            && self.month().is_none_or(|m| matches_month(timestamp, m))
            && self.day().is_none_or(|d| matches_day(timestamp, d))
    }
}

/// Keep only the records whose timestamp falls inside `spec`.
pub fn filter_timeframe(records: &[ObservationRecord], spec: &TimeframeSpec) -> Vec<ObservationRecord> {
    if *spec == TimeframeSpec::All {
        return records.to_vec();
    }

    let kept: Vec<ObservationRecord> = records
        .iter()
        .filter(|record| spec.matches(&record.timestamp))
        .copied()
        .collect();

    debug!(
        timeframe = spec.kind().as_str(),
        before = records.len(),
        after = kept.len(),
        "applied timeframe filter"
    );
    kept
}

/// Drop records without a temperature reading.
pub fn filter_valid(records: &[ObservationRecord]) -> Vec<ObservationRecord> {
    let kept: Vec<ObservationRecord> = records.iter().filter(|r| !r.is_missing()).copied().collect();

    debug!(
        before = records.len(),
        after = kept.len(),
        "removed records with missing temperature"
    );
    kept
}
