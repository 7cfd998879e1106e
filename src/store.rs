//! In-memory store for one ingestion batch.
//!
//! A [`LogStore`] is built once from the records of a batch and is read-only
//! afterwards; a new batch replaces the store wholesale. Insertion order is
//! source arrival order then line order, which is not necessarily
//! chronological.

use crate::models::{LogRecord, TrafficSummary};
use chrono::NaiveDate;
use std::collections::HashSet;

pub struct LogStore {
    records: Vec<LogRecord>,
}

impl LogStore {
    pub fn new(records: Vec<LogRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    /// Scalar summary over the whole store.
    pub fn summary(&self) -> TrafficSummary {
        summarize(self.records.iter())
    }

    /// Distinct status codes in first-encountered order.
    pub fn distinct_statuses(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.status.as_str()))
    }

    /// Distinct HTTP methods in first-encountered order.
    pub fn distinct_methods(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.method.as_str()))
    }

    /// Distinct bot labels in first-encountered order, "Other" included.
    pub fn distinct_bots(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.bot.as_str()))
    }

    /// Earliest and latest calendar date over records with a valid
    /// timestamp; `None` when every timestamp is null.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut bounds: Option<(NaiveDate, NaiveDate)> = None;
        for date in self.records.iter().filter_map(|r| r.date()) {
            bounds = Some(match bounds {
                None => (date, date),
                Some((min, max)) => (min.min(date), max.max(date)),
            });
        }
        bounds
    }
}

/// Scalar summary over any sequence of records; shared between the store
/// and filtered views.
pub fn summarize<'a>(records: impl Iterator<Item = &'a LogRecord>) -> TrafficSummary {
    let mut total = 0u64;
    let mut errors = 0u64;
    let mut bots = 0u64;
    let mut ips: HashSet<&str> = HashSet::new();
    for record in records {
        total += 1;
        ips.insert(record.ip.as_str());
        if record.is_error() {
            errors += 1;
        }
        if record.bot != crate::bots::OTHER {
            bots += 1;
        }
    }
    TrafficSummary {
        total_requests: total,
        unique_ips: ips.len() as u64,
        error_requests: errors,
        bot_requests: bots,
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for value in values {
        if seen.insert(value) {
            out.push(value.to_string());
        }
    }
    out
}
