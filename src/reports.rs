//! Aggregation query catalog.
//!
//! Every query is a pure function of a [`FilteredView`] producing a small
//! typed table. Time-bucketed queries use each record's own timestamp and
//! silently exclude records whose timestamp is null; plain distributions
//! include every record in the view.

use crate::bots::OTHER;
use crate::filter::FilteredView;
use crate::models::{
    DailyMeanSize, DailyStatusCount, DailyValueCount, HourlyCount, LogRecord, RecordField,
    StatusCount, TopReport, ValueCount,
};
use chrono::{Duration, NaiveDateTime, Timelike};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Count of records per distinct status, ascending by status text.
pub fn status_distribution(view: &FilteredView) -> Vec<StatusCount> {
    status_counts(view.records().iter().copied())
}

/// Daily (calendar day × status) counts, sorted by day then status.
pub fn status_over_time(view: &FilteredView) -> Vec<DailyStatusCount> {
    status_day_counts(view.records().iter().copied())
}

/// Status distribution restricted to client and server errors.
pub fn error_distribution(view: &FilteredView) -> Vec<StatusCount> {
    status_counts(view.records().iter().copied().filter(|r| r.is_error()))
}

/// Daily error counts per status.
pub fn errors_over_time(view: &FilteredView) -> Vec<DailyStatusCount> {
    status_day_counts(view.records().iter().copied().filter(|r| r.is_error()))
}

/// The N most frequent values of a field, descending by count; ties keep
/// first-encountered order.
pub fn top_values(view: &FilteredView, field: RecordField, n: usize) -> Vec<ValueCount> {
    ranked_values(view.records().iter().copied(), |r| field.value(r))
        .into_iter()
        .take(n)
        .collect()
}

/// Daily activity restricted to records whose field value is in the given
/// ranking.
pub fn top_activity(
    view: &FilteredView,
    field: RecordField,
    ranking: &[ValueCount],
) -> Vec<DailyValueCount> {
    let selected: HashSet<&str> = ranking.iter().map(|v| v.value.as_str()).collect();
    let mut buckets: BTreeMap<(chrono::NaiveDate, &str), u64> = BTreeMap::new();
    for record in view.records().iter().copied() {
        let value = field.value(record);
        if !selected.contains(value) {
            continue;
        }
        if let Some(date) = record.date() {
            *buckets.entry((date, value)).or_default() += 1;
        }
    }
    buckets
        .into_iter()
        .map(|((date, value), count)| DailyValueCount {
            date,
            value: value.to_string(),
            count,
        })
        .collect()
}

/// Ranking plus companion activity series in one result.
pub fn top_report(view: &FilteredView, field: RecordField, n: usize) -> TopReport {
    let ranking = top_values(view, field, n);
    let activity = top_activity(view, field, &ranking);
    TopReport { ranking, activity }
}

/// Count per distinct HTTP method, descending by count.
pub fn method_distribution(view: &FilteredView) -> Vec<ValueCount> {
    ranked_values(view.records().iter().copied(), |r| r.method.as_str())
}

/// Count per crawler label, descending by count; "Other" traffic excluded.
pub fn bot_distribution(view: &FilteredView) -> Vec<ValueCount> {
    ranked_values(
        view.records().iter().copied().filter(|r| r.bot != OTHER),
        |r| r.bot.as_str(),
    )
}

/// Requests per hour across the full observed span. The bucket sequence is
/// contiguous: hours without traffic appear with a zero count.
pub fn hourly_activity(view: &FilteredView) -> Vec<HourlyCount> {
    let mut counts: HashMap<NaiveDateTime, u64> = HashMap::new();
    for record in view.records().iter().copied() {
        if let Some(ts) = record.timestamp {
            *counts.entry(hour_bucket(ts.naive_local())).or_default() += 1;
        }
    }
    let (Some(&first), Some(&last)) = (counts.keys().min(), counts.keys().max()) else {
        return Vec::new();
    };

    let mut series = Vec::new();
    let mut hour = first;
    while hour <= last {
        series.push(HourlyCount {
            hour,
            count: counts.get(&hour).copied().unwrap_or(0),
        });
        hour = hour + Duration::hours(1);
    }
    series
}

/// Arithmetic mean of the non-null sizes in the view.
pub fn mean_size(view: &FilteredView) -> Option<f64> {
    let sizes: Vec<u64> = view.records().iter().filter_map(|r| r.size).collect();
    if sizes.is_empty() {
        return None;
    }
    Some(sizes.iter().sum::<u64>() as f64 / sizes.len() as f64)
}

/// Daily mean of non-null sizes. Every day with timestamped records is
/// present; a day whose records all lack a size reports a null mean.
pub fn mean_size_over_time(view: &FilteredView) -> Vec<DailyMeanSize> {
    let mut days: BTreeMap<chrono::NaiveDate, (u64, u64)> = BTreeMap::new();
    for record in view.records().iter().copied() {
        if let Some(date) = record.date() {
            let (sum, count) = days.entry(date).or_default();
            if let Some(size) = record.size {
                *sum += size;
                *count += 1;
            }
        }
    }
    days.into_iter()
        .map(|(date, (sum, count))| DailyMeanSize {
            date,
            mean_size: (count > 0).then(|| sum as f64 / count as f64),
        })
        .collect()
}

fn status_counts<'a>(records: impl Iterator<Item = &'a LogRecord>) -> Vec<StatusCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(record.status.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(status, count)| StatusCount {
            status: status.to_string(),
            count,
        })
        .collect()
}

fn status_day_counts<'a>(records: impl Iterator<Item = &'a LogRecord>) -> Vec<DailyStatusCount> {
    let mut buckets: BTreeMap<(chrono::NaiveDate, &str), u64> = BTreeMap::new();
    for record in records {
        if let Some(date) = record.date() {
            *buckets.entry((date, record.status.as_str())).or_default() += 1;
        }
    }
    buckets
        .into_iter()
        .map(|((date, status), count)| DailyStatusCount {
            date,
            status: status.to_string(),
            count,
        })
        .collect()
}

/// Count distinct values of `key`, descending by count, ties broken by
/// first-encountered order.
fn ranked_values<'a, F>(
    records: impl Iterator<Item = &'a LogRecord>,
    key: F,
) -> Vec<ValueCount>
where
    F: Fn(&'a LogRecord) -> &'a str,
{
    let mut counts: HashMap<&str, (u64, usize)> = HashMap::new();
    for (index, record) in records.enumerate() {
        let entry = counts.entry(key(record)).or_insert((0, index));
        entry.0 += 1;
    }
    let mut ranked: Vec<(&str, u64, usize)> = counts
        .into_iter()
        .map(|(value, (count, first))| (value, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .map(|(value, count, _)| ValueCount {
            value: value.to_string(),
            count,
        })
        .collect()
}

fn hour_bucket(local: NaiveDateTime) -> NaiveDateTime {
    // Truncating to the hour cannot produce an invalid time.
    local.date().and_hms_opt(local.hour(), 0, 0).unwrap()
}
