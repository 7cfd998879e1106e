//! Filter engine: derived, read-only views over the log store.
//!
//! A view is a pure function of the store and the criteria; it borrows the
//! store's records and preserves their relative order. Set dimensions use
//! explicit-selection semantics: an empty set excludes everything, and the
//! defaults are the full catalogs of values observed in the store.

use crate::models::{LogRecord, TrafficSummary};
use crate::store::{summarize, LogStore};
use chrono::NaiveDate;
use std::collections::HashSet;

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("no record carries a valid timestamp, cannot derive date bounds")]
    NoValidTimestamps,
}

/// Criteria for deriving a view from the store.
#[derive(Debug, Clone)]
pub struct FilterCriteria {
    /// Inclusive calendar-date range, compared in each record's own
    /// timezone offset. `None` applies no date predicate at all; when a
    /// range is present, records without a timestamp are excluded.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub statuses: HashSet<String>,
    pub methods: HashSet<String>,
    pub bots: HashSet<String>,
}

impl FilterCriteria {
    /// The default criteria: every record in the store passes.
    pub fn matching_all(store: &LogStore) -> Self {
        Self {
            date_range: None,
            statuses: store.distinct_statuses().into_iter().collect(),
            methods: store.distinct_methods().into_iter().collect(),
            bots: store.distinct_bots().into_iter().collect(),
        }
    }

    /// Derive the view. Deterministic and side-effect free.
    pub fn apply<'a>(&self, store: &'a LogStore) -> FilteredView<'a> {
        let records = store
            .records()
            .iter()
            .filter(|record| self.matches(record))
            .collect();
        FilteredView { records }
    }

    fn matches(&self, record: &LogRecord) -> bool {
        if let Some((start, end)) = self.date_range {
            match record.date() {
                Some(date) => {
                    if date < start || date > end {
                        return false;
                    }
                }
                None => return false,
            }
        }
        self.statuses.contains(&record.status)
            && self.methods.contains(&record.method)
            && self.bots.contains(&record.bot)
    }
}

/// Resolve a possibly partial date selection into a concrete range.
///
/// Bounds the caller left open default to the store's observed date bounds;
/// needing those bounds from a store whose timestamps are all null is the
/// reportable invalid-date-bounds condition. No selection at all resolves to
/// no date predicate.
pub fn resolve_date_range(
    store: &LogStore,
    since: Option<NaiveDate>,
    until: Option<NaiveDate>,
) -> Result<Option<(NaiveDate, NaiveDate)>, FilterError> {
    if since.is_none() && until.is_none() {
        return Ok(None);
    }
    let range = match (since, until) {
        (Some(start), Some(end)) => (start, end),
        (start, end) => {
            let (min, max) = store.date_bounds().ok_or(FilterError::NoValidTimestamps)?;
            (start.unwrap_or(min), end.unwrap_or(max))
        }
    };
    Ok(Some(range))
}

/// A derived, order-preserving subset of the store.
pub struct FilteredView<'a> {
    records: Vec<&'a LogRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[&'a LogRecord] {
        &self.records
    }

    pub fn summary(&self) -> TrafficSummary {
        summarize(self.records.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bots::BotClassifier;
    use crate::parser::LineParser;

    fn record(line: &str) -> LogRecord {
        let parser = LineParser::new();
        let classifier = BotClassifier::with_defaults();
        parser.normalize(parser.parse_line(line).unwrap(), &classifier)
    }

    fn sample_store() -> LogStore {
        LogStore::new(vec![
            record(r#"1.1.1.1 - - [10/Oct/2023:13:55:36 -0700] "GET / HTTP/1.1" 200 100 "-" "Mozilla/5.0""#),
            record(r#"2.2.2.2 - - [11/Oct/2023:08:00:00 -0700] "POST /api HTTP/1.1" 404 - "-" "Googlebot/2.1""#),
            record(r#"3.3.3.3 - - [bad date] "GET /x HTTP/1.1" 500 20 "-" "Mozilla/5.0""#),
        ])
    }

    #[test]
    fn test_default_criteria_reproduce_store() {
        let store = sample_store();
        let view = FilterCriteria::matching_all(&store).apply(&store);
        assert_eq!(view.len(), store.len());
        for (filtered, original) in view.records().iter().zip(store.records()) {
            assert_eq!(filtered.ip, original.ip);
            assert_eq!(filtered.status, original.status);
        }
    }

    #[test]
    fn test_empty_set_excludes_everything() {
        let store = sample_store();
        let mut criteria = FilterCriteria::matching_all(&store);
        criteria.methods.clear();
        assert!(criteria.apply(&store).is_empty());
    }

    #[test]
    fn test_date_range_excludes_null_timestamps() {
        let store = sample_store();
        let mut criteria = FilterCriteria::matching_all(&store);
        criteria.date_range = Some((
            NaiveDate::from_ymd_opt(2023, 10, 10).unwrap(),
            NaiveDate::from_ymd_opt(2023, 10, 11).unwrap(),
        ));
        let view = criteria.apply(&store);
        // the bad-date record is excluded from any date-bounded view
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let store = sample_store();
        let mut criteria = FilterCriteria::matching_all(&store);
        let day = NaiveDate::from_ymd_opt(2023, 10, 11).unwrap();
        criteria.date_range = Some((day, day));
        let view = criteria.apply(&store);
        assert_eq!(view.len(), 1);
        assert_eq!(view.records()[0].ip, "2.2.2.2");
    }

    #[test]
    fn test_resolve_date_range_defaults_open_bounds() {
        let store = sample_store();
        let since = NaiveDate::from_ymd_opt(2023, 10, 11).unwrap();
        let range = resolve_date_range(&store, Some(since), None).unwrap();
        assert_eq!(
            range,
            Some((since, NaiveDate::from_ymd_opt(2023, 10, 11).unwrap()))
        );
    }

    #[test]
    fn test_resolve_date_range_without_selection() {
        let store = sample_store();
        assert_eq!(resolve_date_range(&store, None, None).unwrap(), None);
    }

    #[test]
    fn test_resolve_date_range_fails_without_timestamps() {
        let store = LogStore::new(vec![record(
            r#"1.1.1.1 - - [garbage] "GET / HTTP/1.1" 200 1 "-" "-""#,
        )]);
        let since = NaiveDate::from_ymd_opt(2023, 10, 10).unwrap();
        let result = resolve_date_range(&store, Some(since), None);
        assert!(matches!(result, Err(FilterError::NoValidTimestamps)));
    }

    #[test]
    fn test_view_summary_matches_subset() {
        let store = sample_store();
        let mut criteria = FilterCriteria::matching_all(&store);
        criteria.statuses.remove("200");
        let summary = criteria.apply(&store).summary();
        assert_eq!(summary.total_requests, 2);
        assert_eq!(summary.error_requests, 2);
        assert_eq!(summary.bot_requests, 1);
    }
}
