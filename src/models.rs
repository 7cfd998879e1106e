//! Core Data Models
//!
//! Data structures for the access-log analysis pipeline.
//!
//! ## Data Flow
//!
//! 1. **Raw Data**: [`RawRecord`] - the nine string fields exactly as matched
//!    from one log line
//! 2. **Normalization**: [`LogRecord`] - typed record with coerced timestamp
//!    and size plus the derived bot label
//! 3. **Reports**: [`StatusCount`], [`ValueCount`], [`HourlyCount`] and the
//!    other row types - one schema per aggregation query
//!
//! All report rows support serialization for `--json` output.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::path::PathBuf;

/// One log line as matched by the grammar, before any type coercion.
///
/// Field values are kept exactly as they appeared in the source text so the
/// record can be re-serialized losslessly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub ip: String,
    pub datetime: String,
    pub method: String,
    pub url: Option<String>,
    pub protocol: Option<String>,
    pub status: String,
    pub size: String,
    pub referrer: String,
    pub user_agent: String,
}

impl RawRecord {
    /// Re-serialize the nine raw fields into canonical line form.
    pub fn to_line(&self) -> String {
        let mut request = self.method.clone();
        if let Some(url) = &self.url {
            request.push(' ');
            request.push_str(url);
        }
        if let Some(protocol) = &self.protocol {
            request.push(' ');
            request.push_str(protocol);
        }
        format!(
            "{} - - [{}] \"{}\" {} {} \"{}\" \"{}\"",
            self.ip, self.datetime, request, self.status, self.size, self.referrer, self.user_agent
        )
    }
}

/// One normalized request record.
///
/// `status` stays text: observed logs carry non-standard decimal-suffixed
/// codes ("200.5") and all downstream logic is prefix comparison.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub ip: String,
    /// Parsed request time with its original timezone offset; `None` when the
    /// datetime field was unparsable (the record is still retained).
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub method: String,
    pub url: String,
    pub protocol: Option<String>,
    pub status: String,
    pub size: Option<u64>,
    pub referrer: String,
    #[serde(rename = "userAgent")]
    pub user_agent: String,
    /// Crawler label, "Other" for presumed human traffic. Assigned once at
    /// ingestion and never recomputed.
    pub bot: String,
}

impl LogRecord {
    /// Whether the status code text marks a client or server error.
    pub fn is_error(&self) -> bool {
        self.status.starts_with('4') || self.status.starts_with('5')
    }

    /// Calendar date of the request in its own timezone offset.
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date_naive())
    }
}

/// Scalar summary of a (filtered) set of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrafficSummary {
    #[serde(rename = "totalRequests")]
    pub total_requests: u64,
    #[serde(rename = "uniqueIps")]
    pub unique_ips: u64,
    #[serde(rename = "errorRequests")]
    pub error_requests: u64,
    #[serde(rename = "botRequests")]
    pub bot_requests: u64,
}

/// Count of records for one distinct status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

/// Count of records for one (day, status) bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyStatusCount {
    pub date: NaiveDate,
    pub status: String,
    pub count: u64,
}

/// Count of records for one distinct field value (method, bot, url, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: u64,
}

/// Count of records for one (day, field value) bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyValueCount {
    pub date: NaiveDate,
    pub value: String,
    pub count: u64,
}

/// Count of records in one hourly bucket. Bucket sequences are contiguous:
/// hours with no traffic are present with a zero count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyCount {
    pub hour: NaiveDateTime,
    pub count: u64,
}

/// Mean response size for one calendar day. `mean_size` is `None` when the
/// day's records all lacked a size value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyMeanSize {
    pub date: NaiveDate,
    #[serde(rename = "meanSize")]
    pub mean_size: Option<f64>,
}

/// Top-N ranking for a record field together with the companion daily
/// activity series restricted to the ranked values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopReport {
    pub ranking: Vec<ValueCount>,
    pub activity: Vec<DailyValueCount>,
}

/// Record fields that support top-N ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Url,
    Ip,
    UserAgent,
    Referrer,
}

impl RecordField {
    pub fn value<'a>(&self, record: &'a LogRecord) -> &'a str {
        match self {
            Self::Url => &record.url,
            Self::Ip => &record.ip,
            Self::UserAgent => &record.user_agent,
            Self::Referrer => &record.referrer,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Url => "URL",
            Self::Ip => "IP",
            Self::UserAgent => "User-Agent",
            Self::Referrer => "Referrer",
        }
    }
}

/// Line accounting for one ingested source file.
#[derive(Debug, Clone, Serialize)]
pub struct SourceStats {
    pub path: PathBuf,
    pub lines: usize,
    pub parsed: usize,
}

impl SourceStats {
    pub fn skipped(&self) -> usize {
        self.lines - self.parsed
    }
}

/// Aggregate line accounting for one ingestion batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestStats {
    pub sources: Vec<SourceStats>,
    pub lines: usize,
    pub parsed: usize,
}

impl IngestStats {
    pub fn skipped(&self) -> usize {
        self.lines - self.parsed
    }

    pub fn record_source(&mut self, stats: SourceStats) {
        self.lines += stats.lines;
        self.parsed += stats.parsed;
        self.sources.push(stats);
    }
}
