//! Access-log parsing and batch ingestion.
//!
//! One anchored pattern covers the Combined Log Format variant this tool
//! accepts. Lines that fail the grammar are counted and skipped, never
//! surfaced as per-line errors; only batch-level conditions ([`IngestError`])
//! reach the caller.

use crate::bots::BotClassifier;
use crate::models::{IngestStats, LogRecord, RawRecord, SourceStats};
use chrono::DateTime;
use flate2::read::GzDecoder;
use glob::glob;
use regex::Regex;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Timestamp layout of the Combined Log Format, e.g. `10/Oct/2023:13:55:36 -0700`.
const CLF_TIMESTAMP: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Line grammar. URL and protocol are independently optional so that
/// malformed request lines carrying only a method still match. The pattern is
/// anchored at line start; trailing text after the user-agent quote is
/// ignored.
const LINE_PATTERN: &str = concat!(
    r#"^(?P<ip>\S+) \S+ \S+ "#,
    r#"\[(?P<datetime>[^\]]*)\] "#,
    r#""(?P<method>\S+)(?: (?P<url>.*?))?(?: (?P<protocol>HTTP/\d\.\d))?" "#,
    r#"(?P<status>\d{3}(?:\.\d+)?) "#,
    r#"(?P<size>\d+|-) "#,
    r#""(?P<referrer>.*?)" "(?P<user_agent>.*?)""#,
);

/// Batch-level ingestion failures. Per-line mismatches are not errors.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("no log sources to read")]
    NoSources,

    #[error("no records matched the log format across {lines} lines")]
    NoRecords { lines: usize },
}

/// Parses single access-log lines into raw records.
pub struct LineParser {
    pattern: Regex,
}

impl LineParser {
    pub fn new() -> Self {
        Self {
            // The pattern is a compile-time constant; construction cannot fail.
            pattern: Regex::new(LINE_PATTERN).unwrap(),
        }
    }

    /// Match one line against the grammar. `None` means the line is skipped.
    pub fn parse_line(&self, line: &str) -> Option<RawRecord> {
        let captures = self.pattern.captures(line)?;
        Some(RawRecord {
            ip: captures["ip"].to_string(),
            datetime: captures["datetime"].to_string(),
            method: captures["method"].to_string(),
            url: captures.name("url").map(|m| m.as_str().to_string()),
            protocol: captures.name("protocol").map(|m| m.as_str().to_string()),
            status: captures["status"].to_string(),
            size: captures["size"].to_string(),
            referrer: captures["referrer"].to_string(),
            user_agent: captures["user_agent"].to_string(),
        })
    }

    /// Coerce raw fields into a typed record. Coercion failures null the
    /// field; they never drop the record.
    pub fn normalize(&self, raw: RawRecord, classifier: &BotClassifier) -> LogRecord {
        let timestamp = DateTime::parse_from_str(&raw.datetime, CLF_TIMESTAMP).ok();
        let size = match raw.size.as_str() {
            "-" => None,
            text => text.parse::<u64>().ok(),
        };
        let bot = classifier.classify(&raw.user_agent).to_string();
        LogRecord {
            ip: raw.ip,
            timestamp,
            method: raw.method,
            url: raw.url.unwrap_or_default(),
            protocol: raw.protocol,
            status: raw.status,
            size,
            referrer: raw.referrer,
            user_agent: raw.user_agent,
            bot,
        }
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

/// One fully ingested batch: every record that matched the grammar, in
/// source order, plus line accounting for diagnostics.
pub struct IngestBatch {
    pub records: Vec<LogRecord>,
    pub stats: IngestStats,
}

/// Reads log sources and turns them into normalized, classified records.
pub struct LogIngestor {
    parser: LineParser,
    classifier: BotClassifier,
}

impl LogIngestor {
    pub fn new() -> Self {
        Self {
            parser: LineParser::new(),
            classifier: BotClassifier::with_defaults(),
        }
    }

    /// Ingest every source sequentially into one batch. Unreadable sources
    /// are skipped with a warning; a batch with no parsed records at all is
    /// an explicit error, distinct from having no sources.
    pub fn ingest(&self, paths: &[PathBuf]) -> Result<IngestBatch, IngestError> {
        if paths.is_empty() {
            return Err(IngestError::NoSources);
        }

        let mut records = Vec::new();
        let mut stats = IngestStats::default();

        for path in paths {
            let content = match read_source(path) {
                Ok(content) => content,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable source");
                    continue;
                }
            };

            let mut source = SourceStats {
                path: path.clone(),
                lines: 0,
                parsed: 0,
            };
            for line in content.lines() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                source.lines += 1;
                if let Some(raw) = self.parser.parse_line(line) {
                    records.push(self.parser.normalize(raw, &self.classifier));
                    source.parsed += 1;
                }
            }
            debug!(
                path = %source.path.display(),
                lines = source.lines,
                parsed = source.parsed,
                "ingested source"
            );
            stats.record_source(source);
        }

        if stats.sources.is_empty() {
            return Err(IngestError::NoSources);
        }
        if records.is_empty() {
            return Err(IngestError::NoRecords { lines: stats.lines });
        }
        Ok(IngestBatch { records, stats })
    }
}

impl Default for LogIngestor {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand CLI inputs (paths or glob patterns) into concrete file paths.
/// Inputs matching nothing are logged and dropped.
pub fn expand_inputs(inputs: &[String]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for input in inputs {
        match glob(input) {
            Ok(matches) => {
                let before = paths.len();
                for entry in matches.flatten() {
                    paths.push(entry);
                }
                if paths.len() == before {
                    warn!(input = %input, "input matched no files");
                }
            }
            Err(_) => paths.push(PathBuf::from(input)),
        }
    }
    paths
}

/// Read one source to text. Sources named `*.gz` are gzip-decompressed;
/// invalid UTF-8 byte sequences are replaced rather than failing the batch.
fn read_source(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    let bytes = if is_gzip(path) {
        let mut decoded = Vec::new();
        GzDecoder::new(&bytes[..]).read_to_end(&mut decoded)?;
        decoded
    } else {
        bytes
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}
