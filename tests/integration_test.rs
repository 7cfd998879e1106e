use anyhow::Result;
use chrono::NaiveDate;
use tempfile::TempDir;

use weblog_analyzer::filter::FilterCriteria;
use weblog_analyzer::parser::{IngestError, LogIngestor};
use weblog_analyzer::{export, reports, LogStore};

mod common;

use common::{write_gzip_log, write_log, SAMPLE_LOG};

const EXTRA_LINE: &str = "203.0.113.9 - - [12/Oct/2023:23:59:01 -0700] \"GET /index.html HTTP/1.1\" 200 612 \"-\" \"YandexBot/3.0\"\n";

fn ingest_sample(dir: &TempDir) -> Result<(LogStore, weblog_analyzer::IngestStats)> {
    let plain = write_log(dir.path(), "access.log", SAMPLE_LOG)?;
    let gz = write_gzip_log(dir.path(), "archive.log.gz", EXTRA_LINE)?;
    let batch = LogIngestor::new().ingest(&[plain, gz])?;
    Ok((LogStore::new(batch.records), batch.stats))
}

#[test]
fn test_ingest_plain_and_gzip_sources() -> Result<()> {
    let dir = TempDir::new()?;
    let (store, stats) = ingest_sample(&dir)?;

    assert_eq!(store.len(), 6);
    assert_eq!(stats.sources.len(), 2);
    assert_eq!(stats.lines, 6);
    assert_eq!(stats.parsed, 6);
    assert_eq!(stats.skipped(), 0);

    // insertion order: first source's lines, then the gzip source
    assert_eq!(store.records()[0].ip, "127.0.0.1");
    assert_eq!(store.records()[5].ip, "203.0.113.9");
    assert_eq!(store.records()[5].bot, "YandexBot");
    Ok(())
}

#[test]
fn test_end_to_end_example_record() -> Result<()> {
    let dir = TempDir::new()?;
    let line = "127.0.0.1 - - [10/Oct/2023:13:55:36 -0700] \"GET /index.html HTTP/1.1\" 200 612 \"-\" \"Mozilla/5.0 (compatible; Googlebot/2.1)\"\n";
    let path = write_log(dir.path(), "one.log", line)?;
    let batch = LogIngestor::new().ingest(&[path])?;

    let record = &batch.records[0];
    assert_eq!(record.ip, "127.0.0.1");
    assert_eq!(record.status, "200");
    assert_eq!(record.size, Some(612));
    assert_eq!(record.method, "GET");
    assert_eq!(record.url, "/index.html");
    assert_eq!(record.protocol.as_deref(), Some("HTTP/1.1"));
    assert_eq!(record.bot, "Googlebot");
    Ok(())
}

#[test]
fn test_unmatched_lines_are_counted_not_stored() -> Result<()> {
    let dir = TempDir::new()?;
    let content = format!("garbage line one\n{}another garbage line\n", SAMPLE_LOG);
    let path = write_log(dir.path(), "messy.log", &content)?;
    let batch = LogIngestor::new().ingest(&[path])?;

    assert_eq!(batch.records.len(), 5);
    assert_eq!(batch.stats.lines, 7);
    assert_eq!(batch.stats.skipped(), 2);
    assert_eq!(batch.stats.sources[0].skipped(), 2);
    Ok(())
}

#[test]
fn test_no_records_is_distinct_from_no_sources() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_log(dir.path(), "noise.log", "not a log\nstill not a log\n")?;

    let err = LogIngestor::new().ingest(&[path]).unwrap_err();
    assert!(matches!(err, IngestError::NoRecords { lines: 2 }));

    let err = LogIngestor::new().ingest(&[]).unwrap_err();
    assert!(matches!(err, IngestError::NoSources));
    Ok(())
}

#[test]
fn test_default_filter_reproduces_store() -> Result<()> {
    let dir = TempDir::new()?;
    let (store, _stats) = ingest_sample(&dir)?;

    let view = FilterCriteria::matching_all(&store).apply(&store);
    assert_eq!(view.len(), store.len());
    for (filtered, original) in view.records().iter().zip(store.records()) {
        assert_eq!(filtered.ip, original.ip);
        assert_eq!(filtered.url, original.url);
    }
    Ok(())
}

#[test]
fn test_date_bounded_view_excludes_null_timestamps() -> Result<()> {
    let dir = TempDir::new()?;
    let (store, _stats) = ingest_sample(&dir)?;

    let mut criteria = FilterCriteria::matching_all(&store);
    let day = NaiveDate::from_ymd_opt(2023, 10, 10).unwrap();
    criteria.date_range = Some((day, day));
    let view = criteria.apply(&store);

    assert_eq!(view.len(), 2);
    assert!(view.records().iter().all(|r| r.date() == Some(day)));
    Ok(())
}

#[test]
fn test_reports_over_sample_batch() -> Result<()> {
    let dir = TempDir::new()?;
    let (store, _stats) = ingest_sample(&dir)?;
    let view = FilterCriteria::matching_all(&store).apply(&store);

    let summary = view.summary();
    assert_eq!(summary.total_requests, 6);
    assert_eq!(summary.unique_ips, 4);
    assert_eq!(summary.error_requests, 3);
    assert_eq!(summary.bot_requests, 3);

    let distribution = reports::status_distribution(&view);
    let statuses: Vec<&str> = distribution.iter().map(|c| c.status.as_str()).collect();
    assert_eq!(statuses, vec!["200", "401", "404", "500"]);

    // the broken-timestamp record is visible in distributions but absent
    // from every time-bucketed query
    let over_time = reports::status_over_time(&view);
    let bucketed: u64 = over_time.iter().map(|row| row.count).sum();
    assert_eq!(bucketed, 5);

    let bots = reports::bot_distribution(&view);
    let labels: Vec<&str> = bots.iter().map(|b| b.value.as_str()).collect();
    assert_eq!(labels, vec!["Googlebot", "Bingbot", "YandexBot"]);
    Ok(())
}

#[test]
fn test_csv_export_of_filtered_view() -> Result<()> {
    let dir = TempDir::new()?;
    let (store, _stats) = ingest_sample(&dir)?;
    let view = FilterCriteria::matching_all(&store).apply(&store);

    let mut buffer = Vec::new();
    export::write_csv(&view, &mut buffer)?;
    let output = String::from_utf8(buffer)?;
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines.len(), 7);
    assert_eq!(
        lines[0],
        "ip,timestamp,method,url,protocol,status,size,referrer,user_agent,bot"
    );
    assert!(lines[1].starts_with("127.0.0.1,2023-10-10T13:55:36-07:00"));
    // the broken-timestamp record exports with an empty timestamp cell
    assert!(lines[5].starts_with("10.1.1.5,,GET,/weird"));
    Ok(())
}
