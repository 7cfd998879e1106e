//! Analysis Engine
//!
//! [`LogAnalyzer`] coordinates the full pipeline for one invocation:
//! expand the input paths, ingest every source into a fresh [`LogStore`]
//! (each run owns its batch), derive the filtered view
//! from the CLI options, then dispatch to the requested summary, report or
//! export.

use crate::config::get_config;
use crate::display::DisplayManager;
use crate::export;
use crate::filter::{resolve_date_range, FilterCriteria, FilteredView};
use crate::models::{IngestStats, RecordField};
use crate::parser::{expand_inputs, LogIngestor};
use crate::reports;
use crate::store::LogStore;
use anyhow::Result;
use chrono::NaiveDate;
use clap::ValueEnum;
use std::path::Path;
use tracing::info;

/// Options shared by every analysis command, carried from the CLI.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub json_output: bool,
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    pub statuses: Vec<String>,
    pub methods: Vec<String>,
    pub bots: Vec<String>,
    pub top: Option<usize>,
}

/// The aggregation-query catalog as exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Count of requests per distinct status code
    Status,
    /// Daily counts per status code
    StatusOverTime,
    /// Count of requests per HTTP method
    Methods,
    /// Count of requests per crawler, excluding non-bot traffic
    Bots,
    /// Requests per hour across the observed span
    Hourly,
    /// Status distribution restricted to 4xx/5xx
    Errors,
    /// Daily 4xx/5xx counts per status code
    ErrorsOverTime,
    /// Mean response size, overall and per day
    Sizes,
    /// Most requested URLs with daily activity
    TopUrls,
    /// Most active client IPs with daily activity
    TopIps,
    /// Most frequent user agents with daily activity
    TopAgents,
    /// Most frequent referrers with daily activity
    TopReferrers,
}

pub struct LogAnalyzer {
    display: DisplayManager,
}

impl Default for LogAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogAnalyzer {
    pub fn new() -> Self {
        Self {
            display: DisplayManager::new(),
        }
    }

    /// Ingest the given inputs into a fresh store.
    pub fn load(&self, inputs: &[String]) -> Result<(LogStore, IngestStats)> {
        let paths = expand_inputs(inputs);
        let batch = LogIngestor::new().ingest(&paths)?;
        info!(
            sources = batch.stats.sources.len(),
            records = batch.records.len(),
            skipped = batch.stats.skipped(),
            "ingestion complete"
        );
        Ok((LogStore::new(batch.records), batch.stats))
    }

    /// Build filter criteria from the store's defaults and the options.
    fn criteria(&self, store: &LogStore, options: &RunOptions) -> Result<FilterCriteria> {
        let mut criteria = FilterCriteria::matching_all(store);
        criteria.date_range = resolve_date_range(store, options.since, options.until)?;
        if !options.statuses.is_empty() {
            criteria.statuses = options.statuses.iter().cloned().collect();
        }
        if !options.methods.is_empty() {
            criteria.methods = options.methods.iter().cloned().collect();
        }
        if !options.bots.is_empty() {
            criteria.bots = options.bots.iter().cloned().collect();
        }
        Ok(criteria)
    }

    pub fn run_summary(&self, inputs: &[String], options: &RunOptions) -> Result<()> {
        let (store, stats) = self.load(inputs)?;
        let view = self.criteria(&store, options)?.apply(&store);
        self.display
            .display_summary(&view.summary(), &stats, options.json_output);
        Ok(())
    }

    pub fn run_report(
        &self,
        inputs: &[String],
        kind: ReportKind,
        options: &RunOptions,
    ) -> Result<()> {
        let (store, _stats) = self.load(inputs)?;
        let view = self.criteria(&store, options)?.apply(&store);
        self.render_report(&view, kind, options);
        Ok(())
    }

    pub fn run_export(
        &self,
        inputs: &[String],
        output: Option<&Path>,
        options: &RunOptions,
    ) -> Result<()> {
        let (store, _stats) = self.load(inputs)?;
        let view = self.criteria(&store, options)?.apply(&store);
        match output {
            Some(path) => {
                export::write_csv_file(&view, path)?;
                info!(path = %path.display(), records = view.len(), "exported filtered view");
            }
            None => export::write_csv(&view, std::io::stdout().lock())?,
        }
        Ok(())
    }

    fn render_report(&self, view: &FilteredView, kind: ReportKind, options: &RunOptions) {
        let json = options.json_output;
        let top_n = options.top.unwrap_or(get_config().reports.top_entries);
        match kind {
            ReportKind::Status => self.display.display_status_counts(
                "Status code distribution",
                &reports::status_distribution(view),
                json,
            ),
            ReportKind::StatusOverTime => self.display.display_status_series(
                "Status codes over time",
                &reports::status_over_time(view),
                json,
            ),
            ReportKind::Methods => self.display.display_value_counts(
                "HTTP method distribution",
                &reports::method_distribution(view),
                json,
            ),
            ReportKind::Bots => self.display.display_value_counts(
                "Crawler distribution",
                &reports::bot_distribution(view),
                json,
            ),
            ReportKind::Hourly => self
                .display
                .display_hourly(&reports::hourly_activity(view), json),
            ReportKind::Errors => self.display.display_status_counts(
                "Error distribution (4xx/5xx)",
                &reports::error_distribution(view),
                json,
            ),
            ReportKind::ErrorsOverTime => self.display.display_status_series(
                "Errors over time",
                &reports::errors_over_time(view),
                json,
            ),
            ReportKind::Sizes => self.display.display_sizes(
                reports::mean_size(view),
                &reports::mean_size_over_time(view),
                json,
            ),
            ReportKind::TopUrls => self.render_top(view, RecordField::Url, top_n, json),
            ReportKind::TopIps => self.render_top(view, RecordField::Ip, top_n, json),
            ReportKind::TopAgents => self.render_top(view, RecordField::UserAgent, top_n, json),
            ReportKind::TopReferrers => self.render_top(view, RecordField::Referrer, top_n, json),
        }
    }

    fn render_top(&self, view: &FilteredView, field: RecordField, n: usize, json: bool) {
        let report = reports::top_report(view, field, n);
        self.display.display_top_report(field.label(), &report, json);
    }
}
