//! Web Access Log Analysis Library
//!
//! Parses web-server access logs in the Combined Log Format, classifies
//! crawler traffic, and aggregates the records into reports.
//!
//! ## Pipeline
//!
//! - [`parser`] - source reading (plain or gzip), the tolerant line grammar,
//!   and field normalization
//! - [`bots`] - ordered first-match crawler classification
//! - [`store`] - the in-memory record collection for one ingestion batch
//! - [`filter`] - derived views constrained by date range, status, method
//!   and bot label
//! - [`reports`] - the aggregation query catalog (distributions, time
//!   series, top-N rankings, mean response size)
//! - [`export`] - CSV serialization of a filtered view
//! - [`analyzer`] - the orchestrator tying the pipeline to the CLI
//! - [`display`], [`config`], [`logging`] - presentation and runtime wiring
//!
//! Malformed input is tolerated throughout: lines that fail the grammar are
//! counted and skipped, unparsable timestamps and sizes become nulls, and
//! only batch-level conditions (nothing parsed at all, no usable
//! timestamps) surface as errors.
//!
//! ## Example
//!
//! ```no_run
//! use weblog_analyzer::analyzer::{LogAnalyzer, RunOptions};
//!
//! # fn example() -> anyhow::Result<()> {
//! let analyzer = LogAnalyzer::new();
//! analyzer.run_summary(&["access.log".to_string()], &RunOptions::default())?;
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod bots;
pub mod config;
pub mod display;
pub mod export;
pub mod filter;
pub mod logging;
pub mod models;
pub mod parser;
pub mod reports;
pub mod store;

pub use analyzer::LogAnalyzer;
pub use models::*;
pub use store::LogStore;
