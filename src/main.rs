use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use weblog_analyzer::analyzer::{LogAnalyzer, ReportKind, RunOptions};
use weblog_analyzer::logging;

#[derive(Parser)]
#[command(name = "weblog-analyzer")]
#[command(about = "Fast Rust implementation for web server access log analysis and crawler traffic reporting")]
#[command(version = "1.0.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// Log files to analyze (plain text or .gz, glob patterns accepted)
    #[arg(required = true)]
    inputs: Vec<String>,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
    /// Start date filter (YYYY-MM-DD)
    #[arg(long)]
    since: Option<String>,
    /// End date filter (YYYY-MM-DD)
    #[arg(long)]
    until: Option<String>,
    /// Keep only these status codes (repeatable)
    #[arg(long = "status")]
    statuses: Vec<String>,
    /// Keep only these HTTP methods (repeatable)
    #[arg(long = "method")]
    methods: Vec<String>,
    /// Keep only these crawler labels (repeatable)
    #[arg(long = "bot")]
    bots: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show request, IP, error and bot totals for the filtered view
    Summary {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Run one aggregation report
    Report {
        /// Which report to run
        #[arg(value_enum)]
        kind: ReportKind,
        #[command(flatten)]
        common: CommonArgs,
        /// Number of entries for top-* reports
        #[arg(long)]
        top: Option<usize>,
    },
    /// Export the filtered view as CSV
    Export {
        #[command(flatten)]
        common: CommonArgs,
        /// Write CSV to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    logging::init_logging();
    let cli = Cli::parse();
    let analyzer = LogAnalyzer::new();

    match cli.command {
        Commands::Summary { common } => {
            let options = build_options(&common, None);
            match analyzer.run_summary(&common.inputs, &options) {
                Ok(_) => Ok(()),
                Err(e) => handle_error(e, common.json),
            }
        }
        Commands::Report { kind, common, top } => {
            let options = build_options(&common, top);
            match analyzer.run_report(&common.inputs, kind, &options) {
                Ok(_) => Ok(()),
                Err(e) => handle_error(e, common.json),
            }
        }
        Commands::Export { common, output } => {
            let options = build_options(&common, None);
            match analyzer.run_export(&common.inputs, output.as_deref(), &options) {
                Ok(_) => Ok(()),
                Err(e) => handle_error(e, common.json),
            }
        }
    }
}

fn build_options(common: &CommonArgs, top: Option<usize>) -> RunOptions {
    RunOptions {
        json_output: common.json,
        since: common.since.as_deref().map(|s| parse_date(s, common.json)),
        until: common.until.as_deref().map(|s| parse_date(s, common.json)),
        statuses: common.statuses.clone(),
        methods: common.methods.clone(),
        bots: common.bots.clone(),
        top,
    }
}

fn parse_date(text: &str, json: bool) -> chrono::NaiveDate {
    match chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        Ok(date) => date,
        Err(_) => {
            if !json {
                eprintln!("❌ Invalid date format: {}. Use YYYY-MM-DD", text);
            }
            process::exit(1);
        }
    }
}

fn handle_error(e: anyhow::Error, json: bool) -> Result<(), anyhow::Error> {
    if json {
        println!("{{\"error\": \"{}\"}}", e);
    } else {
        eprintln!("Error: {}", e);
    }
    process::exit(1);
}
