//! Output Formatting and Display Management
//!
//! Renders summaries and aggregation-query tables either as colored
//! terminal output or, with `--json`, as structured JSON for programmatic
//! consumption.

use crate::models::{
    DailyMeanSize, DailyStatusCount, HourlyCount, IngestStats, StatusCount, TopReport,
    TrafficSummary, ValueCount,
};
use colored::Colorize;

pub struct DisplayManager;

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayManager {
    pub fn new() -> Self {
        Self
    }

    pub fn display_summary(
        &self,
        summary: &TrafficSummary,
        stats: &IngestStats,
        json_output: bool,
    ) {
        if json_output {
            self.print_json(serde_json::json!({
                "summary": summary,
                "ingest": {
                    "sources": stats.sources.len(),
                    "lines": stats.lines,
                    "parsed": stats.parsed,
                    "skipped": stats.skipped(),
                },
            }));
            return;
        }

        self.print_header("Access Log Report - Summary");
        println!(
            "\n{} {} sources • {} lines • {} parsed • {} skipped\n",
            "📥".bright_yellow(),
            stats.sources.len().to_string().bright_white().bold(),
            stats.lines.to_string().bright_white(),
            stats.parsed.to_string().bright_white(),
            stats.skipped().to_string().bright_yellow()
        );
        println!(
            "   Total requests:  {}",
            summary.total_requests.to_string().bright_white().bold()
        );
        println!(
            "   Unique IPs:      {}",
            summary.unique_ips.to_string().bright_white().bold()
        );
        println!(
            "   Error requests:  {}",
            summary.error_requests.to_string().bright_red().bold()
        );
        println!(
            "   Bot requests:    {}",
            summary.bot_requests.to_string().bright_magenta().bold()
        );
    }

    pub fn display_status_counts(&self, title: &str, counts: &[StatusCount], json_output: bool) {
        if json_output {
            self.print_json(serde_json::json!({"statusCounts": counts}));
            return;
        }

        self.print_header(title);
        println!();
        for row in counts {
            println!(
                "   {}: {}",
                row.status.bright_cyan(),
                row.count.to_string().bright_white().bold()
            );
        }
    }

    pub fn display_status_series(
        &self,
        title: &str,
        series: &[DailyStatusCount],
        json_output: bool,
    ) {
        if json_output {
            self.print_json(serde_json::json!({"statusSeries": series}));
            return;
        }

        self.print_header(title);
        println!();
        for row in series {
            println!(
                "   {} {}: {}",
                row.date.to_string().bright_blue(),
                row.status.bright_cyan(),
                row.count.to_string().bright_white().bold()
            );
        }
    }

    pub fn display_value_counts(&self, title: &str, counts: &[ValueCount], json_output: bool) {
        if json_output {
            self.print_json(serde_json::json!({"valueCounts": counts}));
            return;
        }

        self.print_header(title);
        println!();
        for row in counts {
            println!(
                "   {}: {}",
                row.value.bright_cyan(),
                row.count.to_string().bright_white().bold()
            );
        }
    }

    pub fn display_top_report(&self, label: &str, report: &TopReport, json_output: bool) {
        if json_output {
            self.print_json(serde_json::json!({"topReport": report}));
            return;
        }

        self.print_header(&format!("Top {} values", label));
        println!();
        for (rank, row) in report.ranking.iter().enumerate() {
            println!(
                "   {}. {}: {}",
                (rank + 1).to_string().bright_yellow(),
                row.value.bright_cyan(),
                row.count.to_string().bright_white().bold()
            );
        }
        if !report.activity.is_empty() {
            println!("\n{} Daily activity:", "📅".bright_blue());
            for row in &report.activity {
                println!(
                    "   {} {}: {}",
                    row.date.to_string().bright_blue(),
                    row.value.bright_cyan(),
                    row.count.to_string().bright_white()
                );
            }
        }
    }

    pub fn display_hourly(&self, series: &[HourlyCount], json_output: bool) {
        if json_output {
            self.print_json(serde_json::json!({"hourly": series}));
            return;
        }

        self.print_header("Requests per hour");
        println!();
        for row in series {
            println!(
                "   {}: {}",
                row.hour.format("%Y-%m-%d %H:00").to_string().bright_blue(),
                row.count.to_string().bright_white().bold()
            );
        }
    }

    pub fn display_sizes(
        &self,
        mean: Option<f64>,
        series: &[DailyMeanSize],
        json_output: bool,
    ) {
        if json_output {
            self.print_json(serde_json::json!({"meanSize": mean, "meanSizeSeries": series}));
            return;
        }

        self.print_header("Mean response size");
        println!();
        match mean {
            Some(mean) => println!(
                "   Overall: {} bytes",
                format!("{:.2}", mean).bright_green().bold()
            ),
            None => println!("   Overall: {}", "no size data".bright_yellow()),
        }
        for row in series {
            match row.mean_size {
                Some(mean) => println!(
                    "   {}: {} bytes",
                    row.date.to_string().bright_blue(),
                    format!("{:.2}", mean).bright_green()
                ),
                None => println!(
                    "   {}: {}",
                    row.date.to_string().bright_blue(),
                    "-".bright_yellow()
                ),
            }
        }
    }

    fn print_header(&self, title: &str) {
        println!("\n{}", "=".repeat(80).bright_cyan());
        println!("{}", title.bright_white().bold());
        println!("{}", "=".repeat(80).bright_cyan());
    }

    fn print_json(&self, value: serde_json::Value) {
        match serde_json::to_string_pretty(&value) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing output to JSON: {}", e),
        }
    }
}
