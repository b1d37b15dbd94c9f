//! Walk results and how they are printed

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::walker::{QueryStats, Strategy, WalkOutcome};

/// One completed walk, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct SizeReport {
    pub root: PathBuf,
    pub strategy: Strategy,
    pub total_bytes: u64,
    pub total_human: String,
    pub stats: QueryStats,
    pub elapsed_ms: u64,
}

impl SizeReport {
    pub fn new(root: &Path, strategy: Strategy, outcome: WalkOutcome, elapsed: Duration) -> Self {
        Self {
            root: root.to_path_buf(),
            strategy,
            total_bytes: outcome.total_bytes,
            total_human: format_size(outcome.total_bytes),
            stats: outcome.stats,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Text output options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    pub use_color: bool,
    /// Print exact byte counts instead of human-readable sizes
    pub raw_bytes: bool,
    /// Print query counters under each total
    pub show_stats: bool,
}

/// Format a size in bytes to human-readable format.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1}T", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1}G", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1}M", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1}K", bytes as f64 / KB as f64)
    } else {
        format!("{}B", bytes)
    }
}

/// Format a number with thousand separators.
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

/// Print reports to stdout with optional color.
pub fn print_report(reports: &[SizeReport], options: ReportOptions) -> io::Result<()> {
    let color_choice = if options.use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(color_choice);
    write_report(&mut stdout, reports, options)
}

fn write_report<W: WriteColor>(
    out: &mut W,
    reports: &[SizeReport],
    options: ReportOptions,
) -> io::Result<()> {
    let mut size_color = ColorSpec::new();
    size_color.set_fg(Some(Color::Green)).set_bold(true);
    let mut dim = ColorSpec::new();
    dim.set_dimmed(true);

    for report in reports {
        let size = if options.raw_bytes {
            report.total_bytes.to_string()
        } else {
            report.total_human.clone()
        };

        out.set_color(&size_color)?;
        write!(out, "{:<10}", size)?;
        out.reset()?;
        write!(out, "{}", report.root.display())?;

        out.set_color(&dim)?;
        let elapsed = humantime::format_duration(Duration::from_millis(report.elapsed_ms));
        writeln!(out, "  ({}, {})", report.strategy, elapsed)?;
        out.reset()?;

        if options.show_stats {
            let stats = &report.stats;
            writeln!(out, "  entries:       {}", format_number(stats.entries_visited))?;
            writeln!(out, "  kind queries:  {}", format_number(stats.kind_queries))?;
            writeln!(out, "  size queries:  {}", format_number(stats.size_queries))?;
            writeln!(out, "  skipped dirs:  {}", format_number(stats.directories_skipped))?;
        }
    }

    Ok(())
}

/// Print reports as JSON: a single object for one report, an array otherwise.
pub fn print_reports_json(reports: &[SizeReport]) -> io::Result<()> {
    let json = match reports {
        [single] => serde_json::to_string_pretty(single),
        many => serde_json::to_string_pretty(many),
    }
    .map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}
