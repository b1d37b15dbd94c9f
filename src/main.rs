//! CLI entry point for treesize

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use treesize::{
    ReportOptions, SizeReport, SizeWalker, Strategy, WalkerConfig, logging, print_report,
    print_reports_json,
};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Which traversal to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// List each directory and recurse; unreadable directories count as zero
    #[default]
    Shallow,
    /// One recursive enumeration; any unreadable entry is an error
    Deep,
    /// Run both and print both totals
    Both,
}

impl StrategyArg {
    fn strategies(self) -> &'static [Strategy] {
        match self {
            StrategyArg::Shallow => &[Strategy::Shallow],
            StrategyArg::Deep => &[Strategy::Deep],
            StrategyArg::Both => &[Strategy::Shallow, Strategy::Deep],
        }
    }
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "treesize")]
#[command(about = "Sum the disk usage of a directory tree")]
#[command(version)]
struct Args {
    /// Directory to measure
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Traversal strategy
    #[arg(short = 's', long = "strategy", value_name = "STRATEGY", default_value = "shallow")]
    strategy: StrategyArg,

    /// Print exact byte counts
    #[arg(short = 'b', long = "bytes")]
    bytes: bool,

    /// Show metadata query counters
    #[arg(long = "stats")]
    stats: bool,

    /// Output in JSON format
    #[arg(long = "json")]
    json: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    let root = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(&args.path)
    };

    if !root.exists() {
        eprintln!(
            "treesize: cannot access '{}': No such file or directory",
            args.path.display()
        );
        process::exit(1);
    }
    if !root.is_dir() {
        eprintln!(
            "treesize: cannot access '{}': Not a directory",
            args.path.display()
        );
        process::exit(1);
    }

    let walker = SizeWalker::new(WalkerConfig::default());

    let mut reports = Vec::new();
    for &strategy in args.strategy.strategies() {
        tracing::info!(root = %root.display(), %strategy, "walking");
        let started = Instant::now();
        match walker.walk_with(&root, strategy) {
            Ok(outcome) => {
                reports.push(SizeReport::new(&root, strategy, outcome, started.elapsed()));
            }
            Err(e) => {
                eprintln!("treesize: {} walk failed: {}", strategy, e);
                process::exit(1);
            }
        }
    }

    let result = if args.json {
        print_reports_json(&reports)
    } else {
        print_report(
            &reports,
            ReportOptions {
                use_color: should_use_color(args.color),
                raw_bytes: args.bytes,
                show_stats: args.stats,
            },
        )
    };

    if let Err(e) = result {
        eprintln!("treesize: error writing output: {}", e);
        process::exit(1);
    }
}
