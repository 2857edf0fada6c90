//! Cubridor: query covered/uncovered lines of one source file
//!
//! ## Usage
//!
//! ```bash
//! cubridor src/main.c                 # human-readable partition
//! cubridor src/lib.rs --json          # machine-readable output
//! cubridor src/lib.rs -j 4 --root .   # bounded worker fan-out
//! ```

use clap::Parser;
use cubrir::{CoverageConfig, CoverageReport};
use std::path::PathBuf;
use std::process::ExitCode;

mod error;

use error::CliResult;

/// Query which lines of a source file were covered during test execution
#[derive(Debug, Parser)]
#[command(name = "cubridor", version, about)]
struct Cli {
    /// Source file to query
    file: PathBuf,

    /// Worker count for the decode and export fan-outs
    /// (default: host logical parallelism)
    #[arg(short = 'j', long)]
    workers: Option<usize>,

    /// Root under which coverage artifacts are discovered
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Build-artifacts directory scanned for candidate executables
    /// (relative paths resolve against the root)
    #[arg(long)]
    artifacts_dir: Option<PathBuf>,

    /// Emit the partition as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v: info, -vv: debug)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    let mut config = CoverageConfig::new().with_search_root(&cli.root);
    if let Some(workers) = cli.workers {
        config = config.with_workers(workers);
    }
    if let Some(dir) = &cli.artifacts_dir {
        config = config.with_artifacts_dir(dir);
    }

    let report = cubrir::line_coverage_with(&config, &cli.file)?;
    if cli.json {
        print_json(cli, &report)?;
    } else {
        print_text(cli, &report);
    }
    Ok(())
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json(cli: &Cli, report: &CoverageReport) -> CliResult<()> {
    let doc = serde_json::json!({
        "file": cli.file,
        "covered": report.covered,
        "uncovered": report.uncovered,
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn print_text(cli: &Cli, report: &CoverageReport) {
    println!("{}", cli.file.display());
    println!(
        "  covered ({}): {}",
        report.covered_count(),
        join_lines(&report.covered)
    );
    println!(
        "  uncovered ({}): {}",
        report.uncovered_count(),
        join_lines(&report.uncovered)
    );
}

fn join_lines(lines: &[u32]) -> String {
    if lines.is_empty() {
        return "-".to_string();
    }
    lines
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
