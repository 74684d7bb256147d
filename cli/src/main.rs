//! zonestat CLI - layout statistics for manuscript corpora

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use zonestat::corpus::CenturyCensus;
use zonestat::{
    discover_files, Config, DimensionCheck, ErrorMode, MetricSet, RunReport, Scanner, Zonestat,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "zonestat")]
#[command(version)]
#[command(about = "Century-level overlays and trend charts for page-layout corpora", long_about = None)]
struct Cli {
    /// Corpus directory
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Configuration file (JSON)
    #[arg(long, global = true, value_name = "FILE", env = "ZONESTAT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    scan: ScanArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by every scanning command.
#[derive(Args, Clone, Default)]
struct ScanArgs {
    /// Page size validation
    #[arg(long, value_enum)]
    dimension_check: Option<DimensionMode>,

    /// Abort on the first unreadable file
    #[arg(long)]
    strict: bool,

    /// Extension of layout records
    #[arg(long, value_name = "EXT")]
    extension: Option<String>,
}

impl ScanArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(mode) = self.dimension_check {
            config.parse.dimension_check = mode.into();
        }
        if self.strict {
            config.parse.error_mode = ErrorMode::Strict;
        }
        if let Some(ref extension) = self.extension {
            config.extension = extension.clone();
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render overlays, the trend chart and the CSV table
    Run {
        /// Corpus directory
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Render per-century overlay images only
    Overlay {
        /// Corpus directory
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Render the trend chart (and optionally the CSV table) only
    Trends {
        /// Corpus directory
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        scan: ScanArgs,

        /// Tracked metrics (e.g., "main,margin,tokens")
        #[arg(long, value_name = "LIST")]
        metrics: Option<String>,

        /// Polynomial degree of the smoothing fit
        #[arg(long, value_name = "N")]
        degree: Option<usize>,

        /// Also write the per-century table as CSV
        #[arg(long)]
        csv: bool,

        /// Chart file name (.png or .svg)
        #[arg(long, value_name = "FILE")]
        chart: Option<PathBuf>,
    },

    /// Show corpus statistics per century
    Info {
        /// Corpus directory
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,

        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum DimensionMode {
    /// Width and height must be greater than zero (default)
    Positive,
    /// Width and height must only be non-zero
    NonZero,
}

impl From<DimensionMode> for DimensionCheck {
    fn from(mode: DimensionMode) -> Self {
        match mode {
            DimensionMode::Positive => DimensionCheck::Positive,
            DimensionMode::NonZero => DimensionCheck::NonZero,
        }
    }
}

/// Which outputs a run produces.
#[derive(Clone, Copy)]
struct Outputs {
    overlays: bool,
    trends: bool,
}

const ALL_OUTPUTS: Outputs = Outputs {
    overlays: true,
    trends: true,
};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Some(Commands::Run {
            input,
            output,
            scan,
        }) => load_config(config_path, &scan)
            .and_then(|config| cmd_run(&config, input, output, ALL_OUTPUTS)),
        Some(Commands::Overlay {
            input,
            output,
            scan,
        }) => load_config(config_path, &scan).and_then(|config| {
            let outputs = Outputs {
                overlays: true,
                trends: false,
            };
            cmd_run(&config, input, output, outputs)
        }),
        Some(Commands::Trends {
            input,
            output,
            scan,
            metrics,
            degree,
            csv,
            chart,
        }) => load_config(config_path, &scan).and_then(|mut config| {
            if let Some(ref list) = metrics {
                config.trends.metrics = MetricSet::parse(list)?;
            }
            if let Some(degree) = degree {
                config.trends.poly_degree = degree;
            }
            if csv {
                config.trends.save_csv = true;
            }
            if let Some(chart) = chart {
                config.trends.chart_file = chart;
            }
            config.validate()?;
            let outputs = Outputs {
                overlays: false,
                trends: true,
            };
            cmd_run(&config, input, output, outputs)
        }),
        Some(Commands::Info { input, scan }) => {
            load_config(config_path, &scan).and_then(|config| cmd_info(&config, input))
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: full run if an input is known
            if cli.input.is_some() || config_path.is_some() {
                load_config(config_path, &cli.scan)
                    .and_then(|config| cmd_run(&config, cli.input, cli.output, ALL_OUTPUTS))
            } else {
                println!("{}", "Usage: zonestat <INPUT> [OUTPUT]".yellow());
                println!("       zonestat --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn load_config(path: Option<&Path>, scan: &ScanArgs) -> CliResult<Config> {
    let mut config = match path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    scan.apply(&mut config);
    config.validate()?;
    Ok(config)
}

fn resolve_input(input: Option<PathBuf>, config: &Config) -> CliResult<PathBuf> {
    input
        .or_else(|| config.input_dir.clone())
        .ok_or_else(|| "no input directory (pass INPUT or set input_dir in the config)".into())
}

fn file_progress_bar() -> CliResult<ProgressBar> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn cmd_run(
    config: &Config,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    outputs: Outputs,
) -> CliResult<()> {
    let input = resolve_input(input, config)?;
    let output_dir = output.unwrap_or_else(|| config.output_dir.clone());

    let pb = file_progress_bar()?;
    let report = Zonestat::from_config(config)
        .overlays(outputs.overlays)
        .trends(outputs.trends)
        .run_with_progress(&input, &output_dir, |index, total, path| {
            pb.set_length(total as u64);
            pb.set_position(index as u64 + 1);
            pb.set_message(file_label(path));
        })?;
    pb.finish_and_clear();

    print_report(&report);
    Ok(())
}

fn print_report(report: &RunReport) {
    let stats = &report.stats;
    println!(
        "{} {} files, {} documents, {} skipped, {} pages",
        "Scanned".cyan().bold(),
        report.files_discovered,
        stats.documents_accepted,
        stats.files_skipped(),
        stats.pages_accepted
    );

    let files = report.written_files();
    if files.is_empty() {
        println!("{}", "No output written (no usable data)".yellow());
        return;
    }

    println!("\n{}", "Output files:".green().bold());
    for (i, path) in files.iter().enumerate() {
        let branch = if i + 1 == files.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), path.display());
    }
}

fn cmd_info(config: &Config, input: Option<PathBuf>) -> CliResult<()> {
    let input = resolve_input(input, config)?;
    let files = discover_files(&input, &config.extension)?;

    let pb = file_progress_bar()?;
    pb.set_length(files.len() as u64);

    let mut census = CenturyCensus::new();
    let mut scanner = Scanner::new(config.parse.clone());
    for path in &files {
        pb.set_message(file_label(path));
        scanner.scan_file(path, &mut census)?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    let stats = scanner.stats();
    println!("{}", "Corpus Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Directory".bold(), input.display());
    println!("{}: {}", "Files".bold(), stats.files_seen);
    println!("{}: {}", "Documents".bold(), stats.documents_accepted);
    println!("{}: {}", "Unreadable".bold(), stats.files_unreadable);
    println!("{}: {}", "Invalid years".bold(), stats.invalid_years);
    println!("{}: {}", "Pages".bold(), stats.pages_accepted);
    println!("{}: {}", "Rejected pages".bold(), stats.pages_rejected);

    let rows = census.rows();
    if rows.is_empty() {
        return Ok(());
    }

    println!();
    println!("{}", "Centuries".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{:>8} {:>10} {:>10}", "Century".bold(), "Documents".bold(), "Pages".bold());
    for (century, documents, pages) in rows {
        println!("{:>8} {:>10} {:>10}", century.get(), documents, pages);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "zonestat".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Layout statistics for manuscript page corpora");
    println!();
    println!("License: MIT");
}
