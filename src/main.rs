use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use concord_align::{AlignConfig, OrderPolicy, SearchStrategy, TieBreak};
use concord_eval::{Candidate, Comparison, MetricKind};
use concord_io::{ColumnMapping, JsonSink, LoadedSource, PairRecord, SourceReader, TableSink, pair_records};

#[derive(Parser)]
#[command(name = "concord")]
#[command(about = "Time-aligned accuracy comparison of 3-D position tracking systems")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Shared alignment parameters.
#[derive(Args, Debug, Clone)]
struct AlignArgs {
    /// Reject unsorted input instead of sorting it
    #[arg(long, default_value_t = false)]
    strict_order: bool,

    /// Which candidate wins when two are equally close: "earlier" or "later"
    #[arg(long, default_value = "earlier")]
    tie_break: String,

    /// Nearest-match search: "sweep" or "binary-search"
    #[arg(long, default_value = "sweep")]
    strategy: String,
}

#[derive(Subcommand)]
enum Command {
    /// Compare two candidate systems against a reference system
    Compare {
        /// Path to the reference CSV file
        #[arg(long)]
        reference: PathBuf,

        /// Path to the first candidate CSV file
        #[arg(long)]
        candidate_a: PathBuf,

        /// Path to the second candidate CSV file
        #[arg(long)]
        candidate_b: PathBuf,

        /// Error metric: "mse" or "mae"
        #[arg(long, default_value = "mse")]
        metric: MetricKind,

        /// Display name of the first candidate
        #[arg(long, default_value = "System 1")]
        name_a: String,

        /// Display name of the second candidate
        #[arg(long, default_value = "System 2")]
        name_b: String,

        /// Reference columns: TIME,X,Y,Z or TIME,X,Y,Z,XRANGE,YRANGE,ZRANGE
        #[arg(long, default_value = "Time,X,Y,Z")]
        reference_columns: ColumnMapping,

        /// First candidate columns: TIME,X,Y,Z
        #[arg(long, default_value = "Time,X,Y,Z")]
        candidate_a_columns: ColumnMapping,

        /// Second candidate columns: TIME,X,Y,Z
        #[arg(long, default_value = "Time,x,y,z")]
        candidate_b_columns: ColumnMapping,

        /// Output format: "table" or "json"
        #[arg(long, default_value = "table")]
        format: String,

        /// Include every aligned pair in JSON output
        #[arg(long, default_value_t = false)]
        include_pairs: bool,

        #[command(flatten)]
        align: AlignArgs,
    },

    /// Align one candidate to a reference and print the matched pairs as JSON
    Align {
        /// Path to the reference CSV file
        #[arg(long)]
        reference: PathBuf,

        /// Path to the candidate CSV file
        #[arg(long)]
        candidate: PathBuf,

        /// Reference columns: TIME,X,Y,Z
        #[arg(long, default_value = "Time,X,Y,Z")]
        reference_columns: ColumnMapping,

        /// Candidate columns: TIME,X,Y,Z
        #[arg(long, default_value = "Time,X,Y,Z")]
        columns: ColumnMapping,

        #[command(flatten)]
        align: AlignArgs,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct AlignOutput {
    n_reference: usize,
    n_candidate: usize,
    n_pairs: usize,
    mean_abs_offset_s: f64,
    max_abs_offset_s: f64,
    n_exact: usize,
    pairs: Vec<PairRecord>,
}

fn parse_tie_break(s: &str) -> Result<TieBreak> {
    match s {
        "earlier" => Ok(TieBreak::EarlierWins),
        "later" => Ok(TieBreak::LaterWins),
        other => anyhow::bail!("unknown tie-break rule: {other} (expected earlier or later)"),
    }
}

fn parse_strategy(s: &str) -> Result<SearchStrategy> {
    match s {
        "sweep" => Ok(SearchStrategy::Sweep),
        "binary-search" => Ok(SearchStrategy::BinarySearch),
        other => anyhow::bail!("unknown search strategy: {other} (expected sweep or binary-search)"),
    }
}

fn parse_format(s: &str) -> Result<OutputFormat> {
    match s {
        "table" => Ok(OutputFormat::Table),
        "json" => Ok(OutputFormat::Json),
        other => anyhow::bail!("unknown output format: {other} (expected table or json)"),
    }
}

fn build_align_config(args: &AlignArgs) -> Result<AlignConfig> {
    let order_policy = if args.strict_order {
        OrderPolicy::Strict
    } else {
        OrderPolicy::Sort
    };
    Ok(AlignConfig::new()
        .with_order_policy(order_policy)
        .with_tie_break(parse_tie_break(&args.tie_break)?)
        .with_strategy(parse_strategy(&args.strategy)?))
}

fn load_source(role: &str, path: &Path, mapping: ColumnMapping) -> Result<LoadedSource> {
    SourceReader::new(path, mapping)
        .read()
        .with_context(|| format!("failed to read {role} dataset {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Compare {
            reference,
            candidate_a,
            candidate_b,
            metric,
            name_a,
            name_b,
            reference_columns,
            candidate_a_columns,
            candidate_b_columns,
            format,
            include_pairs,
            align,
        } => {
            let config = build_align_config(&align)?;
            let format = parse_format(&format)?;
            if include_pairs && format == OutputFormat::Table {
                warn!("--include-pairs only applies to JSON output");
            }

            let reference = load_source("reference", &reference, reference_columns)?;
            let a = load_source(&name_a, &candidate_a, candidate_a_columns)?;
            let b = load_source(&name_b, &candidate_b, candidate_b_columns)?;

            let comparison = Comparison::new(metric).with_align_config(config);
            let candidates = [Candidate::new(&name_a, &a.series), Candidate::new(&name_b, &b.series)];

            match format {
                OutputFormat::Table => {
                    let sink = TableSink::new(std::io::stdout().lock());
                    comparison
                        .run(&reference.series, reference.ranges(), &candidates, sink)
                        .context("comparison failed")?;
                }
                OutputFormat::Json => {
                    let mut sink = JsonSink::new(include_pairs);
                    comparison
                        .run(&reference.series, reference.ranges(), &candidates, &mut sink)
                        .context("comparison failed")?;
                    let document = sink
                        .into_document()
                        .context("comparison produced no table")?;
                    println!("{}", document.to_json_pretty()?);
                }
            }
            info!(metric = metric.short_name(), "comparison complete");
        }

        Command::Align {
            reference,
            candidate,
            reference_columns,
            columns,
            align,
        } => {
            let config = build_align_config(&align)?;

            let reference = load_source("reference", &reference, reference_columns)?;
            let candidate = load_source("candidate", &candidate, columns)?;

            let aligned = config
                .align(&reference.series, &candidate.series)
                .context("alignment failed")?;
            let offsets = aligned
                .offset_summary()
                .context("alignment produced no pairs")?;

            let output = AlignOutput {
                n_reference: reference.n_samples(),
                n_candidate: candidate.n_samples(),
                n_pairs: aligned.len(),
                mean_abs_offset_s: offsets.mean_abs_secs,
                max_abs_offset_s: offsets.max_abs_secs,
                n_exact: offsets.n_exact,
                pairs: pair_records(&aligned),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
