//! linealign - transfer HTML ground-truth labels onto extracted PDF lines
//!
//! `align` runs one algorithm on one document and prints the result with its
//! metrics. `sweep` compares algorithms and thresholds over a corpus, writing
//! each document's records as soon as it completes.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use linealign_core::harness::{
    DocumentSource, JsonDocumentSource, JsonlSink, NullSink, ResultSink, Sweep, run_batch,
};
use linealign_core::{AlgorithmId, AlignConfig, HmmParams, LabelTaxonomy, evaluate, training_rows};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "linealign")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Use debug logging level
    #[arg(short = 'd', long, global = true, action = ArgAction::SetTrue)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Align one document with one algorithm
    Align(AlignArgs),
    /// Compare algorithms and thresholds over many documents
    Sweep(SweepArgs),
}

/// Alignment parameters; flags override values from --config.
#[derive(Args, Debug, Clone)]
struct ConfigArgs {
    /// JSON file with alignment parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum similarity for a confident match (0..1)
    #[arg(short = 't', long)]
    threshold: Option<f64>,

    /// Reward for an unmatched line (<= 0)
    #[arg(long, allow_hyphen_values = true)]
    gap_penalty: Option<f64>,

    /// Penalty for a weak match (<= 0)
    #[arg(long, allow_hyphen_values = true)]
    weak_match_penalty: Option<f64>,

    /// Lower bound of the weak-match band (0..1)
    #[arg(long)]
    weak_match_floor: Option<f64>,

    /// Initial locality window radius, in reference positions
    #[arg(short = 'w', long)]
    locality_window: Option<usize>,

    /// DP band half-width, in reference positions
    #[arg(short = 'b', long)]
    band_width: Option<usize>,

    /// JSON file with HMM start and transition probabilities
    #[arg(long)]
    hmm: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct AlignArgs {
    /// Document JSON file
    document: PathBuf,

    /// Algorithm: baseline, dp, two_pass or hmm
    #[arg(short = 'a', long, default_value = "baseline")]
    algorithm: AlgorithmId,

    /// Print labeled training rows instead of the raw result
    #[arg(long, action = ArgAction::SetTrue)]
    rows: bool,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Args, Debug)]
struct SweepArgs {
    /// Document JSON files
    #[arg(required = true)]
    documents: Vec<PathBuf>,

    /// Comma-separated algorithms (default: all)
    #[arg(short = 'a', long, value_delimiter = ',')]
    algorithms: Vec<AlgorithmId>,

    /// Comma-separated similarity thresholds, none below the weak-match floor
    /// (default: the configured one)
    #[arg(long, value_delimiter = ',')]
    thresholds: Vec<f64>,

    /// JSON Lines file receiving one record per completed document
    #[arg(short = 'o', long)]
    out: Option<PathBuf>,

    /// Worker threads (default: available parallelism)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    #[command(flatten)]
    config: ConfigArgs,
}

fn build_config(args: &ConfigArgs) -> Result<AlignConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open config {}", path.display()))?;
            serde_json::from_reader(io::BufReader::new(file))
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => AlignConfig::default(),
    };

    if let Some(v) = args.threshold {
        config.similarity_threshold = v;
    }
    if let Some(v) = args.gap_penalty {
        config.gap_penalty = v;
    }
    if let Some(v) = args.weak_match_penalty {
        config.weak_match_penalty = v;
    }
    if let Some(v) = args.weak_match_floor {
        config.weak_match_floor = v;
    }
    if let Some(v) = args.locality_window {
        config.locality_window = v;
    }
    if let Some(v) = args.band_width {
        config.band_width = v;
    }

    config.validate()?;
    Ok(config)
}

fn build_hmm(args: &ConfigArgs) -> Result<HmmParams> {
    let Some(path) = &args.hmm else {
        return Ok(HmmParams::default());
    };
    let file =
        File::open(path).with_context(|| format!("failed to open hmm params {}", path.display()))?;
    let params: HmmParams = serde_json::from_reader(io::BufReader::new(file))
        .with_context(|| format!("failed to parse hmm params {}", path.display()))?;
    params.validate()?;
    Ok(params)
}

#[derive(Serialize)]
struct AlignOutput<'a, T: Serialize> {
    result: &'a T,
    metrics: linealign_core::Metrics,
}

fn run_align(args: &AlignArgs) -> Result<()> {
    let config = build_config(&args.config)?;
    let hmm = build_hmm(&args.config)?;
    let aligner = args.algorithm.build(config, hmm)?;

    let source = JsonDocumentSource::new(vec![args.document.clone()]);
    let id = args.document.display().to_string();
    let document = source
        .load(&id)
        .with_context(|| format!("failed to load {}", id))?;
    debug!(document = %document.id, lines = document.lines.len(), "loaded document");

    let result = aligner.align(&document)?;
    let metrics = evaluate(&result, document.references());

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if args.rows {
        let rows = training_rows(&document.lines, &result, &LabelTaxonomy::default())?;
        for row in rows {
            serde_json::to_writer(&mut out, &row)?;
            writeln!(out)?;
        }
    } else {
        serde_json::to_writer_pretty(
            &mut out,
            &AlignOutput {
                result: &result,
                metrics,
            },
        )?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn run_sweep(args: &SweepArgs) -> Result<()> {
    let config = build_config(&args.config)?;
    let hmm = build_hmm(&args.config)?;
    let algorithms = if args.algorithms.is_empty() {
        AlgorithmId::ALL.to_vec()
    } else {
        args.algorithms.clone()
    };
    let sweep = Sweep::new(algorithms, args.thresholds.clone(), config, hmm)?;

    for path in &args.documents {
        if !path.exists() {
            bail!("file not found: {}", path.display());
        }
    }
    let source = JsonDocumentSource::new(args.documents.clone());

    let report = match &args.out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            let mut sink = JsonlSink::new(BufWriter::new(file));
            run_batch(&source, &sweep, &mut sink as &mut dyn ResultSink, args.threads)?
        }
        None => run_batch(&source, &sweep, &mut NullSink, args.threads)?,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write!(out, "{}", report.table.render())?;
    writeln!(
        out,
        "processed: {}  failed: {}",
        report.processed,
        report.failed_count()
    )?;
    for failed in &report.failed {
        writeln!(out, "  {}: {}", failed.id, failed.error)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match &cli.command {
        Command::Align(args) => run_align(args),
        Command::Sweep(args) => run_sweep(args),
    }
}
