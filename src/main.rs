//! Command-line front end for the extraction pipeline.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use np_surprisal::corpus::{split_corpus, SplitterConfig};
use np_surprisal::pipeline::runner::{vocab_sidecar_path, VocabAccumulator};
use np_surprisal::pipeline::{CorpusPipeline, CsvSink, PipelineConfig, RunSummary};
use np_surprisal::types::{ColumnLayout, SurprisalColumn};
use np_surprisal::vrt::TokenizerConfig;
use np_surprisal::{ExtractionPolicy, ShortSequencePolicy};

/// Input files must carry this extension to be processed.
const CORPUS_EXTENSION: &str = "vrt";

#[derive(Debug, Parser)]
#[command(
    name = "np-surprisal",
    version,
    about = "Extract noun phrases and surprisal metrics from VRT corpus files"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract noun phrases, one CSV row per NP
    Nps(ExtractArgs),
    /// Extract per-sentence surprisal records
    Sentences(ExtractArgs),
    /// Extract per-document surprisal records plus a vocabulary sidecar
    Documents(ExtractArgs),
    /// Split a monolithic corpus file into per-document .vrt files
    Split(SplitArgs),
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Input .vrt files or directories to scan for them
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output CSV path (appended to if it exists)
    #[arg(short, long, default_value = "./out.csv")]
    output: PathBuf,

    /// NP extraction policy
    #[arg(long, value_enum, default_value = "full-subtree")]
    policy: PolicyArg,

    /// Reporting mode for sequences too short to carry transitions
    #[arg(long, value_enum, default_value = "nan-below-three")]
    short_seq: ShortSeqArg,

    /// Surprisal column: "end:N" (N-th from last) or "col:N" (0-based index)
    #[arg(long, default_value = "end:4", value_parser = parse_surprisal_column)]
    surprisal_col: SurprisalColumn,

    /// Process files in parallel (output order is unchanged)
    #[arg(long)]
    parallel: bool,
}

#[derive(Debug, Args)]
struct SplitArgs {
    /// Monolithic corpus file
    input: PathBuf,

    /// Directory for the per-document files
    #[arg(short, long)]
    out_dir: PathBuf,

    /// Keep only documents whose text id contains one of these substrings;
    /// may repeat. Defaults to the rsta/rstb sections.
    #[arg(long = "keep")]
    keep: Vec<String>,

    /// Keep every document regardless of id
    #[arg(long, conflicts_with = "keep")]
    keep_all: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Full reachable subtree of each subject/object noun
    FullSubtree,
    /// Head plus one level of determiner/modifier dependents
    ConstrainedDirect,
    /// Like constrained-direct, but clauses and PPs come in wholesale
    RecursiveClause,
}

impl From<PolicyArg> for ExtractionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::FullSubtree => ExtractionPolicy::FullSubtree,
            PolicyArg::ConstrainedDirect => ExtractionPolicy::ConstrainedDirect,
            PolicyArg::RecursiveClause => ExtractionPolicy::RecursiveClauseExpansion,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ShortSeqArg {
    /// NaN below 3 values
    NanBelowThree,
    /// 0.0 below 2 values
    ZeroBelowTwo,
}

impl From<ShortSeqArg> for ShortSequencePolicy {
    fn from(arg: ShortSeqArg) -> Self {
        match arg {
            ShortSeqArg::NanBelowThree => ShortSequencePolicy::NanBelowThree,
            ShortSeqArg::ZeroBelowTwo => ShortSequencePolicy::ZeroBelowTwo,
        }
    }
}

fn parse_surprisal_column(s: &str) -> std::result::Result<SurprisalColumn, String> {
    let (kind, n) = s
        .split_once(':')
        .ok_or_else(|| format!("expected end:N or col:N, got {s:?}"))?;
    let n: usize = n.parse().map_err(|_| format!("invalid column number {n:?}"))?;
    match kind {
        "end" if n >= 1 => Ok(SurprisalColumn::FromEnd(n)),
        "end" => Err("end offset must be at least 1".to_string()),
        "col" => Ok(SurprisalColumn::Index(n)),
        other => Err(format!("unknown column kind {other:?}")),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    match Cli::parse().command {
        Command::Nps(args) => run_extraction(args, Mode::Nps),
        Command::Sentences(args) => run_extraction(args, Mode::Sentences),
        Command::Documents(args) => run_extraction(args, Mode::Documents),
        Command::Split(args) => run_split(args),
    }
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Nps,
    Sentences,
    Documents,
}

impl Mode {
    fn noun(&self) -> &'static str {
        match self {
            Mode::Nps => "NPs",
            Mode::Sentences => "sentences",
            Mode::Documents => "documents",
        }
    }
}

fn run_extraction(args: ExtractArgs, mode: Mode) -> Result<()> {
    let inputs = collect_inputs(&args.inputs)?;
    if inputs.is_empty() {
        bail!("no .{CORPUS_EXTENSION} files found in the given inputs");
    }

    let config = PipelineConfig::new()
        .with_policy(args.policy.into())
        .with_short_sequence_policy(args.short_seq.into())
        .with_tokenizer(TokenizerConfig::default().with_columns(
            ColumnLayout::default().with_surprisal_column(args.surprisal_col),
        ))
        .with_parallel(args.parallel);
    let pipeline = CorpusPipeline::new(config).context("building pipeline")?;

    let mut sink = CsvSink::open(&args.output)
        .with_context(|| format!("opening output {}", args.output.display()))?;

    let show_bar = inputs.len() >= 2;
    let progress = file_progress(inputs.len());
    let on_file = |path: &std::path::Path, count: usize| {
        let line = format!(
            "Processing file {}... Found {} {}",
            path.display(),
            count,
            mode.noun()
        );
        if show_bar {
            progress.println(line);
            progress.inc(1);
        } else {
            println!("{line}");
        }
    };

    let summary: RunSummary = match mode {
        Mode::Nps => pipeline.run_noun_phrases(&inputs, &mut sink, on_file)?,
        Mode::Sentences => pipeline.run_sentences(&inputs, &mut sink, on_file)?,
        Mode::Documents => {
            let mut vocab = VocabAccumulator::default();
            let summary = pipeline.run_documents(&inputs, &mut sink, &mut vocab, on_file)?;
            let sidecar = vocab_sidecar_path(&args.output);
            vocab
                .write_sidecar(&sidecar)
                .with_context(|| format!("writing {}", sidecar.display()))?;
            summary
        }
    };
    progress.finish_and_clear();

    println!();
    println!("Processing complete:");
    println!("Files processed: {}", summary.files_processed);
    println!("Total {} extracted: {}", mode.noun(), summary.records_written);
    if summary.files_failed > 0 {
        println!("Files skipped after errors: {}", summary.files_failed);
    }
    Ok(())
}

fn run_split(args: SplitArgs) -> Result<()> {
    let config = if args.keep_all {
        SplitterConfig::keep_all()
    } else if args.keep.is_empty() {
        SplitterConfig::default()
    } else {
        SplitterConfig {
            keep_id_substrings: args.keep,
        }
    };

    let report = split_corpus(&args.input, &args.out_dir, &config)
        .with_context(|| format!("splitting {}", args.input.display()))?;

    println!("Files created: {}", report.files_written);
    println!("Skipped (already present): {}", report.skipped_existing);
    println!("Skipped (filtered out): {}", report.skipped_filtered);
    Ok(())
}

/// Expand the given paths to a flat, deterministic list of corpus files.
///
/// Directories contribute their .vrt entries sorted by name; explicit file
/// arguments are taken as given when they carry the corpus extension.
fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(path)
                .with_context(|| format!("reading directory {}", path.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| has_corpus_extension(p))
                .collect();
            entries.sort();
            inputs.extend(entries);
        } else if has_corpus_extension(path) {
            inputs.push(path.clone());
        } else {
            tracing::debug!(path = %path.display(), "skipping non-corpus input");
        }
    }
    Ok(inputs)
}

fn has_corpus_extension(path: &std::path::Path) -> bool {
    path.extension().is_some_and(|ext| ext == CORPUS_EXTENSION)
}

fn file_progress(total: usize) -> ProgressBar {
    if total < 2 {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}")
            .expect("static progress template")
            .progress_chars("=> "),
    );
    bar.set_message("Extracting");
    bar
}
