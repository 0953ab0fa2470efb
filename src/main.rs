use anyhow::bail;
use clap::Parser;
use codebuff_core::Corpus;
use codebuff_format::metrics::{AccuracyReport, DocumentMetrics};
use codebuff_format::{FormatConfig, Formatted, Formatter, TokenPositionAnalysis, Trainer};
use codebuff_lang::{InputDocument, Language};
use codebuff_similarity::{ClassifierConfig, ClassifierStats, KnnClassifier, DEFAULT_K};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Format a source file in the style learned from a corpus
#[derive(Parser, Debug)]
#[command(name = "codebuff")]
#[command(about = "A statistical code formatter", long_about = None)]
struct Args {
    /// Language of the corpus and the input file
    #[arg(short, long, default_value = "java")]
    lang: String,

    /// Directory of already formatted training files
    #[arg(short, long, required_unless_present = "load_corpus")]
    corpus: Option<PathBuf>,

    /// File to format
    file: PathBuf,

    /// Print accuracy and distance metrics to stderr
    #[arg(long)]
    dbg: bool,

    /// Number of neighbors consulted per decision
    #[arg(short, default_value_t = DEFAULT_K)]
    k: usize,

    /// Save the trained corpus to this snapshot file
    #[arg(long)]
    save_corpus: Option<PathBuf>,

    /// Load the corpus from a snapshot instead of training
    #[arg(long)]
    load_corpus: Option<PathBuf>,

    /// Print a JSON report (output text, metrics, per-token analysis) instead of the text
    #[arg(long)]
    json: bool,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Serialize)]
struct Report<'a> {
    file: String,
    language: &'a str,
    k: usize,
    output: &'a str,
    accuracy: AccuracyReport,
    ws_levenshtein: f32,
    levenshtein: f32,
    doc_diff: f64,
    classify_calls: u64,
    classify_hits: u64,
    nn_calls: u64,
    nn_hits: u64,
    format_ms: u128,
    analysis: &'a [TokenPositionAnalysis],
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting codebuff v{}", env!("CARGO_PKG_VERSION"));

    let lang = Language::by_name(&args.lang)?;
    let corpus = load_or_train(&args, &lang)?;

    if let Some(path) = &args.save_corpus {
        let desc = codebuff_storage::save_corpus(path, &corpus)?;
        info!("Corpus snapshot {} ({} bytes, sha256 {:?})", desc.name, desc.size, desc.checksum);
    }

    let knn = KnnClassifier::new(Arc::new(corpus), ClassifierConfig::with_k(args.k))?;
    let config = FormatConfig {
        diagnostics: args.dbg || args.json,
    };
    let mut formatter = Formatter::new(knn, &lang, config)?;

    let doc = InputDocument::load(&args.file, &lang)?;
    let start = Instant::now();
    let formatted = formatter.format(&doc)?;
    let elapsed = start.elapsed();

    if !args.json {
        println!("{}", formatted.text);
    }
    if !args.dbg && !args.json {
        return Ok(());
    }

    let stats = formatter.stats();
    let metrics = DocumentMetrics::measure(&doc, &formatted.text, lang.front_end());
    let report = Report {
        file: args.file.display().to_string(),
        language: lang.name(),
        k: args.k,
        output: &formatted.text,
        accuracy: AccuracyReport::from_analysis(&formatted.analysis),
        ws_levenshtein: metrics.ws_levenshtein,
        levenshtein: metrics.levenshtein,
        doc_diff: metrics.doc_diff,
        classify_calls: stats.classify_calls(),
        classify_hits: stats.classify_hits(),
        nn_calls: stats.nn_calls(),
        nn_hits: stats.nn_hits(),
        format_ms: elapsed.as_millis(),
        analysis: &formatted.analysis,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, &formatted, &stats);
    }

    Ok(())
}

fn load_or_train(args: &Args, lang: &Language) -> anyhow::Result<Corpus> {
    if let Some(path) = &args.load_corpus {
        info!("Loading corpus snapshot {:?}", path);
        return codebuff_storage::load_corpus(path, lang.name());
    }
    match &args.corpus {
        Some(dir) => Ok(Trainer::train_dir(dir, lang)?),
        None => bail!("either --corpus or --load-corpus is required"),
    }
}

fn print_report(report: &Report<'_>, formatted: &Formatted, stats: &ClassifierStats) {
    eprintln!("num real tokens from 1: {}", formatted.analysis.len());
    eprintln!("{}", report.accuracy);
    eprintln!("Levenshtein distance of ws: {}", report.ws_levenshtein);
    eprintln!("Levenshtein distance: {}", report.levenshtein);
    eprintln!("doc diff: {:.4}", report.doc_diff);
    eprintln!("formatting time {}ms", report.format_ms);
    eprintln!(
        "classify calls {}, hits {} rate {:.6}",
        stats.classify_calls(),
        stats.classify_hits(),
        stats.classify_hit_rate()
    );
    eprintln!(
        "kNN calls {}, hits {} rate {:.6}",
        stats.nn_calls(),
        stats.nn_hits(),
        stats.nn_hit_rate()
    );
}
