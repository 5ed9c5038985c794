use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use stemdex_core::{BuildReport, Engine, Language, SearchHit};
use tracing_subscriber::{fmt, EnvFilter};

use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build an in-memory term frequency index and query it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Source {
    /// Directory whose files are indexed (not recursive)
    #[arg(long)]
    docs: PathBuf,
    /// Stop-word file, one word per line
    #[arg(long)]
    stop_words: PathBuf,
    /// Stemming language: english or romanian
    #[arg(long, default_value = "english")]
    language: Language,
    /// Print JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a directory and print the build report
    Build {
        #[command(flatten)]
        source: Source,
    },
    /// Index a directory, then rank its documents for a query
    Search {
        #[command(flatten)]
        source: Source,
        /// Show at most this many documents
        #[arg(long)]
        top: Option<usize>,
        /// Query words
        #[arg(required = true)]
        query: Vec<String>,
    },
}

#[derive(Serialize)]
struct SearchOutput<'a> {
    query: &'a str,
    report: &'a BuildReport,
    results: &'a [SearchHit],
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { source } => {
            let (_, report) = build(&source)?;
            if source.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            Ok(())
        }
        Commands::Search { source, top, query } => {
            let (engine, report) = build(&source)?;
            let query = query.join(" ");
            let mut hits = engine.search(&query);
            if let Some(k) = top {
                hits.truncate(k);
            }
            if source.json {
                let out = SearchOutput { query: &query, report: &report, results: &hits };
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print_hits(&hits);
            }
            Ok(())
        }
    }
}

fn build(source: &Source) -> Result<(Engine, BuildReport)> {
    if !source.docs.is_dir() {
        bail!("{} is not a directory", source.docs.display());
    }
    let engine = Engine::new(source.language);
    let report = engine.build_dir(&source.docs, &source.stop_words)?;
    tracing::info!(language = %source.language, documents = report.documents, "index ready");
    Ok((engine, report))
}

fn print_report(report: &BuildReport) {
    println!("documents indexed: {}", report.documents);
    println!("distinct terms:    {}", report.terms);
    if report.cancelled {
        println!("build was cancelled");
    }
    for skipped in &report.skipped {
        println!("skipped {}: {}", skipped.key, skipped.reason);
    }
}

fn print_hits(hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("no matching documents");
        return;
    }
    // every hit carries the same matched terms, in the same order
    let terms: Vec<&str> = hits[0].counts.iter().map(|c| c.term.as_str()).collect();
    let name_width = hits.iter().map(|h| h.document.len()).chain(["Document name".len()]).max().unwrap_or(0);

    let mut header = format!("{:<name_width$}", "Document name");
    for t in &terms {
        header.push_str(&format!("  {t:>6}"));
    }
    header.push_str(&format!("  {:>6}", "total"));
    println!("{header}");

    for hit in hits {
        let mut row = format!("{:<name_width$}", hit.document);
        for c in &hit.counts {
            row.push_str(&format!("  {:>w$}", c.count, w = c.term.len().max(6)));
        }
        row.push_str(&format!("  {:>6}", hit.score));
        println!("{row}");
    }
}
