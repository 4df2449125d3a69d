use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use wordbench::{
    search::matcher::Algorithm, search, CliOverrides, Corpus, Match, SearchConfig, SearchOutput,
};

/// Count whole-word occurrences of a keyword across a directory of texts
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Word to count
    #[arg(short = 'k', long)]
    keyword: Option<String>,

    /// Directory holding one subdirectory per document
    #[arg(short = 'd', long)]
    directory: Option<PathBuf>,

    /// Substring search strategy (brute-force|library|vectorized)
    #[arg(short = 'a', long)]
    algorithm: Option<Algorithm>,

    /// Shorthand for --algorithm vectorized
    #[arg(long, conflicts_with_all = ["algorithm", "stupid"])]
    simd: bool,

    /// Shorthand for --algorithm brute-force
    #[arg(long, conflicts_with = "algorithm")]
    stupid: bool,

    /// Split the corpus across worker threads
    #[arg(long)]
    parallel: bool,

    /// Number of partitions in a parallel run (default: 2)
    #[arg(short = 'j', long)]
    partitions: Option<NonZeroUsize>,

    /// Print every match with surrounding context (sequential runs only)
    #[arg(short, long)]
    print: bool,

    /// Bytes of context on each side of a printed match (default: 20)
    #[arg(short = 'C', long)]
    context: Option<usize>,

    /// File read inside each document directory (default: merged.txt)
    #[arg(long)]
    file_name: Option<String>,

    /// Load at most this many documents
    #[arg(long)]
    limit: Option<usize>,

    /// Do not fall back to the library matcher when the vectorized matcher
    /// cannot handle a document
    #[arg(long)]
    no_fallback: bool,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn algorithm(&self) -> Option<Algorithm> {
        if self.simd {
            Some(Algorithm::Vectorized)
        } else if self.stupid {
            Some(Algorithm::BruteForce)
        } else {
            self.algorithm
        }
    }

    /// Only flags that were actually passed become overrides
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            keyword: self.keyword.clone(),
            root_path: self.directory.clone(),
            algorithm: self.algorithm(),
            parallel: self.parallel.then_some(true),
            partitions: self.partitions,
            print_matches: self.print.then_some(true),
            context_bytes: self.context,
            file_name: self.file_name.clone(),
            limit: self.limit,
            vectorized_fallback: self.no_fallback.then_some(false),
            log_level: self.log_level.clone(),
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = SearchConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?
        .merge_with_cli(cli.overrides());
    config.validate()?;
    init_logging(&config.log_level);
    debug!("Running with {:?}", config);

    let corpus = Corpus::load(&config.root_path, &config.file_name, config.limit)
        .with_context(|| format!("failed to load corpus from {}", config.root_path.display()))?;
    info!(
        "Loaded {} documents ({} bytes) from {}",
        corpus.len(),
        corpus.total_bytes(),
        config.root_path.display()
    );

    let output = search(&corpus, &config)?;
    print_search_results(&output)?;
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_search_results(output: &SearchOutput) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_matches(&mut out, &output.matches)?;
    writeln!(out, "{}", output.summary())?;
    out.flush()
}

/// Writes `name: context` per match. Context bytes go out untouched.
fn print_matches(out: &mut impl Write, matches: &[Match]) -> io::Result<()> {
    for m in matches {
        write!(out, "{}: ", m.document.blue())?;
        out.write_all(&m.context)?;
        writeln!(out)?;
    }
    Ok(())
}
