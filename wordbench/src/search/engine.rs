use std::time::Instant;
use tracing::{debug, info, warn};

use super::boundary::BoundaryFilter;
use super::matcher::{Algorithm, BLOCK_WIDTH};
use super::partition::{scan_parallel, scan_sequential};
use crate::config::SearchConfig;
use crate::corpus::Corpus;
use crate::errors::SearchResult;
use crate::results::SearchOutput;

/// Counts whole-word occurrences of `config.keyword` across `corpus`.
///
/// The matcher is chosen by `config.algorithm`. A parallel run splits the
/// corpus into `config.partitions` contiguous ranges; a sequential run is the
/// only one that collects per-match context. `elapsed` covers the scan only.
pub fn search(corpus: &Corpus, config: &SearchConfig) -> SearchResult<SearchOutput> {
    config.validate()?;

    let keyword = config.keyword.as_bytes();
    let matcher = config.algorithm.matcher(config.vectorized_fallback);
    let filter = BoundaryFilter::new(matcher.as_ref()).with_context(config.context_bytes);

    info!(
        "Searching {} documents for '{}' with the {} matcher",
        corpus.len(),
        config.keyword,
        matcher.name()
    );

    if config.algorithm == Algorithm::Vectorized && !config.vectorized_fallback {
        if keyword.len() > BLOCK_WIDTH {
            warn!(
                "Keyword is {} bytes, longer than the {}-byte block; the vectorized matcher will find nothing",
                keyword.len(),
                BLOCK_WIDTH
            );
        }
        let short = corpus
            .documents()
            .iter()
            .filter(|doc| doc.len() < BLOCK_WIDTH)
            .count();
        if short > 0 {
            warn!(
                "{} documents are shorter than {} bytes and will not be searched",
                short, BLOCK_WIDTH
            );
        }
    }

    let partitions = if config.parallel {
        config.partitions.get()
    } else {
        1
    };
    let mut output = SearchOutput::new(config.algorithm, partitions);

    let start = Instant::now();
    if config.parallel {
        if config.print_matches {
            warn!("Match printing is only available in sequential mode");
        }
        output.stats = scan_parallel(corpus, &filter, keyword, config.partitions)?;
    } else {
        let (stats, matches) = scan_sequential(corpus, &filter, keyword, config.print_matches);
        output.stats = stats;
        output.matches = matches;
    }
    output.elapsed = start.elapsed();
    output.total_matches = output.stats.matches;

    debug!(
        "Scanned {} bytes: {} candidates, {} rejected at word boundaries",
        output.stats.bytes, output.stats.candidates, output.stats.rejected
    );
    info!(
        "Search complete. Found {} matches in {:.1} ms",
        output.total_matches,
        output.elapsed_ms()
    );

    Ok(output)
}
