use rayon::prelude::*;
use std::num::NonZeroUsize;
use std::ops::Range;
use tracing::{debug, trace};

use super::boundary::BoundaryFilter;
use crate::corpus::Corpus;
use crate::errors::SearchResult;
use crate::results::{Match, ScanStats};

/// Partition count used for a parallel run unless configured otherwise
pub const DEFAULT_PARTITIONS: usize = 2;

/// Splits `0..len` into `partitions` contiguous half-open ranges.
///
/// Range `k` is `k*len/n .. (k+1)*len/n`. With two partitions that is
/// `0..len/2` and `len/2..len`, the odd document going to the second range.
/// Ranges may be empty when there are fewer documents than partitions.
pub fn partition_ranges(len: usize, partitions: NonZeroUsize) -> Vec<Range<usize>> {
    let n = partitions.get();
    (0..n).map(|k| (k * len / n)..((k + 1) * len / n)).collect()
}

/// Scans the documents in `range` without reporting.
pub fn scan_range(
    corpus: &Corpus,
    range: Range<usize>,
    filter: &BoundaryFilter<'_>,
    keyword: &[u8],
) -> ScanStats {
    corpus.documents()[range]
        .iter()
        .map(|doc| {
            let stats = filter.scan(doc.content(), keyword);
            trace!("{}: {} matches", doc.name(), stats.matches);
            stats
        })
        .sum()
}

/// Scans every document in corpus order on the calling thread.
///
/// With `report` set, each match is also returned with its context window
/// in discovery order.
pub fn scan_sequential(
    corpus: &Corpus,
    filter: &BoundaryFilter<'_>,
    keyword: &[u8],
    report: bool,
) -> (ScanStats, Vec<Match>) {
    if !report {
        return (scan_range(corpus, 0..corpus.len(), filter, keyword), Vec::new());
    }

    let mut stats = ScanStats::new();
    let mut matches = Vec::new();
    for (index, doc) in corpus.documents().iter().enumerate() {
        let text = doc.content();
        let mut words = filter.find(text, keyword);
        let mut found = 0;
        for offset in words.by_ref() {
            found += 1;
            matches.push(Match {
                document_index: index,
                document: doc.name().to_string(),
                offset,
                context: filter.context(text, offset, keyword.len()).to_vec(),
            });
        }
        stats += ScanStats::for_document(text.len(), words.candidates(), found);
    }
    (stats, matches)
}

/// Scans `partitions` contiguous slices of the corpus concurrently and sums
/// the partial counts.
///
/// The workers run on a dedicated pool with exactly one thread per partition
/// and share nothing but read access to the corpus and matcher. The result
/// is the same as [`scan_sequential`] whatever order the workers finish in.
pub fn scan_parallel(
    corpus: &Corpus,
    filter: &BoundaryFilter<'_>,
    keyword: &[u8],
    partitions: NonZeroUsize,
) -> SearchResult<ScanStats> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(partitions.get())
        .thread_name(|i| format!("wordbench-worker-{}", i))
        .build()?;

    let ranges = partition_ranges(corpus.len(), partitions);
    debug!("Scanning {} documents in partitions {:?}", corpus.len(), ranges);

    let partials: Vec<ScanStats> = pool.install(|| {
        ranges
            .into_par_iter()
            .with_max_len(1)
            .map(|range| {
                let partial = scan_range(corpus, range.clone(), filter, keyword);
                debug!(
                    "Partition {:?} finished with {} matches",
                    range, partial.matches
                );
                partial
            })
            .collect()
    });

    Ok(partials.into_iter().sum())
}
