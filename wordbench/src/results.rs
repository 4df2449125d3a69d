use std::ops::AddAssign;
use std::time::Duration;

use crate::search::matcher::Algorithm;

/// A whole-word occurrence reported while printing is enabled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Index of the document in the corpus
    pub document_index: usize,
    /// Name of the document the match was found in
    pub document: String,
    /// Byte offset of the first keyword byte
    pub offset: usize,
    /// Raw bytes around the match, keyword included
    pub context: Vec<u8>,
}

/// Counters accumulated while scanning.
///
/// Every worker owns one and they are merged after the join, so the totals
/// do not depend on which worker finished first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Documents scanned
    pub documents: usize,
    /// Bytes of document content scanned
    pub bytes: usize,
    /// Raw substring occurrences returned by the matcher
    pub candidates: usize,
    /// Candidates dropped for touching a letter
    pub rejected: usize,
    /// Whole-word matches
    pub matches: usize,
}

impl ScanStats {
    pub fn new() -> Self {
        Default::default()
    }

    /// Counters for one scanned document; every candidate that is not a
    /// match was rejected.
    pub fn for_document(bytes: usize, candidates: usize, matches: usize) -> Self {
        debug_assert!(matches <= candidates);
        Self {
            documents: 1,
            bytes,
            candidates,
            rejected: candidates - matches,
            matches,
        }
    }

    /// Merges another set of counters into this one
    pub fn merge(&mut self, other: ScanStats) {
        self.documents += other.documents;
        self.bytes += other.bytes;
        self.candidates += other.candidates;
        self.rejected += other.rejected;
        self.matches += other.matches;
    }
}

impl AddAssign for ScanStats {
    fn add_assign(&mut self, other: ScanStats) {
        self.merge(other);
    }
}

impl std::iter::Sum for ScanStats {
    fn sum<I: Iterator<Item = ScanStats>>(iter: I) -> Self {
        iter.fold(ScanStats::new(), |mut acc, s| {
            acc += s;
            acc
        })
    }
}

/// Outcome of one benchmark run
#[derive(Debug, Clone)]
pub struct SearchOutput {
    /// Total whole-word matches across the corpus
    pub total_matches: usize,
    /// Algorithm that produced the count
    pub algorithm: Algorithm,
    /// Number of partitions scanned concurrently, 1 for a sequential run
    pub partitions: usize,
    /// Aggregated scan counters
    pub stats: ScanStats,
    /// Matches in discovery order, only filled by a sequential run with printing
    pub matches: Vec<Match>,
    /// Wall time spent scanning, corpus loading excluded
    pub elapsed: Duration,
}

impl SearchOutput {
    pub fn new(algorithm: Algorithm, partitions: usize) -> Self {
        Self {
            total_matches: 0,
            algorithm,
            partitions,
            stats: ScanStats::new(),
            matches: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    /// The final report line, e.g. `42 in 13.7 ms`
    pub fn summary(&self) -> String {
        format!("{} in {:.1} ms", self.total_matches, self.elapsed_ms())
    }
}
