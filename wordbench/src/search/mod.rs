//! Whole-word keyword counting.
//!
//! The layers, leaves first:
//!
//! 1. [`matcher`] finds raw substring occurrences. [`BruteForce`],
//!    [`Library`] and [`Vectorized`] share the [`Matcher`] contract and
//!    report the same offsets, except that [`Vectorized`] only handles
//!    keywords up to 32 bytes in texts of at least 32 bytes.
//! 2. [`boundary`] keeps the occurrences not touching an ASCII letter.
//! 3. [`partition`] runs the filter over the corpus, sequentially or across
//!    contiguous partitions on a dedicated rayon pool.
//! 4. [`engine`] builds the matcher from a [`SearchConfig`](crate::SearchConfig),
//!    picks the path and times the scan.
pub mod boundary;
pub mod engine;
pub mod matcher;
pub mod partition;

pub use boundary::BoundaryFilter;
pub use engine::search;
pub use matcher::{Algorithm, BruteForce, Fallback, Library, Matcher, Vectorized};
pub use partition::{partition_ranges, scan_parallel, scan_sequential};
