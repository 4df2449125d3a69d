use memchr::memmem;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::SearchError;

/// Width in bytes of the block compared by [`Vectorized`].
pub const BLOCK_WIDTH: usize = 32;

/// A stateless substring search.
///
/// `search` returns the absolute offset of the first occurrence of `keyword`
/// starting at or after `start`, or `None`. Callers enumerate every candidate
/// by resuming at `offset + 1` after each hit, so overlapping occurrences are
/// all reported. An empty keyword never matches.
///
/// Implementations hold no mutable state and may be shared between threads.
pub trait Matcher: Send + Sync + fmt::Debug {
    fn search(&self, text: &[u8], keyword: &[u8], start: usize) -> Option<usize>;

    /// Whether `search` gives a meaningful answer for this input.
    ///
    /// A matcher that returns `false` here answers `None` from `search`, and
    /// that `None` means "not applicable" rather than "no occurrence".
    fn supports(&self, _text: &[u8], _keyword: &[u8]) -> bool {
        true
    }

    fn name(&self) -> &'static str;
}

/// Byte-at-a-time comparison at every candidate position.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForce;

impl Matcher for BruteForce {
    fn search(&self, text: &[u8], keyword: &[u8], start: usize) -> Option<usize> {
        if keyword.is_empty() || keyword.len() > text.len() {
            return None;
        }

        'candidates: for i in start..=text.len() - keyword.len() {
            for (j, &byte) in keyword.iter().enumerate() {
                if text[i + j] != byte {
                    continue 'candidates;
                }
            }
            return Some(i);
        }
        None
    }

    fn name(&self) -> &'static str {
        "brute-force"
    }
}

/// Delegates to `memchr`'s SIMD-accelerated `memmem` searcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Library;

impl Matcher for Library {
    fn search(&self, text: &[u8], keyword: &[u8], start: usize) -> Option<usize> {
        if keyword.is_empty() {
            return None;
        }
        let haystack = text.get(start..)?;
        memmem::find(haystack, keyword).map(|pos| start + pos)
    }

    fn name(&self) -> &'static str {
        "library"
    }
}

/// Masked 32-byte block compare.
///
/// The keyword is laid into a zero-padded 32-byte lane alongside a mask that
/// is `0xFF` under keyword bytes and `0x00` elsewhere. A window of text
/// matches when `(window ^ lane) & mask` is all zero.
///
/// Only keywords up to [`BLOCK_WIDTH`] bytes in texts of at least
/// [`BLOCK_WIDTH`] bytes are supported; anything else returns `None`.
///
/// Windows never extend past the end of `text`, so the last candidate tried
/// is `text.len() - BLOCK_WIDTH`. An occurrence starting after that point is
/// not reported even though it lies inside the text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vectorized;

impl Vectorized {
    fn lanes(keyword: &[u8]) -> ([u8; BLOCK_WIDTH], [u8; BLOCK_WIDTH]) {
        let mut lane = [0u8; BLOCK_WIDTH];
        let mut mask = [0u8; BLOCK_WIDTH];
        lane[..keyword.len()].copy_from_slice(keyword);
        mask[..keyword.len()].fill(0xFF);
        (lane, mask)
    }
}

impl Matcher for Vectorized {
    fn search(&self, text: &[u8], keyword: &[u8], start: usize) -> Option<usize> {
        if !self.supports(text, keyword) {
            return None;
        }

        let last = text.len() - BLOCK_WIDTH;
        if start > last {
            return None;
        }
        let (lane, mask) = Self::lanes(keyword);

        #[cfg(target_arch = "x86_64")]
        {
            if is_x86_feature_detected!("avx2") {
                return unsafe { search_blocks_avx2(text, &lane, &mask, start, last) };
            }
        }
        search_blocks_portable(text, &lane, &mask, start, last)
    }

    fn supports(&self, text: &[u8], keyword: &[u8]) -> bool {
        !keyword.is_empty() && keyword.len() <= BLOCK_WIDTH && text.len() >= BLOCK_WIDTH
    }

    fn name(&self) -> &'static str {
        "vectorized"
    }
}

fn load_u64(bytes: &[u8], at: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[at..at + 8]);
    u64::from_le_bytes(word)
}

/// Block compare on four 64-bit lanes.
fn search_blocks_portable(
    text: &[u8],
    lane: &[u8; BLOCK_WIDTH],
    mask: &[u8; BLOCK_WIDTH],
    start: usize,
    last: usize,
) -> Option<usize> {
    let lane_words: [u64; 4] = std::array::from_fn(|w| load_u64(lane, w * 8));
    let mask_words: [u64; 4] = std::array::from_fn(|w| load_u64(mask, w * 8));

    (start..=last).find(|&i| {
        let window = &text[i..i + BLOCK_WIDTH];
        let diff = (0..4).fold(0u64, |acc, w| {
            acc | ((load_u64(window, w * 8) ^ lane_words[w]) & mask_words[w])
        });
        diff == 0
    })
}

/// Block compare on one AVX2 register.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn search_blocks_avx2(
    text: &[u8],
    lane: &[u8; BLOCK_WIDTH],
    mask: &[u8; BLOCK_WIDTH],
    start: usize,
    last: usize,
) -> Option<usize> {
    unsafe {
        use std::arch::x86_64::*;

        let keyword_v = _mm256_loadu_si256(lane.as_ptr() as *const __m256i);
        let mask_v = _mm256_loadu_si256(mask.as_ptr() as *const __m256i);

        for i in start..=last {
            let window = &text[i..i + BLOCK_WIDTH];
            let text_v = _mm256_loadu_si256(window.as_ptr() as *const __m256i);
            let diff = _mm256_and_si256(_mm256_xor_si256(text_v, keyword_v), mask_v);
            if _mm256_testz_si256(diff, diff) == 1 {
                return Some(i);
            }
        }
        None
    }
}

/// Uses `primary` wherever it supports the input and `secondary` elsewhere.
///
/// Wrapping [`Vectorized`] this way keeps short documents and long keywords
/// from being silently counted as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fallback<P, S> {
    primary: P,
    secondary: S,
}

impl<P: Matcher, S: Matcher> Fallback<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

impl<P: Matcher, S: Matcher> Matcher for Fallback<P, S> {
    fn search(&self, text: &[u8], keyword: &[u8], start: usize) -> Option<usize> {
        if self.primary.supports(text, keyword) {
            self.primary.search(text, keyword, start)
        } else {
            self.secondary.search(text, keyword, start)
        }
    }

    fn supports(&self, text: &[u8], keyword: &[u8]) -> bool {
        self.primary.supports(text, keyword) || self.secondary.supports(text, keyword)
    }

    fn name(&self) -> &'static str {
        self.primary.name()
    }
}

/// Which [`Matcher`] a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    #[serde(alias = "brute", alias = "stupid")]
    BruteForce,
    #[default]
    #[serde(alias = "regular")]
    Library,
    #[serde(alias = "simd")]
    Vectorized,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Self::BruteForce, Self::Library, Self::Vectorized];

    /// Builds the matcher for this algorithm.
    ///
    /// With `fallback` set, [`Algorithm::Vectorized`] hands inputs it cannot
    /// handle to [`Library`]. Without it the raw block compare is returned.
    pub fn matcher(self, fallback: bool) -> Box<dyn Matcher> {
        match self {
            Self::BruteForce => Box::new(BruteForce),
            Self::Library => Box::new(Library),
            Self::Vectorized if fallback => Box::new(Fallback::new(Vectorized, Library)),
            Self::Vectorized => Box::new(Vectorized),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BruteForce => "brute-force",
            Self::Library => "library",
            Self::Vectorized => "vectorized",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "brute-force" | "brute" | "stupid" => Ok(Self::BruteForce),
            "library" | "regular" => Ok(Self::Library),
            "vectorized" | "simd" => Ok(Self::Vectorized),
            other => Err(SearchError::config_error(format!(
                "Unknown algorithm '{}' (expected brute-force, library or vectorized)",
                other
            ))),
        }
    }
}
