use super::matcher::Matcher;
use crate::results::ScanStats;

/// Bytes of context printed on each side of a match
pub const DEFAULT_CONTEXT_BYTES: usize = 20;

/// Word characters are ASCII letters only; digits, punctuation and every
/// non-ASCII byte count as boundaries.
pub fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphabetic()
}

/// Whether the `keyword_len` bytes at `offset` are not glued to a letter on
/// either side.
pub fn is_whole_word(text: &[u8], offset: usize, keyword_len: usize) -> bool {
    let end = offset + keyword_len;
    let clear_before = offset == 0 || !is_word_byte(text[offset - 1]);
    let clear_after = end >= text.len() || !is_word_byte(text[end]);
    clear_before && clear_after
}

/// Turns a [`Matcher`] into an exact-word search.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryFilter<'m> {
    matcher: &'m dyn Matcher,
    context_bytes: usize,
}

impl<'m> BoundaryFilter<'m> {
    pub fn new(matcher: &'m dyn Matcher) -> Self {
        Self {
            matcher,
            context_bytes: DEFAULT_CONTEXT_BYTES,
        }
    }

    pub fn with_context(mut self, context_bytes: usize) -> Self {
        self.context_bytes = context_bytes;
        self
    }

    /// Offsets of every whole-word occurrence of `keyword`, in text order
    pub fn find<'a>(&'a self, text: &'a [u8], keyword: &'a [u8]) -> WordMatches<'a> {
        WordMatches {
            matcher: self.matcher,
            text,
            keyword,
            next_start: 0,
            candidates: 0,
            exhausted: false,
        }
    }

    pub fn count(&self, text: &[u8], keyword: &[u8]) -> usize {
        self.find(text, keyword).count()
    }

    /// Counts matches in one document and records how many raw candidates
    /// were rejected along the way.
    pub fn scan(&self, text: &[u8], keyword: &[u8]) -> ScanStats {
        let mut words = self.find(text, keyword);
        let matches = words.by_ref().count();
        ScanStats::for_document(text.len(), words.candidates(), matches)
    }

    /// The bytes around a match, clamped to the text.
    ///
    /// Pure slicing: multi-byte characters cut at either edge are left as is.
    pub fn context<'t>(&self, text: &'t [u8], offset: usize, keyword_len: usize) -> &'t [u8] {
        let start = offset.saturating_sub(self.context_bytes);
        let end = (offset + keyword_len + self.context_bytes).min(text.len());
        &text[start..end]
    }
}

/// Iterator over whole-word match offsets; see [`BoundaryFilter::find`].
#[derive(Debug)]
pub struct WordMatches<'a> {
    matcher: &'a dyn Matcher,
    text: &'a [u8],
    keyword: &'a [u8],
    next_start: usize,
    candidates: usize,
    exhausted: bool,
}

impl WordMatches<'_> {
    /// Raw candidates pulled from the matcher so far, accepted or not
    pub fn candidates(&self) -> usize {
        self.candidates
    }
}

impl Iterator for WordMatches<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while !self.exhausted {
            let Some(offset) = self.matcher.search(self.text, self.keyword, self.next_start) else {
                self.exhausted = true;
                break;
            };
            self.next_start = offset + 1;
            self.candidates += 1;

            if is_whole_word(self.text, offset, self.keyword.len()) {
                return Some(offset);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::matcher::{Algorithm, BruteForce, Library, Vectorized};

    #[test]
    fn test_only_standalone_word_counts() {
        let text = b"cats category the cat sat";
        for matcher in [&BruteForce as &dyn Matcher, &Library] {
            let filter = BoundaryFilter::new(matcher);
            assert_eq!(filter.count(text, b"cat"), 1);
            assert_eq!(filter.find(text, b"cat").collect::<Vec<_>>(), vec![18]);
        }
    }

    #[test]
    fn test_embedded_substring_never_counts() {
        let filter = BoundaryFilter::new(&BruteForce);
        assert_eq!(filter.count(b"concatenate", b"cat"), 0);
        assert_eq!(filter.count(b"bobcat", b"cat"), 0);
        assert_eq!(filter.count(b"catnip", b"cat"), 0);
    }

    #[test]
    fn test_match_at_start_and_end() {
        let filter = BoundaryFilter::new(&Library);
        assert_eq!(filter.find(b"cat", b"cat").collect::<Vec<_>>(), vec![0]);
        assert_eq!(
            filter.find(b"cat and cat", b"cat").collect::<Vec<_>>(),
            vec![0, 8]
        );
    }

    #[test]
    fn test_non_letters_are_boundaries() {
        let filter = BoundaryFilter::new(&BruteForce);
        assert_eq!(filter.count(b"1cat2 _cat_ (cat) cat's", b"cat"), 4);
        // Non-ASCII letters are not word characters.
        assert_eq!(filter.count("écaté".as_bytes(), b"cat"), 1);
    }

    #[test]
    fn test_rejected_candidate_does_not_stop_scan() {
        let filter = BoundaryFilter::new(&BruteForce);
        let stats = filter.scan(b"category cat catalog cat", b"cat");
        assert_eq!(stats.candidates, 4);
        assert_eq!(stats.rejected, 2);
        assert_eq!(stats.matches, 2);
        assert_eq!(stats.documents, 1);
        assert_eq!(stats.bytes, 24);
    }

    #[test]
    fn test_overlapping_candidates_are_considered() {
        // "aa" at 0 and 1 both touch a letter; the one at 4 stands alone.
        let filter = BoundaryFilter::new(&Library);
        let stats = filter.scan(b"aaa aa", b"aa");
        assert_eq!(stats.candidates, 3);
        assert_eq!(stats.matches, 1);
    }

    #[test]
    fn test_count_is_idempotent() {
        let mut text = "the cat sat on the mat with another cat ".repeat(4);
        text.push_str(&".".repeat(32));
        for algorithm in Algorithm::ALL {
            let matcher = algorithm.matcher(true);
            let filter = BoundaryFilter::new(matcher.as_ref());
            let first = filter.count(text.as_bytes(), b"cat");
            for _ in 0..5 {
                assert_eq!(filter.count(text.as_bytes(), b"cat"), first);
            }
            assert_eq!(first, 8, "{}", algorithm);
        }
    }

    #[test]
    fn test_vectorized_without_fallback_skips_short_text() {
        let filter = BoundaryFilter::new(&Vectorized);
        assert_eq!(filter.count(b"the cat sat", b"cat"), 0);

        let matcher = Algorithm::Vectorized.matcher(true);
        let filter = BoundaryFilter::new(matcher.as_ref());
        assert_eq!(filter.count(b"the cat sat", b"cat"), 1);
    }

    #[test]
    fn test_context_window() {
        let text = b"0123456789abcdefghijKEYWORDjihgfedcba9876543210";
        let filter = BoundaryFilter::new(&Library);
        assert_eq!(filter.context(text, 20, 7), &text[..]);

        let filter = filter.with_context(3);
        assert_eq!(filter.context(text, 20, 7), b"hijKEYWORDjih");
    }

    #[test]
    fn test_context_window_clamps_at_edges() {
        let filter = BoundaryFilter::new(&Library).with_context(5);
        assert_eq!(filter.context(b"cat sat", 0, 3), b"cat sat");
        assert_eq!(filter.context(b"the big cat", 8, 3), b" big cat");
    }

    #[test]
    fn test_is_whole_word() {
        assert!(is_whole_word(b"cat", 0, 3));
        assert!(is_whole_word(b" cat ", 1, 3));
        assert!(!is_whole_word(b"xcat", 1, 3));
        assert!(!is_whole_word(b"catx", 0, 3));
        assert!(is_whole_word(b"9cat9", 1, 3));
    }
}
