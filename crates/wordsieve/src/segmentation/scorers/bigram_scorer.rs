//! # Bigram Language Model Scorer

use crate::{
    segmentation::scorers::SubwordScorer,
    vocab::io::{BigramTable, UnigramStats},
};

/// Scores subwords by add-one smoothed bigram log-probability.
///
/// * `prev` and `subword` both unknown: `-ln(total)`.
/// * only `prev` unknown: `ln(count(subword) / total)`.
/// * otherwise: `ln((count(prev, subword) + 1) / count(prev))`.
///
/// `total` is the unigram mass (the corpus token count). The fully unseen
/// case is a uniform fallback over that mass, not over the vocabulary size;
/// this is a known approximation kept for compatibility with existing
/// statistics and models.
#[derive(Debug, Clone)]
pub struct BigramScorer {
    unigrams: UnigramStats,
    bigrams: BigramTable,
    max_subword_length: usize,
}

impl BigramScorer {
    /// Build a scorer from unigram and bigram statistics.
    pub fn new(
        unigrams: UnigramStats,
        bigrams: BigramTable,
    ) -> Self {
        let max_subword_length = unigrams.counts.keys().map(Vec::len).max().unwrap_or(0);
        log::info!("max unigram length: {max_subword_length}");
        Self {
            unigrams,
            bigrams,
            max_subword_length,
        }
    }

    /// The unigram statistics.
    pub fn unigrams(&self) -> &UnigramStats {
        &self.unigrams
    }

    fn bigram_count(
        &self,
        prev: &[u8],
        subword: &[u8],
    ) -> u64 {
        self.bigrams
            .get(prev)
            .and_then(|row| row.get(subword))
            .copied()
            .unwrap_or(0)
    }
}

impl SubwordScorer for BigramScorer {
    fn score(
        &self,
        subword: &[u8],
        prev: &[u8],
    ) -> f32 {
        // an empty table would make every score `+inf`.
        let total = self.unigrams.total.max(1) as f32;

        match (
            self.unigrams.counts.get(prev),
            self.unigrams.counts.get(subword),
        ) {
            (None, None) => -total.ln(),
            (None, Some(&count)) => (count as f32 / total).ln(),
            (Some(&prev_count), _) => {
                ((self.bigram_count(prev, subword) + 1) as f32 / prev_count as f32).ln()
            }
        }
    }

    fn admits(
        &self,
        subword: &[u8],
    ) -> bool {
        self.unigrams.counts.contains_key(subword)
    }

    fn max_subword_length(&self) -> usize {
        self.max_subword_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        segmentation::scorers::BOW,
        vocab::io::{read_bigram_stats, read_unigram_stats},
    };

    fn scorer(
        unigrams: &str,
        bigrams: &str,
    ) -> BigramScorer {
        BigramScorer::new(
            read_unigram_stats(unigrams.as_bytes()).unwrap(),
            read_bigram_stats(bigrams.as_bytes()).unwrap(),
        )
    }

    #[test]
    fn test_score_cases() {
        let s = scorer("a 10\nb 5\nab 3\n", "a b 2\n");
        let total = 18.0_f32;

        // both unknown.
        assert_eq!(s.score(b"x", b"y"), -total.ln());
        // unknown prev; this is the first-subword case.
        assert_eq!(s.score(b"a", BOW), (10.0 / total).ln());
        // known prev, seen bigram.
        assert_eq!(s.score(b"b", b"a"), (3.0_f32 / 10.0).ln());
        // known prev, unseen bigram or unknown subword.
        assert_eq!(s.score(b"a", b"b"), (1.0_f32 / 5.0).ln());
        assert_eq!(s.score(b"x", b"b"), (1.0_f32 / 5.0).ln());

        assert!(s.admits(b"ab"));
        assert!(!s.admits(b"ba"));
        assert_eq!(s.max_subword_length(), 2);
        assert!(s.uses_context());
    }

    #[test]
    fn test_empty_stats() {
        let s = scorer("", "");
        assert_eq!(s.score(b"x", BOW), 0.0);
        assert_eq!(s.max_subword_length(), 0);
    }
}
