//! # Subword Scorers
//!
//! A [`SubwordScorer`] rates choosing one subword, optionally given the
//! subword before it. Higher is better, and every score a scorer returns
//! for one word is on one scale, so decoders can sum them along a path.
//!
//! * [`BigramScorer`] - add-one smoothed subword bigram log-probabilities.
//! * [`CosineScorer`] - per-word cosine similarity to the word's embedding.
//! * [`LogitScorer`] - per-word log-softmax over projected logits.

mod bigram_scorer;
mod cosine_scorer;
mod logit_scorer;

#[doc(inline)]
pub use bigram_scorer::*;
#[doc(inline)]
pub use cosine_scorer::*;
#[doc(inline)]
pub use logit_scorer::*;

/// The synthetic subword preceding the first subword of every word.
pub const BOW: &[u8] = b"<w>";

/// Scores candidate subwords for the segmentation decoders.
pub trait SubwordScorer: Sync {
    /// The score of `subword` following `prev`.
    ///
    /// `prev` is [`BOW`] for the first subword of a word. Single bytes
    /// always get a finite score; `-inf` marks an impossible choice.
    fn score(
        &self,
        subword: &[u8],
        prev: &[u8],
    ) -> f32;

    /// May the multi-byte `subword` be used at all?
    ///
    /// Single bytes are always candidates, whatever this says.
    fn admits(
        &self,
        subword: &[u8],
    ) -> bool;

    /// The longest subword this scorer admits.
    fn max_subword_length(&self) -> usize;

    /// Does [`SubwordScorer::score`] depend on `prev`?
    ///
    /// Decoders keep one best path per position when it does not.
    fn uses_context(&self) -> bool {
        true
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::SubwordScorer;
    use crate::types::WSHashMap;

    /// A context-free scorer over a fixed `subword -> score` table;
    /// unlisted single bytes score `oov`.
    pub struct TableScorer {
        pub scores: WSHashMap<Vec<u8>, f32>,
        pub oov: f32,
    }

    impl TableScorer {
        pub fn new(
            entries: &[(&str, f32)],
            oov: f32,
        ) -> Self {
            Self {
                scores: entries
                    .iter()
                    .map(|&(s, v)| (s.as_bytes().to_vec(), v))
                    .collect(),
                oov,
            }
        }
    }

    impl SubwordScorer for TableScorer {
        fn score(
            &self,
            subword: &[u8],
            _prev: &[u8],
        ) -> f32 {
            match self.scores.get(subword) {
                Some(&v) => v,
                None if subword.len() == 1 => self.oov,
                None => f32::NEG_INFINITY,
            }
        }

        fn admits(
            &self,
            subword: &[u8],
        ) -> bool {
            self.scores.contains_key(subword)
        }

        fn max_subword_length(&self) -> usize {
            self.scores.keys().map(Vec::len).max().unwrap_or(1)
        }

        fn uses_context(&self) -> bool {
            false
        }
    }
}
