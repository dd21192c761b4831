//! # Cosine Similarity Scorer

use crate::{math::cosine_similarity, segmentation::scorers::SubwordScorer, vocab::Embeddings};

/// The score of a single byte with no embedding: a cosine of `-1`, less the bias.
pub const OOV_BYTE_SCORE: f32 = -2.0;

/// Scores the subwords of one word by `cos(word, subword) - 1`.
///
/// Every score is `<= 0`, so each extra split costs something. A subword
/// whose cosine is undefined (a zero vector) scores as a cosine of `-1`.
#[derive(Debug, Clone)]
pub struct CosineScorer<'a> {
    subwords: &'a Embeddings,
    word: &'a [f32],
    max_subword_length: usize,
}

impl<'a> CosineScorer<'a> {
    /// Build a scorer for one word's embedding.
    ///
    /// ## Arguments
    /// * `subwords` - the subword embeddings; must share the word's dimension.
    /// * `word` - the word's embedding.
    /// * `max_subword_length` - the longest subword to admit.
    pub fn new(
        subwords: &'a Embeddings,
        word: &'a [f32],
        max_subword_length: usize,
    ) -> Self {
        Self {
            subwords,
            word,
            max_subword_length,
        }
    }
}

impl SubwordScorer for CosineScorer<'_> {
    fn score(
        &self,
        subword: &[u8],
        _prev: &[u8],
    ) -> f32 {
        match self.subwords.row_of(subword) {
            Some(v) => {
                let cos = cosine_similarity(self.word, v);
                if cos.is_finite() {
                    cos - 1.0
                } else {
                    OOV_BYTE_SCORE
                }
            }
            None if subword.len() == 1 => OOV_BYTE_SCORE,
            None => f32::NEG_INFINITY,
        }
    }

    fn admits(
        &self,
        subword: &[u8],
    ) -> bool {
        self.subwords.vocab().contains(subword)
    }

    fn max_subword_length(&self) -> usize {
        self.max_subword_length
    }

    fn uses_context(&self) -> bool {
        false
    }
}
