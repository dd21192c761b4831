//! # Softmax Logit Scorer

use crate::{
    math::log_sum_exp,
    segmentation::{
        scorers::SubwordScorer,
        substrings::{SubstringSpan, substrings_in_vocab},
    },
    types::{TokenId, WSHashMap},
    vocab::Vocab,
};

/// Scores the subwords of one word by a log-softmax over their logits.
///
/// The softmax runs only over the vocabulary entries that occur as
/// substrings of the word, so the normalization is word-specific. An entry
/// occurring at several spans enters the normalizer once per span. A single
/// byte outside the vocabulary scores `base_logprob`.
#[derive(Debug, Clone)]
pub struct LogitScorer {
    spans: Vec<SubstringSpan>,
    logprobs: WSHashMap<TokenId, f32>,
    by_subword: WSHashMap<Vec<u8>, f32>,
    base_logprob: f32,
    max_subword_length: usize,
}

impl LogitScorer {
    /// Build a scorer for one word.
    ///
    /// ## Arguments
    /// * `word` - the word to be segmented.
    /// * `subwords` - the subword vocabulary.
    /// * `logits` - one logit per subword vocabulary entry.
    /// * `max_subword_length` - the longest subword to consider, if limited.
    /// * `base_logprob` - the score of an out-of-vocabulary single byte.
    pub fn new(
        word: &[u8],
        subwords: &Vocab,
        logits: &[f32],
        max_subword_length: Option<usize>,
        base_logprob: f32,
    ) -> Self {
        let spans = substrings_in_vocab(word, subwords, max_subword_length);

        let relevant: Vec<f32> = spans.iter().map(|s| logits[s.id]).collect();
        let lse = log_sum_exp(&relevant);

        let logprobs: WSHashMap<TokenId, f32> =
            spans.iter().map(|s| (s.id, logits[s.id] - lse)).collect();
        let by_subword = spans
            .iter()
            .map(|s| {
                let lp = logprobs.get(&s.id).copied().unwrap_or(f32::NEG_INFINITY);
                (word[s.span.clone()].to_vec(), lp)
            })
            .collect();

        Self {
            max_subword_length: max_subword_length
                .unwrap_or(word.len())
                .min(word.len()),
            spans,
            logprobs,
            by_subword,
            base_logprob,
        }
    }

    /// Every in-vocabulary span of the word, ordered by `(start, end)`.
    pub fn spans(&self) -> &[SubstringSpan] {
        &self.spans
    }

    /// The normalized log-probability of subword `id`, if it occurs in the word.
    pub fn logprob(
        &self,
        id: TokenId,
    ) -> Option<f32> {
        self.logprobs.get(&id).copied()
    }
}

impl SubwordScorer for LogitScorer {
    fn score(
        &self,
        subword: &[u8],
        _prev: &[u8],
    ) -> f32 {
        match self.by_subword.get(subword) {
            Some(&v) => v,
            None if subword.len() == 1 => self.base_logprob,
            None => f32::NEG_INFINITY,
        }
    }

    fn admits(
        &self,
        subword: &[u8],
    ) -> bool {
        self.by_subword.contains_key(subword)
    }

    fn max_subword_length(&self) -> usize {
        self.max_subword_length
    }

    fn uses_context(&self) -> bool {
        false
    }
}
