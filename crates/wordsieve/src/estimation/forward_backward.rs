//! # Forward-Backward Expected Counts
//!
//! For one word under a [`LogitScorer`]:
//!
//! ```text
//! fw[0] = 0,  fw[e] = lse_{b < e} fw[b] + lp(word[b..e])
//! bw[N] = 0,  bw[b] = lse_{e > b} lp(word[b..e]) + bw[e]
//! ```
//!
//! The expected log-count of a span is `fw[b] + lp + bw[e]`; spans of the
//! same subword are combined with log-sum-exp, and the per-subword values
//! are then normalized to a distribution.

use crate::{
    math::{log_add_exp, log_sum_exp},
    segmentation::scorers::LogitScorer,
    types::{TokenId, WSHashMap},
};

/// Expected subword counts for one word.
#[derive(Debug, Clone, PartialEq)]
pub struct WordPosterior {
    /// `(subword id, normalized expected log-count)`, in first-occurrence order.
    pub log_counts: Vec<(TokenId, f32)>,

    /// `fw[N]`: the word's log-likelihood.
    pub log_likelihood: f32,
}

/// The forward and backward tables of one word.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardBackward {
    /// `fw[0..=N]`.
    pub forward: Vec<f32>,

    /// `bw[0..=N]`.
    pub backward: Vec<f32>,
}

impl ForwardBackward {
    /// Run both passes.
    ///
    /// Edges are exactly the in-vocabulary spans the scorer knows; a position
    /// no edge reaches is `-inf`, and so is `fw[N]` for a word the subword
    /// vocabulary cannot cover.
    pub fn compute(
        word: &[u8],
        scorer: &LogitScorer,
    ) -> Self {
        let n = word.len();
        let edges: Vec<(usize, usize, f32)> = scorer
            .spans()
            .iter()
            .filter_map(|s| {
                scorer
                    .logprob(s.id)
                    .map(|lp| (s.span.start, s.span.end, lp))
            })
            .collect();

        // edges are ordered by start, so every edge into `b` is folded in
        // before the first edge out of `b` reads it.
        let mut forward = vec![f32::NEG_INFINITY; n + 1];
        forward[0] = 0.0;
        for &(b, e, lp) in &edges {
            forward[e] = log_add_exp(forward[e], forward[b] + lp);
        }

        let mut backward = vec![f32::NEG_INFINITY; n + 1];
        backward[n] = 0.0;
        for &(b, e, lp) in edges.iter().rev() {
            backward[b] = log_add_exp(backward[b], lp + backward[e]);
        }

        Self { forward, backward }
    }

    /// `fw[N]`.
    pub fn log_likelihood(&self) -> f32 {
        self.forward.last().copied().unwrap_or(0.0)
    }
}

/// The normalized expected log-count of every distinct in-vocabulary subword of `word`.
pub fn expected_log_counts(
    word: &[u8],
    scorer: &LogitScorer,
) -> WordPosterior {
    let fb = ForwardBackward::compute(word, scorer);

    let mut slots: WSHashMap<TokenId, usize> = Default::default();
    let mut log_counts: Vec<(TokenId, f32)> = Vec::new();
    for s in scorer.spans() {
        let Some(lp) = scorer.logprob(s.id) else {
            continue;
        };
        let value = fb.forward[s.span.start] + lp + fb.backward[s.span.end];
        match slots.get(&s.id) {
            Some(&slot) => {
                log_counts[slot].1 = log_add_exp(log_counts[slot].1, value);
            }
            None => {
                slots.insert(s.id, log_counts.len());
                log_counts.push((s.id, value));
            }
        }
    }

    let values: Vec<f32> = log_counts.iter().map(|&(_, v)| v).collect();
    let lse = log_sum_exp(&values);
    for (_, v) in log_counts.iter_mut() {
        *v -= lse;
    }

    WordPosterior {
        log_counts,
        log_likelihood: fb.log_likelihood(),
    }
}
