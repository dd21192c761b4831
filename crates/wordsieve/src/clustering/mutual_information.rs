//! # Bigram Mutual Information Terms
//!
//! With `T` the total bigram mass, the pointwise contribution of the ordered
//! pair `(l, r)` is `(c / T) * log2(c * T / (left(l) * right(r)))`, where `c`
//! is the bigram count and `left` / `right` the edge-corrected unigram counts.
//! Summed over every observed bigram this is the mutual information of the
//! bigram distribution.

use crate::{
    concurrency::par_map_range,
    counting::NgramCounter,
    types::{CountType, TokenId, WSHashMap},
};

/// One MI term; zero whenever any count (or the mass) is not positive.
pub fn mi_term(
    bigram: f64,
    left: f64,
    right: f64,
    mass: f64,
) -> f64 {
    if bigram <= 0.0 || left <= 0.0 || right <= 0.0 || mass <= 0.0 {
        return 0.0;
    }
    (bigram / mass) * (bigram * mass / (left * right)).log2()
}

/// MI terms for every observed bigram, keyed `left -> right -> term`.
///
/// Absent entries read as `0.0`.
#[derive(Debug, Clone, Default)]
pub struct MiTable {
    rows: Vec<WSHashMap<TokenId, f64>>,
}

impl MiTable {
    /// Compute every term from the counter's current counts; rows in parallel.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn from_counter<C: CountType>(counter: &NgramCounter<C>) -> Self {
        let mass = counter.bigram_mass() as f64;
        let upper = counter.ids().last().map_or(0, |id| id + 1);

        let rows = par_map_range(upper, |left| {
            let mut row: WSHashMap<TokenId, f64> = Default::default();
            if !counter.is_present(left) {
                return row;
            }
            let left_count = counter.left_count(left).as_f64();
            for (right, count) in counter.right_contexts(left) {
                let term = mi_term(
                    count.as_f64(),
                    left_count,
                    counter.right_count(right).as_f64(),
                    mass,
                );
                row.insert(right, term);
            }
            row
        });

        Self { rows }
    }

    /// The term for `(left, right)`.
    pub fn get(
        &self,
        left: TokenId,
        right: TokenId,
    ) -> f64 {
        self.rows
            .get(left)
            .and_then(|row| row.get(&right))
            .copied()
            .unwrap_or(0.0)
    }

    /// `(right, term)` for every term with the given left side.
    pub fn row(
        &self,
        left: TokenId,
    ) -> impl Iterator<Item = (TokenId, f64)> + '_ {
        self.rows
            .get(left)
            .into_iter()
            .flat_map(|row| row.iter().map(|(&r, &v)| (r, v)))
    }

    /// Sum of all terms: the mutual information.
    pub fn total(&self) -> f64 {
        self.rows.iter().flat_map(|row| row.values()).sum()
    }
}
