//! # Embeddings

use crate::{
    errors::{WSResult, WordsieveError},
    math::DenseMatrix,
    types::TokenId,
    vocab::Vocab,
};

/// A [`Vocab`] with one dense vector per entry; row `i` belongs to token `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Embeddings {
    vocab: Vocab,
    matrix: DenseMatrix,
}

impl Embeddings {
    /// Pair a vocabulary with its embedding rows.
    pub fn new(
        vocab: Vocab,
        matrix: DenseMatrix,
    ) -> WSResult<Self> {
        if vocab.len() != matrix.rows() {
            return Err(WordsieveError::ShapeMismatch(format!(
                "{} tokens but {} embedding rows",
                vocab.len(),
                matrix.rows()
            )));
        }
        Ok(Self { vocab, matrix })
    }

    /// The vocabulary.
    pub fn vocab(&self) -> &Vocab {
        &self.vocab
    }

    /// The `len x dim` embedding matrix.
    pub fn matrix(&self) -> &DenseMatrix {
        &self.matrix
    }

    /// Number of embedded tokens.
    pub fn len(&self) -> usize {
        self.vocab.len()
    }

    /// Is this empty?
    pub fn is_empty(&self) -> bool {
        self.vocab.is_empty()
    }

    /// The embedding dimension.
    pub fn dim(&self) -> usize {
        self.matrix.cols()
    }

    /// The vector for token id `id`.
    pub fn row(
        &self,
        id: TokenId,
    ) -> &[f32] {
        self.matrix.row(id)
    }

    /// The vector for `token`, if embedded.
    pub fn row_of(
        &self,
        token: &[u8],
    ) -> Option<&[f32]> {
        self.vocab.lookup(token).map(|id| self.matrix.row(id))
    }

    /// Keep only the tokens in `used`, with their rows, in the current order.
    pub fn retain_used<I, S>(
        &self,
        used: I,
    ) -> Embeddings
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let (vocab, old_ids) = self.vocab.retain_used(used);
        Embeddings {
            vocab,
            matrix: self.matrix.select_rows(&old_ids),
        }
    }

    /// Split into the vocabulary and the matrix.
    pub fn into_parts(self) -> (Vocab, DenseMatrix) {
        (self.vocab, self.matrix)
    }
}
