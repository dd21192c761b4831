//! # Token Vocabulary

use crate::{
    errors::{WSResult, WordsieveError},
    types::{TokenId, WSHashMap, display_token},
};

/// Bidirectional mapping between byte tokens and dense [`TokenId`]s.
///
/// Ids are assigned in insertion order; a token appears at most once.
#[derive(Debug, Clone, Default)]
pub struct Vocab {
    tokens: Vec<Vec<u8>>,
    index: WSHashMap<Vec<u8>, TokenId>,
}

impl PartialEq for Vocab {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.tokens == other.tokens
    }
}

impl Vocab {
    /// An empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vocabulary from tokens in order.
    ///
    /// A repeated token is a [`WordsieveError::DuplicateEntry`], reporting the
    /// 1-based position of the repeat.
    pub fn from_tokens<I, S>(tokens: I) -> WSResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut vocab = Self::default();
        for (idx, token) in tokens.into_iter().enumerate() {
            let token = token.as_ref();
            if vocab.contains(token) {
                return Err(WordsieveError::DuplicateEntry {
                    entry: display_token(token),
                    line: idx + 1,
                });
            }
            vocab.get_or_insert(token);
        }
        Ok(vocab)
    }

    /// The id of `token`, inserting it at the end if absent.
    pub fn get_or_insert(
        &mut self,
        token: &[u8],
    ) -> TokenId {
        if let Some(&id) = self.index.get(token) {
            return id;
        }
        let id = self.tokens.len();
        self.tokens.push(token.to_vec());
        self.index.insert(token.to_vec(), id);
        id
    }

    /// The id of `token`, if present.
    pub fn lookup(
        &self,
        token: &[u8],
    ) -> Option<TokenId> {
        self.index.get(token).copied()
    }

    /// Is `token` present?
    pub fn contains(
        &self,
        token: &[u8],
    ) -> bool {
        self.index.contains_key(token)
    }

    /// The token for `id`.
    ///
    /// ## Panics
    /// Panics if `id` was never assigned.
    pub fn token(
        &self,
        id: TokenId,
    ) -> &[u8] {
        &self.tokens[id]
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Is the vocabulary empty?
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate `(id, token)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TokenId, &[u8])> {
        self.tokens.iter().map(Vec::as_slice).enumerate()
    }

    /// Length in bytes of the longest token; `0` when empty.
    pub fn max_token_len(&self) -> usize {
        self.tokens.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// A vocabulary holding only the tokens in `used`, in this vocabulary's order.
    ///
    /// Returns the new vocabulary and, for each of its entries, the id the
    /// token had here; suitable for [`crate::math::DenseMatrix::select_rows`].
    /// Tokens in `used` that are not present here are ignored.
    pub fn retain_used<I, S>(
        &self,
        used: I,
    ) -> (Vocab, Vec<TokenId>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut keep = vec![false; self.len()];
        for token in used {
            if let Some(id) = self.lookup(token.as_ref()) {
                keep[id] = true;
            }
        }

        let old_ids: Vec<TokenId> = (0..self.len()).filter(|&id| keep[id]).collect();

        let mut vocab = Vocab::default();
        for &id in &old_ids {
            vocab.get_or_insert(self.token(id));
        }
        (vocab, old_ids)
    }
}
