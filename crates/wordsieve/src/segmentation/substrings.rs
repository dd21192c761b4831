//! # In-Vocabulary Substrings

use core::ops::Range;

use crate::{types::TokenId, vocab::Vocab};

/// One occurrence of a vocabulary entry inside a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstringSpan {
    /// The byte range within the word.
    pub span: Range<usize>,

    /// The vocabulary id of `word[span]`.
    pub id: TokenId,
}

/// Every span of `word` whose bytes are a `vocab` entry, ordered by `(start, end)`.
///
/// Spans longer than `max_len` (when given) are skipped. The same entry may
/// occur at several spans.
pub fn substrings_in_vocab(
    word: &[u8],
    vocab: &Vocab,
    max_len: Option<usize>,
) -> Vec<SubstringSpan> {
    let max_len = max_len.unwrap_or(word.len());
    let mut spans = Vec::new();
    for start in 0..word.len() {
        let stop = word.len().min(start + max_len);
        for end in (start + 1)..=stop {
            if let Some(id) = vocab.lookup(&word[start..end]) {
                spans.push(SubstringSpan {
                    span: start..end,
                    id,
                });
            }
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substrings() {
        let vocab = Vocab::from_tokens(["a", "b", "ab", "aba", "zz"]).unwrap();

        let spans = substrings_in_vocab(b"aba", &vocab, None);
        let found: Vec<(Range<usize>, TokenId)> =
            spans.into_iter().map(|s| (s.span, s.id)).collect();
        assert_eq!(
            found,
            vec![(0..1, 0), (0..2, 2), (0..3, 3), (1..2, 1), (2..3, 0)]
        );

        let spans = substrings_in_vocab(b"aba", &vocab, Some(1));
        assert_eq!(spans.len(), 3);

        assert!(substrings_in_vocab(b"", &vocab, None).is_empty());
    }
}
