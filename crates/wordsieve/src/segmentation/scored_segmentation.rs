//! # Scored Segmentations

use crate::segmentation::scorers::{BOW, SubwordScorer};

/// A segmentation of one word, with its total score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSegmentation<'w> {
    /// The sub-parts, in order; they concatenate to the word.
    pub parts: Vec<&'w [u8]>,

    /// The sum of the scorer's scores along `parts`.
    pub score: f32,
}

impl<'w> ScoredSegmentation<'w> {
    /// Score `parts` with `scorer`, starting from [`BOW`].
    pub fn from_parts<S: SubwordScorer + ?Sized>(
        parts: Vec<&'w [u8]>,
        scorer: &S,
    ) -> Self {
        let mut prev = BOW;
        let mut score = 0.0;
        for &part in &parts {
            score += scorer.score(part, prev);
            prev = part;
        }
        Self { parts, score }
    }

    /// The single-byte segmentation; used when no scored path exists.
    pub fn single_bytes<S: SubwordScorer + ?Sized>(
        word: &'w [u8],
        scorer: &S,
    ) -> Self {
        Self::from_parts(word.chunks(1).collect(), scorer)
    }

    /// Is the segmentation of the empty word?
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// May `word[start..end]` be a sub-part, given the length limit?
pub(crate) fn is_candidate<S: SubwordScorer + ?Sized>(
    subword: &[u8],
    scorer: &S,
    max_len: usize,
) -> bool {
    subword.len() == 1 || (subword.len() <= max_len && scorer.admits(subword))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmentation::scorers::testing::TableScorer;

    #[test]
    fn test_from_parts() {
        let scorer = TableScorer::new(&[("ab", -1.5)], -1.0);
        let word = b"abc".as_slice();

        let seg = ScoredSegmentation::from_parts(vec![&word[..2], &word[2..]], &scorer);
        assert_eq!(seg.score, -2.5);

        let seg = ScoredSegmentation::single_bytes(word, &scorer);
        assert_eq!(seg.parts, vec![b"a".as_slice(), b"b", b"c"]);
        assert_eq!(seg.score, -3.0);

        assert!(ScoredSegmentation::single_bytes(b"", &scorer).is_empty());
    }

    #[test]
    fn test_is_candidate() {
        let scorer = TableScorer::new(&[("ab", -1.5)], -1.0);
        assert!(is_candidate(b"z", &scorer, 1));
        assert!(is_candidate(b"ab", &scorer, 2));
        assert!(!is_candidate(b"ab", &scorer, 1));
        assert!(!is_candidate(b"zz", &scorer, 2));
    }
}
