//! # Beam Search Decoding
//!
//! An approximate alternative to [`crate::segmentation::viterbi_segment`].
//! Hypotheses are grouped by the byte position they have consumed; before a
//! position is expanded, hypotheses sharing the same last sub-part are
//! recombined and the group is cut down to the `beam_size` best.
//!
//! With `beam_size >= word.len()` nothing is ever cut, and the result scores
//! the same as the exact search.

use core::cmp::Ordering;

use crate::segmentation::{
    scored_segmentation::{ScoredSegmentation, is_candidate},
    scorers::{BOW, SubwordScorer},
};

#[derive(Debug, Clone, Copy)]
struct Hypothesis {
    score: f32,
    start: usize,
    end: usize,
    prev: Option<usize>,
}

/// The best segmentation of `word` found with a beam of `beam_size`.
///
/// Candidate rules and fallback match [`crate::segmentation::viterbi_segment`].
/// A `beam_size` of `0` is treated as `1`.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(word, scorer)))]
pub fn beam_search_segment<'w, S: SubwordScorer + ?Sized>(
    word: &'w [u8],
    scorer: &S,
    max_subword_length: usize,
    beam_size: usize,
) -> ScoredSegmentation<'w> {
    let n = word.len();
    if n == 0 {
        return ScoredSegmentation {
            parts: Vec::new(),
            score: 0.0,
        };
    }
    let max_len = max_subword_length.max(1);
    let beam_size = beam_size.max(1);
    let contextual = scorer.uses_context();

    // index 0 is the begin-of-word hypothesis.
    let mut arena = vec![Hypothesis {
        score: 0.0,
        start: 0,
        end: 0,
        prev: None,
    }];
    let mut beams: Vec<Vec<usize>> = vec![Vec::new(); n + 1];
    beams[0].push(0);

    for pos in 0..n {
        let mut beam = recombine(&arena, std::mem::take(&mut beams[pos]), pos, contextual);
        if beam.len() > beam_size {
            beam.select_nth_unstable_by(beam_size - 1, |&a, &b| by_score_desc(&arena, a, b));
            beam.truncate(beam_size);
        }

        for h in beam {
            let hyp = arena[h];
            let prev: &[u8] = if h == 0 {
                BOW
            } else {
                &word[hyp.start..hyp.end]
            };

            for end in (pos + 1)..=n.min(pos + max_len) {
                let subword = &word[pos..end];
                if !is_candidate(subword, scorer, max_len) {
                    continue;
                }
                let score = hyp.score + scorer.score(subword, prev);
                if !score.is_finite() {
                    continue;
                }
                beams[end].push(arena.len());
                arena.push(Hypothesis {
                    score,
                    start: pos,
                    end,
                    prev: Some(h),
                });
            }
        }
    }

    let best = beams[n]
        .iter()
        .copied()
        .reduce(|a, b| if arena[b].score > arena[a].score { b } else { a });
    let Some(mut h) = best else {
        log::debug!(
            "beam emptied for {:?}; splitting into bytes",
            String::from_utf8_lossy(word)
        );
        return ScoredSegmentation::single_bytes(word, scorer);
    };

    let score = arena[h].score;
    let mut parts = Vec::new();
    while let Some(p) = arena[h].prev {
        parts.push(&word[arena[h].start..arena[h].end]);
        h = p;
    }
    parts.reverse();

    ScoredSegmentation { parts, score }
}

/// Keep the best hypothesis per last sub-part (or just the best one, for a
/// context-free scorer); ties keep the earlier hypothesis.
fn recombine(
    arena: &[Hypothesis],
    beam: Vec<usize>,
    pos: usize,
    contextual: bool,
) -> Vec<usize> {
    if beam.len() <= 1 {
        return beam;
    }
    let slots = if contextual { pos + 1 } else { 1 };
    let mut best: Vec<Option<usize>> = vec![None; slots];
    for h in beam {
        let slot = if contextual { arena[h].start } else { 0 };
        if best[slot].is_none_or(|b| arena[h].score > arena[b].score) {
            best[slot] = Some(h);
        }
    }
    best.into_iter().flatten().collect()
}

/// Best score first; equal scores keep creation order.
fn by_score_desc(
    arena: &[Hypothesis],
    a: usize,
    b: usize,
) -> Ordering {
    arena[b].score.total_cmp(&arena[a].score).then(a.cmp(&b))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{
        segmentation::{
            scorers::{BigramScorer, testing::TableScorer},
            viterbi_segment,
        },
        vocab::io::{read_bigram_stats, read_unigram_stats},
    };

    #[test]
    fn test_narrow_beam_can_miss() {
        // At position 2 `ab` beats `a b`, but only `b` leads cheaply into `c`.
        let unigrams = read_unigram_stats("a 10\nb 10\nc 10\nab 12\n".as_bytes()).unwrap();
        let bigrams = read_bigram_stats("b c 19\n".as_bytes()).unwrap();
        let scorer = BigramScorer::new(unigrams, bigrams);
        let word = b"abc".as_slice();

        let exact = viterbi_segment(word, &scorer, 2);
        assert_eq!(exact.parts, vec![b"a".as_slice(), b"b", b"c"]);

        let wide = beam_search_segment(word, &scorer, 2, 3);
        assert_eq!(wide.parts, exact.parts);
        assert_eq!(wide.score, exact.score);

        let narrow = beam_search_segment(word, &scorer, 2, 1);
        assert_eq!(narrow.parts, vec![b"ab".as_slice(), b"c"]);
        assert!(narrow.score < exact.score);
    }

    #[test]
    fn test_empty_and_fallback() {
        let scorer = TableScorer::new(&[("q", -1.0)], f32::NEG_INFINITY);
        assert!(beam_search_segment(b"", &scorer, 2, 2).is_empty());

        let seg = beam_search_segment(b"xy", &scorer, 2, 2);
        assert_eq!(seg.parts, vec![b"x".as_slice(), b"y"]);
    }

    #[test]
    fn test_bigram_matches_viterbi() {
        let unigrams = read_unigram_stats("a 4\nb 4\nc 4\nab 5\nbc 1\n".as_bytes()).unwrap();
        let bigrams = read_bigram_stats("a b 3\nb c 3\nab c 1\n".as_bytes()).unwrap();
        let scorer = BigramScorer::new(unigrams, bigrams);

        for word in [b"abc".as_slice(), b"abcabc", b"cab", b"zab"] {
            let exact = viterbi_segment(word, &scorer, 2);
            let beam = beam_search_segment(word, &scorer, 2, word.len());
            assert!((exact.score - beam.score).abs() < 1e-5, "{word:?}");
        }
    }

    fn table_entries() -> impl Strategy<Value = Vec<(String, f32)>> {
        prop::collection::vec(("[abc]{1,3}", -5.0f32..0.0), 0..12)
    }

    proptest! {
        #[test]
        fn test_segmentations_concatenate(
            word in "[abc]{0,10}",
            entries in table_entries(),
            beam_size in 1usize..4,
        ) {
            let entries: Vec<(&str, f32)> =
                entries.iter().map(|(s, v)| (s.as_str(), *v)).collect();
            let scorer = TableScorer::new(&entries, -6.0);
            let word = word.as_bytes();

            let exact = viterbi_segment(word, &scorer, 3);
            prop_assert_eq!(exact.parts.concat(), word.to_vec());

            let beam = beam_search_segment(word, &scorer, 3, beam_size);
            prop_assert_eq!(beam.parts.concat(), word.to_vec());
            prop_assert!(beam.score <= exact.score + 1e-4);

            let wide = beam_search_segment(word, &scorer, 3, word.len().max(1));
            prop_assert!((wide.score - exact.score).abs() < 1e-4);
        }
    }
}
