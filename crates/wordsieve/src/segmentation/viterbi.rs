//! # Exact Viterbi Decoding
//!
//! Finds the highest-scoring segmentation of a word. For a contextual
//! scorer the search state is the last sub-part, identified by its byte
//! span, which makes the result exact under a bigram model. For a
//! context-free scorer one best path per position suffices.

use crate::segmentation::{
    scored_segmentation::{ScoredSegmentation, is_candidate},
    scorers::{BOW, SubwordScorer},
};

/// A path ending with the sub-part `start..end`.
#[derive(Debug, Clone, Copy)]
struct Cell {
    score: f32,
    start: usize,
    end: usize,
    prev: Option<usize>,
}

/// The best segmentation of `word` under `scorer`.
///
/// Multi-byte sub-parts must be admitted by the scorer and be at most
/// `max_subword_length` long; single bytes are always candidates. When no
/// finite-scoring path exists the word is split into single bytes. The
/// empty word has the empty segmentation.
///
/// Ties keep the path found first.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(word, scorer)))]
pub fn viterbi_segment<'w, S: SubwordScorer + ?Sized>(
    word: &'w [u8],
    scorer: &S,
    max_subword_length: usize,
) -> ScoredSegmentation<'w> {
    let n = word.len();
    if n == 0 {
        return ScoredSegmentation {
            parts: Vec::new(),
            score: 0.0,
        };
    }
    let max_len = max_subword_length.max(1);
    let contextual = scorer.uses_context();

    let mut cells: Vec<Cell> = Vec::new();
    let mut ending_at: Vec<Vec<usize>> = vec![Vec::new(); n + 1];

    for end in 1..=n {
        for start in end.saturating_sub(max_len)..end {
            let subword = &word[start..end];
            if !is_candidate(subword, scorer, max_len) {
                continue;
            }

            let mut best: Option<(f32, Option<usize>)> = None;
            if start == 0 {
                best = Some((scorer.score(subword, BOW), None));
            } else {
                for &h in &ending_at[start] {
                    let pred = &cells[h];
                    let score = pred.score + scorer.score(subword, &word[pred.start..start]);
                    if best.is_none_or(|(b, _)| score > b) {
                        best = Some((score, Some(h)));
                    }
                }
            }

            if let Some((score, prev)) = best
                && score.is_finite()
            {
                ending_at[end].push(cells.len());
                cells.push(Cell {
                    score,
                    start,
                    end,
                    prev,
                });
            }
        }

        if !contextual && let Some(h) = best_cell(&cells, &ending_at[end]) {
            ending_at[end] = vec![h];
        }
    }

    let Some(mut h) = best_cell(&cells, &ending_at[n]) else {
        log::debug!(
            "no scored path for {:?}; splitting into bytes",
            String::from_utf8_lossy(word)
        );
        return ScoredSegmentation::single_bytes(word, scorer);
    };

    let score = cells[h].score;
    let mut parts = Vec::new();
    loop {
        let cell = &cells[h];
        parts.push(&word[cell.start..cell.end]);
        match cell.prev {
            Some(p) => h = p,
            None => break,
        }
    }
    parts.reverse();

    ScoredSegmentation { parts, score }
}

/// The first highest-scoring handle in `handles`.
fn best_cell(
    cells: &[Cell],
    handles: &[usize],
) -> Option<usize> {
    let mut best: Option<usize> = None;
    for &h in handles {
        if best.is_none_or(|b| cells[h].score > cells[b].score) {
            best = Some(h);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        segmentation::scorers::{BigramScorer, testing::TableScorer},
        vocab::io::{read_bigram_stats, read_unigram_stats},
    };

    fn as_strs(seg: &ScoredSegmentation) -> Vec<String> {
        seg.parts
            .iter()
            .map(|p| String::from_utf8_lossy(p).to_string())
            .collect()
    }

    #[test]
    fn test_table_scorer() {
        let scorer = TableScorer::new(
            &[("a", -1.0), ("b", -1.0), ("c", -1.0), ("ab", -1.5), ("abc", -5.0)],
            -10.0,
        );

        let seg = viterbi_segment(b"abc", &scorer, 3);
        assert_eq!(as_strs(&seg), vec!["ab", "c"]);
        assert_eq!(seg.score, -2.5);

        let seg = viterbi_segment(b"abc", &scorer, 1);
        assert_eq!(as_strs(&seg), vec!["a", "b", "c"]);
        assert_eq!(seg.score, -3.0);
    }

    #[test]
    fn test_empty_word() {
        let scorer = TableScorer::new(&[("a", -1.0)], -1.0);
        let seg = viterbi_segment(b"", &scorer, 4);
        assert!(seg.is_empty());
        assert_eq!(seg.score, 0.0);
    }

    #[test]
    fn test_falls_back_to_bytes() {
        let scorer = TableScorer::new(&[("q", -1.0)], f32::NEG_INFINITY);
        let seg = viterbi_segment(b"xy", &scorer, 2);
        assert_eq!(as_strs(&seg), vec!["x", "y"]);
        assert_eq!(seg.score, f32::NEG_INFINITY);
    }

    fn bigram_scorer(ab_count: u64) -> BigramScorer {
        let unigrams = format!("a 10\nb 5\nab {ab_count}\n");
        let unigrams = read_unigram_stats(unigrams.as_bytes()).unwrap();
        let bigrams = read_bigram_stats("a b 2\n".as_bytes()).unwrap();
        BigramScorer::new(unigrams, bigrams)
    }

    #[test]
    fn test_bigram_prefers_whole_word_above_threshold() {
        // `ab` scores ln(c / T); `a b` scores ln(10 / T) + ln(3 / 10) = ln(3 / T).
        let scorer = bigram_scorer(4);
        let seg = viterbi_segment(b"ab", &scorer, scorer.max_subword_length());
        assert_eq!(as_strs(&seg), vec!["ab"]);

        let scorer = bigram_scorer(2);
        let seg = viterbi_segment(b"ab", &scorer, scorer.max_subword_length());
        assert_eq!(as_strs(&seg), vec!["a", "b"]);
        assert!((seg.score - (3.0_f32 / 17.0).ln()).abs() < 1e-5);
    }

    #[test]
    fn test_contextual_state_is_the_last_part() {
        // `ab` is the more frequent unigram, but the bigrams make `a b c` cheaper.
        let unigrams = read_unigram_stats("a 4\nb 4\nc 4\nab 5\n".as_bytes()).unwrap();
        let bigrams = read_bigram_stats("a b 3\nb c 3\n".as_bytes()).unwrap();
        let scorer = BigramScorer::new(unigrams, bigrams);

        let seg = viterbi_segment(b"abc", &scorer, 2);
        let expected = ScoredSegmentation::from_parts(seg.parts.clone(), &scorer);
        assert_eq!(seg.score, expected.score);

        for parts in [
            vec![b"a".as_slice(), b"b", b"c"],
            vec![b"ab".as_slice(), b"c"],
            vec![b"a".as_slice(), b"bc"],
        ] {
            let other = ScoredSegmentation::from_parts(parts, &scorer);
            assert!(seg.score >= other.score);
        }
        assert_eq!(as_strs(&seg), vec!["a", "b", "c"]);
    }
}
