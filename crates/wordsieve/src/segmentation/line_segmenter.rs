//! # Line Segmentation
//!
//! Segments every whitespace-separated word of a line, joining the parts
//! of one word with `"<marker> "`:
//!
//! ```text
//! unbelievable words  =>  un@@ believ@@ able words
//! ```

use crate::{concurrency::par_map_range, errors::WSResult, segmentation::WordSegmenter};

/// The sub-parts of every whitespace-separated word of `line`, in order.
pub fn segment_line_words<'l, S: WordSegmenter + ?Sized>(
    segmenter: &S,
    line: &'l [u8],
) -> WSResult<Vec<Vec<&'l [u8]>>> {
    line.split(u8::is_ascii_whitespace)
        .filter(|w| !w.is_empty())
        .map(|word| segmenter.segment_word(word))
        .collect()
}

/// Render segmented words: words separated by single spaces, the parts of
/// one word joined by `"<marker> "`.
pub fn format_segmented<P: AsRef<[u8]>>(
    words: &[Vec<P>],
    join_marker: &str,
) -> Vec<u8> {
    let mut out = Vec::new();
    for (idx, parts) in words.iter().enumerate() {
        if idx > 0 {
            out.push(b' ');
        }
        for (pidx, part) in parts.iter().enumerate() {
            if pidx > 0 {
                out.extend_from_slice(join_marker.as_bytes());
                out.push(b' ');
            }
            out.extend_from_slice(part.as_ref());
        }
    }
    out
}

/// Segment many lines in parallel; results keep the input order.
///
/// Each result holds the sub-parts of every word of its line, or the first
/// error any of those words raised.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
pub fn segment_lines<'l, S, L>(
    segmenter: &S,
    lines: &'l [L],
) -> Vec<WSResult<Vec<Vec<&'l [u8]>>>>
where
    S: WordSegmenter + ?Sized,
    L: AsRef<[u8]> + Sync,
{
    log::debug!("segmenting {} lines", lines.len());
    par_map_range(lines.len(), |idx| {
        segment_line_words(segmenter, lines[idx].as_ref())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::WordsieveError, types::display_token};

    /// Splits words in half; `oov` is unknown.
    struct Halves;

    impl WordSegmenter for Halves {
        fn segment_word<'w>(
            &self,
            word: &'w [u8],
        ) -> WSResult<Vec<&'w [u8]>> {
            if word == b"oov" {
                return Err(WordsieveError::UnknownWord(display_token(word)));
            }
            let mid = word.len() / 2;
            Ok([&word[..mid], &word[mid..]]
                .into_iter()
                .filter(|p| !p.is_empty())
                .collect())
        }
    }

    #[test]
    fn test_segment_line_words() {
        let words = segment_line_words(&Halves, b"abcd x").unwrap();
        assert_eq!(words, vec![vec![b"ab".as_slice(), b"cd"], vec![b"x".as_slice()]]);
        assert_eq!(format_segmented(&words, "+"), b"ab+ cd x");
        assert_eq!(format_segmented::<&[u8]>(&[], "+"), b"");
    }

    #[test]
    fn test_segment_lines_keeps_order() {
        let lines = vec!["  abcd  x\tefg ", "oov", "", "xy zw"];
        let out = segment_lines(&Halves, &lines);
        assert_eq!(out.len(), 4);

        let rendered: Vec<Option<Vec<u8>>> = out
            .iter()
            .map(|r| r.as_ref().ok().map(|words| format_segmented(words, "##")))
            .collect();
        assert_eq!(rendered[0].as_deref(), Some(b"ab## cd x e## fg".as_slice()));
        assert!(matches!(out[1], Err(WordsieveError::UnknownWord(_))));
        assert_eq!(rendered[2].as_deref(), Some(b"".as_slice()));
        assert_eq!(rendered[3].as_deref(), Some(b"x## y z## w".as_slice()));
    }
}
