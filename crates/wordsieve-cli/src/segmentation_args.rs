use std::io::{BufRead, Write};

use wordsieve::{
    WordsieveError,
    segmentation::{
        DEFAULT_JOIN_MARKER, SegmentationOptions, WordSegmenter, format_segmented, segment_lines,
    },
    types::WSHashSet,
};

use crate::input_output::read_line_batch;

/// Lines segmented per parallel batch.
const BATCH_LINES: usize = 4096;

/// The line written in place of a line holding a word the model does not know.
pub const OOV_LINE: &[u8] = b"OOV";

/// Segmentation options arg group.
#[derive(clap::Args, Debug)]
pub struct SegmentationArgs {
    /// Longest subword to consider; defaults to the longest known subword.
    #[arg(long)]
    max_subword_length: Option<usize>,

    /// Decode with a beam of this width instead of exact Viterbi.
    #[arg(long)]
    beam_size: Option<usize>,

    /// Marker joining the sub-parts of one word.
    #[arg(long, default_value = DEFAULT_JOIN_MARKER)]
    join_marker: String,
}

impl SegmentationArgs {
    /// The library options.
    pub fn options(&self) -> SegmentationOptions {
        SegmentationOptions::new()
            .with_max_subword_length(self.max_subword_length)
            .with_beam_size(self.beam_size)
            .with_join_marker(self.join_marker.clone())
    }
}

/// Segment every line of `reader` to `writer`, one output line per input line.
///
/// Lines with a word the segmenter does not know are written as [`OOV_LINE`].
/// Returns the set of subwords used, when `collect_used` is set.
pub fn segment_stream<S: WordSegmenter + ?Sized>(
    segmenter: &S,
    join_marker: &str,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
    collect_used: bool,
) -> Result<WSHashSet<Vec<u8>>, Box<dyn std::error::Error>> {
    let mut used: WSHashSet<Vec<u8>> = Default::default();
    let mut batch = Vec::new();
    let mut lines = 0;
    let mut oov = 0;

    while read_line_batch(reader, BATCH_LINES, &mut batch)? > 0 {
        for result in segment_lines(segmenter, &batch) {
            match result {
                Ok(words) => {
                    writer.write_all(&format_segmented(&words, join_marker))?;
                    if collect_used {
                        used.extend(words.iter().flatten().map(|p| p.to_vec()));
                    }
                }
                Err(WordsieveError::UnknownWord(word)) => {
                    log::debug!("unknown word: {word:?}");
                    writer.write_all(OOV_LINE)?;
                    oov += 1;
                }
                Err(err) => return Err(err.into()),
            }
            writer.write_all(b"\n")?;
        }
        lines += batch.len();
        log::debug!("segmented {lines} lines");
    }
    writer.flush()?;

    log::info!("segmented {lines} lines ({oov} with unknown words)");
    Ok(used)
}
