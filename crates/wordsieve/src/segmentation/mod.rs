//! # Subword Segmentation
//!
//! Splits byte-string words into contiguous subwords.
//!
//! * [`scorers`] - the [`SubwordScorer`] contract and its implementations.
//! * [`viterbi_segment`] / [`beam_search_segment`] - the decoders.
//! * [`WordSegmenter`] - a model plus options; [`segment_lines`] applies one
//!   to whole lines in parallel.
//!
//! ## Example
//!
//! ```rust
//! use wordsieve::segmentation::{
//!     BigramSegmenter,
//!     SegmentationOptions,
//!     WordSegmenter,
//!     scorers::BigramScorer,
//! };
//! use wordsieve::vocab::io::{
//!     read_bigram_stats,
//!     read_unigram_stats,
//! };
//!
//! let unigrams = read_unigram_stats("a 10\nb 5\nab 4\n".as_bytes()).unwrap();
//! let bigrams = read_bigram_stats("a b 2\n".as_bytes()).unwrap();
//! let segmenter = BigramSegmenter::new(
//!     BigramScorer::new(unigrams, bigrams),
//!     SegmentationOptions::new(),
//! );
//!
//! assert_eq!(segmenter.segment_word(b"ab").unwrap(), vec![b"ab".as_slice()]);
//! ```

pub mod scorers;

mod beam_search;
mod line_segmenter;
mod scored_segmentation;
mod segmentation_options;
mod substrings;
mod viterbi;
mod word_segmenter;

#[doc(inline)]
pub use beam_search::*;
#[doc(inline)]
pub use line_segmenter::*;
#[doc(inline)]
pub use scored_segmentation::ScoredSegmentation;
#[doc(inline)]
pub use scorers::SubwordScorer;
#[doc(inline)]
pub use segmentation_options::*;
#[doc(inline)]
pub use substrings::*;
#[doc(inline)]
pub use viterbi::*;
#[doc(inline)]
pub use word_segmenter::*;
