//! # Word Segmenters
//!
//! A [`WordSegmenter`] owns a model and its [`SegmentationOptions`], and
//! splits one word at a time. The decoders underneath are shared.

use crate::{
    errors::{WSResult, WordsieveError},
    segmentation::{
        ScoredSegmentation,
        SegmentationOptions,
        beam_search_segment,
        scorers::{BigramScorer, CosineScorer, SubwordScorer},
        viterbi_segment,
    },
    types::display_token,
    vocab::Embeddings,
};

/// Splits single words into subwords.
pub trait WordSegmenter: Sync {
    /// The sub-parts of `word`; they concatenate to `word`.
    fn segment_word<'w>(
        &self,
        word: &'w [u8],
    ) -> WSResult<Vec<&'w [u8]>>;
}

/// Decode with Viterbi, or with a beam when `beam_size` is set.
pub fn decode<'w, S: SubwordScorer + ?Sized>(
    word: &'w [u8],
    scorer: &S,
    max_subword_length: usize,
    beam_size: Option<usize>,
) -> ScoredSegmentation<'w> {
    match beam_size {
        Some(beam_size) => beam_search_segment(word, scorer, max_subword_length, beam_size),
        None => viterbi_segment(word, scorer, max_subword_length),
    }
}

/// Segments with a [`BigramScorer`].
#[derive(Debug, Clone)]
pub struct BigramSegmenter {
    scorer: BigramScorer,
    options: SegmentationOptions,
}

impl BigramSegmenter {
    /// Wrap a scorer.
    pub fn new(
        scorer: BigramScorer,
        options: SegmentationOptions,
    ) -> Self {
        Self { scorer, options }
    }

    /// The scorer.
    pub fn scorer(&self) -> &BigramScorer {
        &self.scorer
    }

    /// The options.
    pub fn options(&self) -> &SegmentationOptions {
        &self.options
    }
}

impl WordSegmenter for BigramSegmenter {
    fn segment_word<'w>(
        &self,
        word: &'w [u8],
    ) -> WSResult<Vec<&'w [u8]>> {
        let max_len = self
            .options
            .effective_max_length(self.scorer.max_subword_length());
        Ok(decode(word, &self.scorer, max_len, self.options.beam_size).parts)
    }
}

/// Segments each word by cosine similarity between its embedding and the
/// embeddings of its candidate subwords.
///
/// Words without an embedding are a [`WordsieveError::UnknownWord`].
#[derive(Debug, Clone)]
pub struct CosineSegmenter {
    words: Embeddings,
    subwords: Embeddings,
    options: SegmentationOptions,
}

impl CosineSegmenter {
    /// Pair word and subword embeddings of the same dimension.
    pub fn new(
        words: Embeddings,
        subwords: Embeddings,
        options: SegmentationOptions,
    ) -> WSResult<Self> {
        if words.dim() != subwords.dim() {
            return Err(WordsieveError::ShapeMismatch(format!(
                "word embeddings have dimension {}, subword embeddings {}",
                words.dim(),
                subwords.dim()
            )));
        }
        Ok(Self {
            words,
            subwords,
            options,
        })
    }

    /// The word embeddings.
    pub fn words(&self) -> &Embeddings {
        &self.words
    }

    /// The subword embeddings.
    pub fn subwords(&self) -> &Embeddings {
        &self.subwords
    }
}

impl WordSegmenter for CosineSegmenter {
    fn segment_word<'w>(
        &self,
        word: &'w [u8],
    ) -> WSResult<Vec<&'w [u8]>> {
        let embedding = self
            .words
            .row_of(word)
            .ok_or_else(|| WordsieveError::UnknownWord(display_token(word)))?;

        let max_len = self
            .options
            .effective_max_length(self.subwords.vocab().max_token_len());
        let scorer = CosineScorer::new(&self.subwords, embedding, max_len);

        Ok(decode(word, &scorer, max_len, self.options.beam_size).parts)
    }
}
