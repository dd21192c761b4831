//! # Unigram Subword Model
//!
//! Each word's subword distribution is a log-softmax over the logits
//! `e_w * W_s`, restricted to the subwords occurring in the word. Training
//! alternates forward-backward expected counts with a projection through
//! the pseudo-inverse of the word embedding matrix:
//!
//! ```text
//! W_s <- E^+ * logP   (D x W) * (W x S)
//! ```
//!
//! `logP` starts each epoch as the current logits; the columns of each
//! word's candidate subwords are overwritten with their normalized expected
//! log-counts.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::{
    concurrency::par_map_range,
    errors::{WSResult, WordsieveError},
    estimation::expected_log_counts,
    math::DenseMatrix,
    segmentation::{
        WordSegmenter,
        scorers::{LogitScorer, SubwordScorer},
        viterbi_segment,
    },
    types::{TokenId, display_token},
    vocab::{
        Embeddings,
        Vocab,
        io::{read_matrix_with_shape, write_matrix},
    },
};

/// The default score of a single byte outside the subword vocabulary.
pub const DEFAULT_BASE_LOGPROB: f32 = -20.0;

/// Options for [`UnigramModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct UnigramModelOptions {
    /// Number of EM epochs [`UnigramModel::train`] runs.
    pub epochs: usize,

    /// Fail the epoch on the first degenerate word, rather than warn and
    /// reset that word's row to zeros.
    ///
    /// A word is degenerate when its row sum is not a finite normal number,
    /// or when the subword vocabulary cannot cover it (no finite likelihood).
    pub abort_on_degenerate: bool,

    /// Log-probability of an out-of-vocabulary single byte.
    pub base_logprob: f32,

    /// Longest subword to consider; `None` for no limit.
    pub max_subword_length: Option<usize>,

    /// Words whose segmentation is logged after every epoch.
    pub watch_words: Vec<String>,
}

impl Default for UnigramModelOptions {
    fn default() -> Self {
        Self {
            epochs: 1,
            abort_on_degenerate: true,
            base_logprob: DEFAULT_BASE_LOGPROB,
            max_subword_length: None,
            watch_words: Vec::new(),
        }
    }
}

impl UnigramModelOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of epochs.
    pub fn with_epochs(
        self,
        epochs: usize,
    ) -> Self {
        Self { epochs, ..self }
    }

    /// Sets whether a degenerate row aborts the epoch.
    pub fn with_abort_on_degenerate(
        self,
        abort_on_degenerate: bool,
    ) -> Self {
        Self {
            abort_on_degenerate,
            ..self
        }
    }

    /// Sets the out-of-vocabulary byte log-probability.
    pub fn with_base_logprob(
        self,
        base_logprob: f32,
    ) -> Self {
        Self {
            base_logprob,
            ..self
        }
    }

    /// Sets the longest subword length.
    pub fn with_max_subword_length(
        self,
        max_subword_length: Option<usize>,
    ) -> Self {
        Self {
            max_subword_length,
            ..self
        }
    }

    /// Sets the words whose segmentation is logged after every epoch.
    pub fn with_watch_words<I, S>(
        self,
        words: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            watch_words: words.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    /// Initializes a [`UnigramModel`] with `W_s = 0`.
    ///
    /// ## Arguments
    /// * `words` - the word embeddings, `W x D`.
    /// * `subwords` - the subword vocabulary, `S` entries.
    /// * `inverse_emb` - the pseudo-inverse of the embedding matrix, `D x W`.
    pub fn init(
        self,
        words: Embeddings,
        subwords: Vocab,
        inverse_emb: DenseMatrix,
    ) -> WSResult<UnigramModel> {
        UnigramModel::new(self, words, subwords, inverse_emb)
    }
}

/// Summary statistics of one EM epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochStats {
    /// Sum over all entries of the expected-count matrix.
    pub cumulative_sum: f32,

    /// Negative log-likelihood of all words.
    pub nll: f32,

    /// `||W_s||^2` after the update.
    pub ws_squared_norm: f32,
}

/// A unigram subword model parameterized by the projection `W_s` (`D x S`).
#[derive(Debug, Clone)]
pub struct UnigramModel {
    options: UnigramModelOptions,
    words: Embeddings,
    subwords: Vocab,
    inverse_emb: DenseMatrix,
    ws: DenseMatrix,
}

impl UnigramModel {
    /// Build a model with `W_s = 0`; see [`UnigramModelOptions::init`].
    pub fn new(
        options: UnigramModelOptions,
        words: Embeddings,
        subwords: Vocab,
        inverse_emb: DenseMatrix,
    ) -> WSResult<Self> {
        let expected = (words.dim(), words.len());
        if inverse_emb.shape() != expected {
            return Err(WordsieveError::ShapeMismatch(format!(
                "pseudo-inverse is {}x{}, expected {}x{}",
                inverse_emb.rows(),
                inverse_emb.cols(),
                expected.0,
                expected.1
            )));
        }
        let ws = DenseMatrix::zeros(words.dim(), subwords.len());
        Ok(Self {
            options,
            words,
            subwords,
            inverse_emb,
            ws,
        })
    }

    /// The config options.
    pub fn options(&self) -> &UnigramModelOptions {
        &self.options
    }

    /// The word embeddings.
    pub fn words(&self) -> &Embeddings {
        &self.words
    }

    /// The subword vocabulary.
    pub fn subwords(&self) -> &Vocab {
        &self.subwords
    }

    /// The projection `W_s`.
    pub fn params(&self) -> &DenseMatrix {
        &self.ws
    }

    /// Replace `W_s`; it must be `D x S`.
    pub fn set_params(
        &mut self,
        ws: DenseMatrix,
    ) -> WSResult<()> {
        if ws.shape() != self.ws.shape() {
            return Err(WordsieveError::ShapeMismatch(format!(
                "parameters are {}x{}, expected {}x{}",
                ws.rows(),
                ws.cols(),
                self.ws.rows(),
                self.ws.cols()
            )));
        }
        self.ws = ws;
        Ok(())
    }

    fn logits(
        &self,
        word_id: TokenId,
    ) -> WSResult<Vec<f32>> {
        self.ws.vec_mul(self.words.row(word_id))
    }

    fn scorer(
        &self,
        word: &[u8],
        logits: &[f32],
    ) -> LogitScorer {
        LogitScorer::new(
            word,
            &self.subwords,
            logits,
            self.options.max_subword_length,
            self.options.base_logprob,
        )
    }

    /// The logit scorer for `word`.
    pub fn scorer_for(
        &self,
        word: &[u8],
    ) -> WSResult<LogitScorer> {
        let word_id = self
            .words
            .vocab()
            .lookup(word)
            .ok_or_else(|| WordsieveError::UnknownWord(display_token(word)))?;
        let logits = self.logits(word_id)?;
        Ok(self.scorer(word, &logits))
    }

    /// The target row of word `word_id` for the next update, and the word's
    /// negative log-likelihood.
    pub fn compute_expected_counts(
        &self,
        word_id: TokenId,
    ) -> WSResult<(Vec<f32>, f32)> {
        let word = self.words.vocab().token(word_id);
        let mut row = self.logits(word_id)?;
        let posterior = expected_log_counts(word, &self.scorer(word, &row));
        for (id, value) in posterior.log_counts {
            row[id] = value;
        }
        Ok((row, -posterior.log_likelihood))
    }

    /// Run one EM epoch.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn run_epoch(&mut self) -> WSResult<EpochStats> {
        let rows = par_map_range(self.words.len(), |w| self.compute_expected_counts(w));

        let mut data = Vec::with_capacity(self.words.len() * self.subwords.len());
        let mut cumulative_sum = 0.0;
        let mut nll = 0.0;
        for (word_id, result) in rows.into_iter().enumerate() {
            let (mut row, word_nll) = result?;
            let row_sum: f32 = row.iter().sum();
            if !row_sum.is_normal() || !word_nll.is_finite() {
                let word = display_token(self.words.vocab().token(word_id));
                if self.options.abort_on_degenerate {
                    return Err(WordsieveError::DegenerateRow { word, row_sum });
                }
                log::warn!("degenerate expected counts for {word:?} (row sum: {row_sum}); resetting");
                row.fill(0.0);
            } else {
                cumulative_sum += row_sum;
                nll += word_nll;
            }
            data.extend_from_slice(&row);
        }

        let exp_counts = DenseMatrix::from_vec(self.words.len(), self.subwords.len(), data)?;
        self.ws = self.inverse_emb.matmul(&exp_counts)?;

        let stats = EpochStats {
            cumulative_sum,
            nll,
            ws_squared_norm: self.ws.squared_norm(),
        };
        log::info!("cumulative sum: {}", stats.cumulative_sum);
        log::info!("cumulative nll: {}", stats.nll);
        log::info!("W_s squared norm (L2): {}", stats.ws_squared_norm);
        Ok(stats)
    }

    /// Run `epochs` EM epochs, logging the watch words after each.
    pub fn estimate_parameters(
        &mut self,
        epochs: usize,
    ) -> WSResult<Vec<EpochStats>> {
        let mut history = Vec::with_capacity(epochs);
        for epoch in 0..epochs {
            log::info!("epoch {}/{epochs}", epoch + 1);
            history.push(self.run_epoch()?);
            self.log_watch_words();
        }
        Ok(history)
    }

    /// Run the configured number of epochs.
    pub fn train(&mut self) -> WSResult<Vec<EpochStats>> {
        self.estimate_parameters(self.options.epochs)
    }

    fn log_watch_words(&self) {
        for word in &self.options.watch_words {
            match self.viterbi_decode(word.as_bytes()) {
                Ok(parts) => {
                    let parts: Vec<String> = parts.into_iter().map(display_token).collect();
                    log::info!("watch {word}: {}", parts.join(" "));
                }
                Err(err) => log::info!("watch {word}: {err}"),
            }
        }
    }

    /// The most probable segmentation of a known word.
    pub fn viterbi_decode<'w>(
        &self,
        word: &'w [u8],
    ) -> WSResult<Vec<&'w [u8]>> {
        let scorer = self.scorer_for(word)?;
        Ok(viterbi_segment(word, &scorer, scorer.max_subword_length()).parts)
    }

    /// Write `W_s`, one row per line.
    pub fn save<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> WSResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write `W_s` to a stream.
    pub fn write<W: Write>(
        &self,
        writer: &mut W,
    ) -> WSResult<()> {
        write_matrix(&self.ws, writer)
    }

    /// Load `W_s` from a file written by [`UnigramModel::save`].
    pub fn load<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> WSResult<()> {
        self.read(BufReader::new(File::open(path)?))
    }

    /// Read `W_s` from a stream; the shape must match.
    pub fn read<R: BufRead>(
        &mut self,
        reader: R,
    ) -> WSResult<()> {
        let (rows, cols) = self.ws.shape();
        self.ws = read_matrix_with_shape(reader, rows, cols)?;
        Ok(())
    }
}

impl WordSegmenter for UnigramModel {
    fn segment_word<'w>(
        &self,
        word: &'w [u8],
    ) -> WSResult<Vec<&'w [u8]>> {
        self.viterbi_decode(word)
    }
}
