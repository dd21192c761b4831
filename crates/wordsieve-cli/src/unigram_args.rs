use std::{fs::File, io::BufReader};

use wordsieve::{
    estimation::{DEFAULT_BASE_LOGPROB, UnigramModel, UnigramModelOptions},
    vocab::io::{load_embeddings_path, load_vocab_path, read_matrix_with_shape},
};

/// Unigram model inputs arg group.
#[derive(clap::Args, Debug)]
pub struct UnigramModelArgs {
    /// Word embeddings, with a `count dim` header.
    word_embeddings: String,

    /// Subword vocabulary, one subword per line.
    subword_vocab: String,

    /// Pseudo-inverse of the word embedding matrix (dim x word count).
    pseudo_inverse: String,

    /// Log-probability of a single byte outside the subword vocabulary.
    #[arg(long, default_value_t = DEFAULT_BASE_LOGPROB, allow_hyphen_values = true)]
    base_logprob: f32,

    /// Longest subword to consider.
    #[arg(long)]
    max_subword_length: Option<usize>,
}

impl UnigramModelArgs {
    /// The model options these args set.
    pub fn options(&self) -> UnigramModelOptions {
        UnigramModelOptions::new()
            .with_base_logprob(self.base_logprob)
            .with_max_subword_length(self.max_subword_length)
    }

    /// Load the inputs and build a model with the given options.
    pub fn init_model(
        &self,
        options: UnigramModelOptions,
    ) -> Result<UnigramModel, Box<dyn std::error::Error>> {
        log::info!("loading subword vocabulary: {}", self.subword_vocab);
        let subwords = load_vocab_path(&self.subword_vocab)?;

        log::info!("loading word embeddings: {}", self.word_embeddings);
        let words = load_embeddings_path(&self.word_embeddings)?;

        log::info!("loading pseudo-inverse: {}", self.pseudo_inverse);
        let inverse = read_matrix_with_shape(
            BufReader::new(File::open(&self.pseudo_inverse)?),
            words.dim(),
            words.len(),
        )?;

        Ok(options.init(words, subwords, inverse)?)
    }
}
