use std::{fs::File, io::BufReader};

use wordsieve::{
    segmentation::CosineSegmenter,
    vocab::{
        Embeddings,
        io::{load_embeddings_path, load_vocab_path, read_matrix_with_shape, save_vocab_path},
    },
};

use crate::{
    input_output::{InputArgs, OutputArgs},
    logging::LogArgs,
    segmentation_args::{SegmentationArgs, segment_stream},
};

/// Args for the segment-cosine command.
#[derive(clap::Args, Debug)]
pub struct SegmentCosineArgs {
    /// Word embeddings, with a `count dim` header.
    word_embeddings: String,

    /// Subword vocabulary, one subword per line.
    subword_vocab: String,

    /// Subword embedding matrix, one row per vocabulary line.
    subword_embeddings: String,

    /// Write the subwords actually used, in vocabulary order, here.
    #[arg(long)]
    filtered_vocab: Option<String>,

    #[command(flatten)]
    segmentation: SegmentationArgs,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[clap(flatten)]
    pub logging: LogArgs,
}

impl SegmentCosineArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;
        self.execute()
    }

    fn execute(&self) -> Result<(), Box<dyn std::error::Error>> {
        log::info!("loading word embeddings: {}", self.word_embeddings);
        let words = load_embeddings_path(&self.word_embeddings)?;

        log::info!("loading subword vocabulary: {}", self.subword_vocab);
        let vocab = load_vocab_path(&self.subword_vocab)?;

        log::info!("loading subword embeddings: {}", self.subword_embeddings);
        let matrix = read_matrix_with_shape(
            BufReader::new(File::open(&self.subword_embeddings)?),
            vocab.len(),
            words.dim(),
        )?;
        let subwords = Embeddings::new(vocab, matrix)?;

        let options = self.segmentation.options();
        let marker = options.join_marker.clone();
        let segmenter = CosineSegmenter::new(words, subwords, options)?;

        let mut reader = self.input.open_reader()?;
        let mut writer = self.output.open_writer()?;
        let used = segment_stream(
            &segmenter,
            &marker,
            &mut reader,
            &mut writer,
            self.filtered_vocab.is_some(),
        )?;

        if let Some(path) = &self.filtered_vocab {
            let (filtered, _) = segmenter.subwords().vocab().retain_used(&used);
            log::info!(
                "filtered subword vocabulary: {} of {}",
                filtered.len(),
                segmenter.subwords().len()
            );
            save_vocab_path(&filtered, path)?;
        }

        Ok(())
    }
}
