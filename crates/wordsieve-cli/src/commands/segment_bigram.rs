use wordsieve::{
    segmentation::{BigramSegmenter, scorers::BigramScorer},
    vocab::io::{load_bigram_stats_path, load_unigram_stats_path},
};

use crate::{
    input_output::{InputArgs, OutputArgs},
    logging::LogArgs,
    segmentation_args::{SegmentationArgs, segment_stream},
};

/// Args for the segment-bigram command.
#[derive(clap::Args, Debug)]
pub struct SegmentBigramArgs {
    /// `left right count` subword bigram statistics.
    bigram_stats: String,

    /// `token count` subword unigram statistics.
    unigram_stats: String,

    #[command(flatten)]
    segmentation: SegmentationArgs,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[clap(flatten)]
    pub logging: LogArgs,
}

impl SegmentBigramArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;
        self.execute()
    }

    fn execute(&self) -> Result<(), Box<dyn std::error::Error>> {
        log::info!("loading unigrams: {}", self.unigram_stats);
        let unigrams = load_unigram_stats_path(&self.unigram_stats)?;
        log::info!("loading bigrams: {}", self.bigram_stats);
        let bigrams = load_bigram_stats_path(&self.bigram_stats)?;

        let options = self.segmentation.options();
        let marker = options.join_marker.clone();
        let segmenter = BigramSegmenter::new(BigramScorer::new(unigrams, bigrams), options);

        let mut reader = self.input.open_reader()?;
        let mut writer = self.output.open_writer()?;
        segment_stream(&segmenter, &marker, &mut reader, &mut writer, false)?;

        Ok(())
    }
}
