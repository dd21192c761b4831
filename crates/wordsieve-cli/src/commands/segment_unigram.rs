use wordsieve::segmentation::DEFAULT_JOIN_MARKER;

use crate::{
    input_output::{InputArgs, OutputArgs},
    logging::LogArgs,
    segmentation_args::segment_stream,
    unigram_args::UnigramModelArgs,
};

/// Args for the segment-unigram command.
#[derive(clap::Args, Debug)]
pub struct SegmentUnigramArgs {
    #[command(flatten)]
    model: UnigramModelArgs,

    /// Trained parameters, as written by train-unigram.
    params: String,

    /// Marker joining the sub-parts of one word.
    #[arg(long, default_value = DEFAULT_JOIN_MARKER)]
    join_marker: String,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[clap(flatten)]
    pub logging: LogArgs,
}

impl SegmentUnigramArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;
        self.execute()
    }

    fn execute(&self) -> Result<(), Box<dyn std::error::Error>> {
        let mut model = self.model.init_model(self.model.options())?;
        log::info!("loading model: {}", self.params);
        model.load(&self.params)?;

        let mut reader = self.input.open_reader()?;
        let mut writer = self.output.open_writer()?;
        segment_stream(&model, &self.join_marker, &mut reader, &mut writer, false)?;

        Ok(())
    }
}
