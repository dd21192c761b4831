use std::io::Write;

use wordsieve::clustering::BrownClustererOptions;

use crate::{
    input_output::{OutputArgs, open_path_reader},
    logging::LogArgs,
};

/// Args for the brown command.
#[derive(clap::Args, Debug)]
pub struct BrownArgs {
    /// Tokenized text; "-" for stdin.
    input: String,

    /// Merge until this many classes remain.
    num_classes: usize,

    /// Tokens rarer than this only serve as contexts.
    #[arg(long, default_value = "1")]
    min_freq: u64,

    /// Stop counting after this many tokens.
    #[arg(long)]
    limit: Option<usize>,

    #[command(flatten)]
    output: OutputArgs,

    #[clap(flatten)]
    pub logging: LogArgs,
}

impl BrownArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;
        self.execute()
    }

    fn execute(&self) -> Result<(), Box<dyn std::error::Error>> {
        let options = BrownClustererOptions::new(self.num_classes)
            .with_min_freq(self.min_freq)
            .with_limit(self.limit);

        let mut counter = options.counter_options().init::<u64>();
        log::info!("counting {}", self.input);
        counter.update_from_reader(open_path_reader(&self.input)?)?;

        let mut clusterer = options.init(counter);
        clusterer.run();

        let mut writer = self.output.open_writer()?;
        for members in clusterer.classes().classes() {
            writer.write_all(&members.join(b" ".as_slice()))?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        Ok(())
    }
}
