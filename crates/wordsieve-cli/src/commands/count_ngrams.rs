use wordsieve::{
    counting::NgramCounterOptions,
    vocab::io::{save_bigram_stats_path, save_unigram_stats_path},
};

use crate::{input_output::open_path_reader, logging::LogArgs};

/// Args for the count-ngrams command.
#[derive(clap::Args, Debug)]
pub struct CountNgramsArgs {
    /// Tokenized text; "-" for stdin.
    input: String,

    /// Where to write `token count` lines.
    #[arg(long)]
    unigrams: String,

    /// Where to write `left right count` lines.
    #[arg(long)]
    bigrams: String,

    /// Stop after this many tokens.
    #[arg(long)]
    limit: Option<usize>,

    #[clap(flatten)]
    pub logging: LogArgs,
}

impl CountNgramsArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;
        self.execute()
    }

    fn execute(&self) -> Result<(), Box<dyn std::error::Error>> {
        let mut counter = NgramCounterOptions::new()
            .with_limit(self.limit)
            .init::<u64>();

        log::info!("counting {}", self.input);
        counter.update_from_reader(open_path_reader(&self.input)?)?;
        log::info!(
            "{} tokens, {} types",
            counter.data_size(),
            counter.len()
        );

        save_unigram_stats_path(counter.unigram_entries(), &self.unigrams)?;
        save_bigram_stats_path(counter.bigram_entries(), &self.bigrams)?;
        log::info!("wrote {} and {}", self.unigrams, self.bigrams);

        Ok(())
    }
}
