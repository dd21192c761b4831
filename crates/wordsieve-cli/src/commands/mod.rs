mod brown;
mod count_ngrams;
mod segment_bigram;
mod segment_cosine;
mod segment_unigram;
mod train_unigram;

/// Subcommands for wsieve
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Count unigram and bigram statistics of a corpus.
    CountNgrams(count_ngrams::CountNgramsArgs),

    /// Cluster the words of a corpus into Brown classes.
    Brown(brown::BrownArgs),

    /// Segment text with a subword bigram language model.
    SegmentBigram(segment_bigram::SegmentBigramArgs),

    /// Segment text by word / subword embedding similarity.
    SegmentCosine(segment_cosine::SegmentCosineArgs),

    /// Train a unigram subword model with forward-backward.
    TrainUnigram(train_unigram::TrainUnigramArgs),

    /// Segment text with a trained unigram subword model.
    SegmentUnigram(segment_unigram::SegmentUnigramArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::CountNgrams(cmd) => cmd.run(),
            Commands::Brown(cmd) => cmd.run(),
            Commands::SegmentBigram(cmd) => cmd.run(),
            Commands::SegmentCosine(cmd) => cmd.run(),
            Commands::TrainUnigram(cmd) => cmd.run(),
            Commands::SegmentUnigram(cmd) => cmd.run(),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::path::{Path, PathBuf};

    use clap::Parser;

    use crate::{Args, commands::Commands};

    /// Parse a command line, without the program name.
    pub fn parse(args: &[&str]) -> Commands {
        let argv = std::iter::once("wsieve").chain(args.iter().copied());
        Args::try_parse_from(argv).unwrap().command
    }

    /// Write `contents` to `dir/name`.
    pub fn write_file(
        dir: &Path,
        name: &str,
        contents: &str,
    ) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// The path as a `&str`.
    pub fn arg(path: &Path) -> &str {
        path.to_str().unwrap()
    }
}
