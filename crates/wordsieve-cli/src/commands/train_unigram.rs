use crate::{logging::LogArgs, unigram_args::UnigramModelArgs};

/// Args for the train-unigram command.
#[derive(clap::Args, Debug)]
pub struct TrainUnigramArgs {
    #[command(flatten)]
    model: UnigramModelArgs,

    /// Where to save the trained parameters.
    model_out: String,

    /// Start from these parameters instead of zeros.
    #[arg(long)]
    load_model: Option<String>,

    /// Number of EM epochs.
    #[arg(long, default_value = "1")]
    epochs: usize,

    /// Warn about degenerate words and continue, rather than abort.
    #[arg(long)]
    keep_going: bool,

    /// Log the segmentation of this word after every epoch (repeatable).
    #[arg(long)]
    watch: Vec<String>,

    #[clap(flatten)]
    pub logging: LogArgs,
}

impl TrainUnigramArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;
        self.execute()
    }

    fn execute(&self) -> Result<(), Box<dyn std::error::Error>> {
        let options = self
            .model
            .options()
            .with_epochs(self.epochs)
            .with_abort_on_degenerate(!self.keep_going)
            .with_watch_words(self.watch.iter().cloned());
        let mut model = self.model.init_model(options)?;

        if let Some(path) = &self.load_model {
            log::info!("loading model: {path}");
            model.load(path)?;
        }

        model.train()?;

        log::info!("saving model: {}", self.model_out);
        model.save(&self.model_out)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;
    use wordsieve::vocab::io::load_matrix_path;

    use crate::commands::{
        Commands,
        testing::{arg, parse, write_file},
    };

    #[test]
    fn test_train_unigram() {
        let tmp = TempDir::new("train_unigram").unwrap();
        let words = write_file(tmp.path(), "words.vec", "2 2\nab 1 0\nba 0 1\n");
        let vocab = write_file(tmp.path(), "subwords.txt", "a\nb\nab\n");
        let inverse = write_file(tmp.path(), "pinv.mat", "1 0\n0 1\n");
        let model = tmp.path().join("model.mat");

        let Commands::TrainUnigram(cmd) = parse(&[
            "train-unigram",
            arg(&words),
            arg(&vocab),
            arg(&inverse),
            arg(&model),
            "--epochs",
            "2",
            "--watch",
            "ab",
            "--base-logprob",
            "-10",
        ]) else {
            panic!("wrong command");
        };
        cmd.execute().unwrap();

        let params = load_matrix_path(&model).unwrap();
        assert_eq!(params.shape(), (2, 3));

        // continue from the saved parameters.
        let resumed = tmp.path().join("resumed.mat");
        let Commands::TrainUnigram(cmd) = parse(&[
            "train-unigram",
            arg(&words),
            arg(&vocab),
            arg(&inverse),
            arg(&resumed),
            "--load-model",
            arg(&model),
        ]) else {
            panic!("wrong command");
        };
        cmd.execute().unwrap();
        assert_eq!(load_matrix_path(&resumed).unwrap().shape(), (2, 3));
    }
}
