mod commands;
mod input_output;
mod logging;
mod segmentation_args;
mod unigram_args;

use clap::Parser;
use commands::Commands;

/// wsieve: Brown clustering and subword segmentation.
#[derive(clap::Parser, Debug)]
pub struct Args {
    /// Subcommand to run.
    #[clap(subcommand)]
    pub command: Commands,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    args.command.run()
}
