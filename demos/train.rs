use std::path::PathBuf;

use clap::Parser;
use hmmtag::{hmm::options::split_parameter, Trainer};

/// Train a tagger on a file of token/tag lines and store the model as JSON
#[derive(Debug, Parser)]
#[command(version)]
struct Argv {
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    #[arg(short, long)]
    model: PathBuf,
    #[arg(short)]
    parameters: Vec<String>,
    #[arg(required = true)]
    dataset: PathBuf,
}

fn main() {
    let argv = Argv::parse();
    env_logger::builder()
        .filter_level(match argv.verbose {
            0 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();
    log::info!("argv: {:?}", argv);
    let mut trainer = Trainer::new(&argv.dataset);
    argv.parameters.iter().for_each(|s| {
        let (name, value) = split_parameter(s);
        trainer
            .set(name, value)
            .unwrap_or_else(|e| panic!("failed to set parameter {s}: {e}"));
    });
    let model = trainer.train(None).expect("failed to train");
    model.save(&argv.model).expect("failed to save model");
    log::info!("write model to {}", argv.model.display());
}
