use std::io::{stdin, BufRead};

use clap::Parser;
use hmmtag::Model;

/// Tag sentences read from STDIN, one sentence of whitespace separated tokens per line
#[derive(Debug, Parser)]
struct Argv {
    /// read a model from a file (MODEL)
    #[arg(short, long, required = true, value_name = "MODEL")]
    model: String,
}

fn main() {
    env_logger::init();
    let argv = Argv::parse();
    let model = Model::load(&argv.model).expect("failed to load model");
    let mut tagger = model.tagger().expect("failed to get tagger from model");
    for line in stdin().lock().lines() {
        let line = line.expect("failed to read line");
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let tagged = tagger.tag(&tokens).expect("failed to tag");
        let items: Vec<String> = tokens
            .iter()
            .zip(&tagged.tags)
            .map(|(token, tag)| format!("{token}/{tag}"))
            .collect();
        println!("{}\t{:.3}", items.join(" "), tagged.score);
    }
}
