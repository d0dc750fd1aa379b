use std::{
    io::{stdin, stdout, BufWriter, Write},
    path::PathBuf,
    time::Instant,
};

use clap::{Parser, Subcommand};
use hmmtag::{
    dataset::write_tagged, hmm::options::split_parameter, Dataset, DecodeOptions, Evaluation,
    Format, Model, Result, Trainer,
};

#[derive(Debug, Parser)]
#[command(version)]
#[command(propagate_version = true)]
struct Argv {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Train a model from a file of token/tag lines (FILE)
    Train {
        /// store the model to a file (MODEL)
        #[arg(short, long, value_name = "MODEL")]
        model: PathBuf,
        /// set a training parameter, e.g. -p lambda_floor=1e-100
        #[arg(short = 'p', value_name = "NAME=VALUE")]
        parameters: Vec<String>,
        #[arg(value_name = "FILE")]
        dataset: PathBuf,
    },
    /// Assign tags to the sentences in the data sets given by files (FILE)
    /// If no FILE is given, this utility reads the data from STDIN
    Tag {
        /// read a model from a file (MODEL)
        #[arg(short, long, value_name = "MODEL")]
        model: PathBuf,
        /// report the performance of the model on the data
        #[arg(short = 't', long = "test")]
        evaluate: bool,
        /// output the reference tags in the input data
        #[arg(short, long)]
        reference: bool,
        /// report the accuracy of every sentence (with -t)
        #[arg(short = 's', long)]
        per_sentence: bool,
        /// suppress tagging results (useful for test mode)
        #[arg(short, long)]
        quiet: bool,
        /// layout of the input and output
        #[arg(short, long, value_enum, default_value_t = Format::Token)]
        format: Format,
        /// set a decoding parameter, e.g. -p tag_dictionary=true
        #[arg(short = 'p', value_name = "NAME=VALUE")]
        parameters: Vec<String>,
        #[arg(value_name = "FILE")]
        datasets: Vec<PathBuf>,
    },
    /// Output the model stored in the file (MODEL) in a plain-text format
    Dump {
        #[arg(short, long, value_name = "MODEL")]
        model: PathBuf,
    },
}

fn train(model_path: PathBuf, parameters: &[String], dataset: PathBuf) -> Result<()> {
    let mut trainer = Trainer::new(dataset);
    for s in parameters {
        let (name, value) = split_parameter(s);
        trainer.set(name, value)?;
    }
    let model = trainer.train(None)?;
    model.save(&model_path)?;
    log::info!("write model to {}", model_path.display());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn tag(
    model_path: PathBuf,
    evaluate: bool,
    reference: bool,
    per_sentence: bool,
    quiet: bool,
    format: Format,
    parameters: &[String],
    datasets: Vec<PathBuf>,
) -> Result<()> {
    let model = Model::load(&model_path)?;
    let mut opts = DecodeOptions::default();
    for s in parameters {
        let (name, value) = split_parameter(s);
        opts.set(name, value)?;
    }
    let mut tagger = hmmtag::Tagger::with_options(&model, opts)?;

    let mut inputs = Vec::new();
    if datasets.is_empty() {
        inputs.push(Dataset::read(stdin().lock(), format)?);
    } else {
        for fpath in &datasets {
            inputs.push(Dataset::from_path(fpath, format)?);
        }
    }

    let begin = Instant::now();
    let mut evaluation = Evaluation::default();
    let mut out = BufWriter::new(stdout().lock());
    let mut n = 0;
    for ds in &inputs {
        for seq in &ds.seqs {
            let tagged = tagger.tag(&seq.tokens)?;
            let gold = seq.gold();
            if !quiet {
                match (&gold, reference) {
                    (Some(gold), true) => {
                        let pairs: Vec<String> =
                            tagged.tags.iter().zip(gold).map(|(p, r)| format!("{r}\t{p}")).collect();
                        write_tagged(&mut out, &seq.tokens, &pairs, format)?;
                    }
                    _ => write_tagged(&mut out, &seq.tokens, &tagged.tags, format)?,
                }
            }
            if evaluate {
                match &gold {
                    Some(gold) => {
                        evaluation.accumulate_decoded(
                            model.vocabulary(),
                            &seq.tokens,
                            gold,
                            &tagged.tags,
                            tagged.score,
                        )?;
                        if per_sentence {
                            let acc = hmmtag::accuracy(&tagged.tags, gold)?;
                            writeln!(out, "# sentence {n}: accuracy {acc:.4}")?;
                        }
                    }
                    None => log::warn!("sentence {n} has no reference tags"),
                }
            }
            n += 1;
        }
    }
    out.flush()?;
    let elapsed = begin.elapsed();
    if evaluate {
        println!("{evaluation}");
    }
    log::info!(
        "Elapsed time: {:?} ({:.1} [sentence/sec])",
        elapsed,
        n as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let argv = Argv::parse();
    log::info!("argv: {:?}", argv);
    match argv.command {
        Command::Train {
            model,
            parameters,
            dataset,
        } => train(model, &parameters, dataset),
        Command::Tag {
            model,
            evaluate,
            reference,
            per_sentence,
            quiet,
            format,
            parameters,
            datasets,
        } => tag(model, evaluate, reference, per_sentence, quiet, format, &parameters, datasets),
        Command::Dump { model } => Model::load(model)?.dump(stdout().lock()),
    }
}
