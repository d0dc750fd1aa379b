//! Bigram hidden Markov model part-of-speech tagger.
//!
//! Training reads `token/tag` lines, counts unigrams, tag bigrams and emissions, and
//! freezes one-count smoothed log-probabilities into a [`Model`]. A [`Tagger`] decodes
//! sentences with the Viterbi algorithm and an [`Evaluation`] scores the output against
//! gold tags.
//!
//! ```no_run
//! use hmmtag::{Evaluation, Trainer};
//!
//! let model = Trainer::default().train(Some("train.txt".as_ref()))?;
//! let mut tagger = model.tagger()?;
//! let tagged = tagger.tag(&["the", "dog", "barks"])?;
//! let mut evaluation = Evaluation::default();
//! evaluation.accumulate(&["D", "N", "V"], &tagged.tags)?;
//! # Ok::<(), hmmtag::Error>(())
//! ```

pub mod dataset;
pub mod errors;
pub mod evaluation;
pub mod hmm;
pub mod quark;

pub use dataset::{Dataset, Format, Sentence};
pub use errors::{Error, Result};
pub use evaluation::{accuracy, Estimation, Evaluation};
pub use hmm::{
    model::Model,
    options::{DecodeOptions, TrainOptions},
    tagger::{Tagged, Tagger},
    trainer::{train, Trainer},
};

/// Token and tag of the sentence boundary pair `###/###`.
pub const BOUNDARY: &str = "###";

/// Separator between token and tag, and between the parts of composite count keys.
pub const SEPARATOR: char = '/';
