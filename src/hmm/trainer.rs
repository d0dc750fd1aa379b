use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    time::Instant,
};

use super::{counts::CorpusStatistics, model::Model, options::TrainOptions};
use crate::{errors::Error, Result};

/// Trains a model from `token/tag` lines in document order.
///
/// Every pair of consecutive lines is counted once; a pair with a malformed line on
/// either side is skipped.
pub fn train<I, S>(lines: I, opts: TrainOptions) -> Model
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let begin = Instant::now();
    let mut stats = CorpusStatistics::default();
    let mut prev: Option<S> = None;
    let mut skipped = 0;
    for line in lines {
        if let Some(x) = &prev {
            if !stats.count_lines(x.as_ref(), line.as_ref()) {
                skipped += 1;
            }
        }
        prev = Some(line);
    }
    let model = Model::new(stats, opts);
    log::info!(
        "trained on {} pairs ({} skipped), {} tokens, {} tags, time cost: {:?}",
        model.stats().total(),
        skipped,
        model.vocabulary().num_tokens(),
        model.vocabulary().num_tags(),
        begin.elapsed()
    );
    model
}

/// Trains models from files, remembering the last training file used.
#[derive(Debug, Default, Clone)]
pub struct Trainer {
    source: Option<PathBuf>,
    opts: TrainOptions,
}

impl Trainer {
    pub fn new<P: Into<PathBuf>>(source: P) -> Self {
        Self {
            source: Some(source.into()),
            ..Default::default()
        }
    }

    pub fn with_options(mut self, opts: TrainOptions) -> Self {
        self.opts = opts;
        self
    }

    /// Sets a training parameter, see [`TrainOptions::set`].
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        self.opts.set(name, value)
    }

    pub fn options(&self) -> &TrainOptions {
        &self.opts
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Trains a fresh model from `path`, or from the previously configured file.
    pub fn train(&mut self, path: Option<&Path>) -> Result<Model> {
        if let Some(path) = path {
            self.source = Some(path.to_path_buf());
        }
        let path = self.source.as_deref().ok_or(Error::Configuration)?;
        log::info!("train from {}", path.display());
        let f = File::open(path).map_err(|e| Error::unavailable(path, e))?;
        let mut failure = None;
        let lines = BufReader::new(f)
            .split(b'\n')
            .map_while(|line| line.map_err(|e| failure = Some(e)).ok())
            .map(|bytes| {
                /* A line that is not UTF-8 counts as malformed; it breaks both of its pairs. */
                String::from_utf8(bytes).unwrap_or_else(|e| {
                    log::debug!("skip line that is not UTF-8: {:?}", String::from_utf8_lossy(e.as_bytes()));
                    String::new()
                })
            });
        let model = train(lines, self.opts);
        match failure {
            Some(e) => Err(Error::unavailable(path, e)),
            None => Ok(model),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn train_lines() {
        let model = train("the/D\nquick/J\nfox/N\njumps/V".lines(), TrainOptions::default());
        assert_eq!(model.stats().total(), 3);
        assert_eq!(model.stats().transitions.get("D/J"), 1);
        assert_eq!(model.stats().transitions.get("J/N"), 1);
        assert_eq!(model.stats().transitions.get("N/V"), 1);
    }

    #[test]
    fn empty_line_breaks_both_pairs() {
        let lines = ["###/###", "the/D", "dog/N", "", "barks/V", "###/###"];
        let model = train(lines, TrainOptions::default());
        assert_eq!(model.stats().total(), 3);
    }

    #[test]
    fn no_source() {
        let mut trainer = Trainer::default();
        assert!(matches!(trainer.train(None), Err(Error::Configuration)));
    }

    #[test]
    fn missing_source() {
        let mut trainer = Trainer::new("does/not/exist.txt");
        assert!(matches!(trainer.train(None), Err(Error::UnavailableResource { .. })));
    }
}
