use super::{lattice::Lattice, model::Model, options::DecodeOptions};
use crate::{errors::Error, quark::StringTable, Result, BOUNDARY};

/// Decoded tags of one sentence and the log score of the best path.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged<'a> {
    pub tags: Vec<&'a str>,
    pub score: f64,
}

/// Viterbi decoder over a frozen [`Model`].
///
/// The tagger owns its score buffers and reuses them from one sentence to the next;
/// the model itself is only read, so many taggers can share it.
pub struct Tagger<'a> {
    model: &'a Model,
    opts: DecodeOptions,
    lattice: Lattice,
    labels: Vec<usize>,
}

#[allow(non_snake_case)]
impl<'a> Tagger<'a> {
    pub fn new(model: &'a Model) -> Result<Self> {
        Self::with_options(model, DecodeOptions::default())
    }

    pub fn with_options(model: &'a Model, opts: DecodeOptions) -> Result<Self> {
        let tags = model.vocabulary().tags();
        let L = tags.len();
        if L == 0 {
            return Err(Error::precondition("the model has no tags, train it first"));
        }
        let mut lattice = Lattice::new(L);
        /* Compute transition scores between two labels. */
        for (i, t1) in tags.iter().enumerate() {
            lattice.start[i] = model.transition(BOUNDARY, t1);
            for (j, t2) in tags.iter().enumerate() {
                lattice.trans[L * i + j] = model.transition(t1, t2);
            }
        }
        /* Without a counted boundary tag every closing transition has zero backoff. */
        if opts.close_sentence && model.stats().tags.get(BOUNDARY) > 0 {
            lattice.end = tags.iter().map(|t| model.transition(t, BOUNDARY)).collect();
        }
        Ok(Self {
            model,
            opts,
            lattice,
            labels: Vec::new(),
        })
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.opts
    }

    pub fn num_labels(&self) -> usize {
        self.lattice.num_labels
    }

    fn set_sentence<S: AsRef<str>>(&mut self, tokens: &[S]) {
        let L = self.lattice.num_labels;
        let vocab = self.model.vocabulary();
        self.lattice.set_num_items(tokens.len());
        self.lattice.reset_state();

        for (t, token) in tokens.iter().enumerate() {
            let token = token.as_ref();
            let row = L * t..L * (t + 1);
            for (j, tag) in vocab.tags().iter().enumerate() {
                self.lattice.state[L * t + j] = self.model.emission(tag, token);
            }
            if self.opts.tag_dictionary {
                if let Some(observed) = vocab.tags_of(token) {
                    let mask: Vec<bool> = vocab.tags().iter().map(|tag| observed.contains(tag)).collect();
                    /* Words seen only with the boundary tag keep every label. */
                    if mask.iter().any(|&m| m) {
                        self.lattice.allowed[row].copy_from_slice(&mask);
                    }
                }
            }
        }
    }

    /// Fills `labels` with the ids of the best tag sequence and returns its log score.
    pub fn viterbi<S: AsRef<str>>(&mut self, tokens: &[S], labels: &mut Vec<usize>) -> f64 {
        self.set_sentence(tokens);
        labels.clear();
        labels.resize(tokens.len(), 0);
        self.lattice.viterbi(labels)
    }

    /// Decodes one sentence.
    pub fn tag<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<Tagged<'a>> {
        let model: &'a Model = self.model;
        let mut labels = std::mem::take(&mut self.labels);
        let score = self.viterbi(tokens, &mut labels);
        let tags = labels
            .iter()
            .map(|&l| {
                model
                    .vocabulary()
                    .tags()
                    .to_str(l)
                    .ok_or_else(|| Error::precondition(format!("unknown label id {l}")))
            })
            .collect::<Result<Vec<_>>>();
        self.labels = labels;
        Ok(Tagged { tags: tags?, score })
    }

    /// Best score of the paths ending in label `l` at item `t` of the last decoded sentence.
    pub fn score_at(&self, t: usize, l: usize) -> f64 {
        self.lattice.score_at(t, l)
    }
}
