use std::{collections::BTreeMap, fmt::Display, iter::zip};

use crate::{errors::Error, hmm::vocab::Vocabulary, Result};

/// Fraction of positions where `prediction` matches `reference`.
///
/// Empty sequences score 0.
pub fn accuracy<P: AsRef<str>, R: AsRef<str>>(prediction: &[P], reference: &[R]) -> Result<f64> {
    check_lengths(reference.len(), prediction.len())?;
    let matched = zip(prediction, reference)
        .filter(|(p, r)| p.as_ref() == r.as_ref())
        .count();
    Ok(Measure::new(matched, reference.len()).ratio())
}

fn check_lengths(reference: usize, prediction: usize) -> Result<()> {
    if reference != prediction {
        return Err(Error::precondition(format!(
            "cannot score {prediction} predicted tags against {reference} reference tags"
        )));
    }
    Ok(())
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Measure {
    pub n_match: usize,
    pub n_total: usize,
}

impl Measure {
    pub fn new(n_match: usize, n_total: usize) -> Self {
        Self { n_match, n_total }
    }

    #[inline]
    pub fn ratio(&self) -> f64 {
        if self.n_total == 0 {
            return 0.0;
        }
        self.n_match as f64 / self.n_total as f64
    }

    fn add(&mut self, matched: bool) {
        self.n_total += 1;
        if matched {
            self.n_match += 1;
        }
    }
}

impl Display for Measure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} => {:.4}", self.n_match, self.n_total, self.ratio())
    }
}

/// Label-wise performance values.
#[derive(Debug, Default, Clone, PartialEq)]
struct LabelMeasure {
    /// Number of correct predictions.
    num_correct: usize,
    /** Number of occurrences of the label in the gold-standard data. */
    num_observation: usize,
    /** Number of predictions. */
    num_prediction: usize,
}

impl LabelMeasure {
    fn precision(&self) -> f64 {
        Measure::new(self.num_correct, self.num_prediction).ratio()
    }

    fn recall(&self) -> f64 {
        Measure::new(self.num_correct, self.num_observation).ratio()
    }

    fn fmeasure(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r > 0.0 {
            p * r * 2.0 / (p + r)
        } else {
            0.0
        }
    }
}

/// Summary returned by [`Evaluation::evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Estimation {
    pub accuracy: f64,
    pub known_accuracy: f64,
    pub novel_accuracy: f64,
    pub sentence_accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
    /// Perplexity per tagged word; `None` until a decoded score was accumulated.
    pub perplexity: Option<f64>,
}

/// Tagging performance accumulated over a corpus, weighted by token.
#[derive(Debug, Default, Clone)]
pub struct Evaluation {
    /** Array of label-wise evaluations. */
    tbl: BTreeMap<String, LabelMeasure>,
    /** Correctly predicted items over all items. */
    items: Measure,
    /** Items whose token is in the training vocabulary. */
    known: Measure,
    /** Items whose token is not in the training vocabulary. */
    novel: Measure,
    /** Fully correct sentences over all sentences. */
    instances: Measure,
    /** Sum of the best path log scores. */
    log_prob: f64,
    /** Number of items covered by `log_prob`. */
    scored_items: usize,
}

impl Evaluation {
    /// Accumulates one sentence of predicted tags against its reference tags.
    pub fn accumulate<R: AsRef<str>, P: AsRef<str>>(
        &mut self,
        reference: &[R],
        prediction: &[P],
    ) -> Result<()> {
        check_lengths(reference.len(), prediction.len())?;
        let mut matched = 0;
        for (r, p) in zip(reference, prediction) {
            let (r, p) = (r.as_ref(), p.as_ref());
            self.tbl.entry(r.to_string()).or_default().num_observation += 1;
            self.tbl.entry(p.to_string()).or_default().num_prediction += 1;
            if r == p {
                self.tbl.entry(r.to_string()).or_default().num_correct += 1;
                matched += 1;
            }
            self.items.add(r == p);
        }
        self.instances.add(matched == prediction.len());
        Ok(())
    }

    /// Like [`Evaluation::accumulate`], additionally splitting accuracy into known and
    /// novel tokens and recording the decoded path score for perplexity.
    pub fn accumulate_decoded<T, R, P>(
        &mut self,
        vocab: &Vocabulary,
        tokens: &[T],
        reference: &[R],
        prediction: &[P],
        score: f64,
    ) -> Result<()>
    where
        T: AsRef<str>,
        R: AsRef<str>,
        P: AsRef<str>,
    {
        check_lengths(tokens.len(), reference.len())?;
        self.accumulate(reference, prediction)?;
        for ((token, r), p) in zip(zip(tokens, reference), prediction) {
            let matched = r.as_ref() == p.as_ref();
            if vocab.is_known(token.as_ref()) {
                self.known.add(matched);
            } else {
                self.novel.add(matched);
            }
        }
        self.log_prob += score;
        self.scored_items += tokens.len();
        Ok(())
    }

    pub fn items(&self) -> Measure {
        self.items
    }

    pub fn known(&self) -> Measure {
        self.known
    }

    pub fn novel(&self) -> Measure {
        self.novel
    }

    pub fn instances(&self) -> Measure {
        self.instances
    }

    /// Item accuracy, total correct over total tokens.
    pub fn accuracy(&self) -> f64 {
        self.items.ratio()
    }

    pub fn perplexity(&self) -> Option<f64> {
        if self.scored_items == 0 {
            return None;
        }
        Some((-self.log_prob / self.scored_items as f64).exp())
    }

    pub fn evaluate(&self) -> Estimation {
        let observed: Vec<&LabelMeasure> = self.tbl.values().filter(|l| l.num_observation > 0).collect();
        let n = observed.len().max(1) as f64;
        Estimation {
            accuracy: self.items.ratio(),
            known_accuracy: self.known.ratio(),
            novel_accuracy: self.novel.ratio(),
            sentence_accuracy: self.instances.ratio(),
            precision: observed.iter().map(|l| l.precision()).sum::<f64>() / n,
            recall: observed.iter().map(|l| l.recall()).sum::<f64>() / n,
            fmeasure: observed.iter().map(|l| l.fmeasure()).sum::<f64>() / n,
            perplexity: self.perplexity(),
        }
    }
}

impl Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let est = self.evaluate();
        writeln!(f, "Performance by label (#match, #model, #ref) (precision, recall, F1):")?;
        for (label, lev) in &self.tbl {
            if lev.num_observation == 0 {
                writeln!(
                    f,
                    "\t{}: ({}, {}, {}) (******, ******, ******)",
                    label, lev.num_correct, lev.num_prediction, lev.num_observation
                )?;
            } else {
                writeln!(
                    f,
                    "\t{}: ({}, {}, {}) ({:.4}, {:.4}, {:.4})",
                    label,
                    lev.num_correct,
                    lev.num_prediction,
                    lev.num_observation,
                    lev.precision(),
                    lev.recall(),
                    lev.fmeasure()
                )?;
            }
        }
        writeln!(
            f,
            "Macro-average precision, recall, F1: ({:.4}, {:.4}, {:.4})",
            est.precision, est.recall, est.fmeasure
        )?;
        writeln!(f, "Item accuracy: {}", self.items)?;
        if self.known.n_total + self.novel.n_total > 0 {
            writeln!(f, "Known accuracy: {}", self.known)?;
            writeln!(f, "Novel accuracy: {}", self.novel)?;
        }
        if let Some(p) = est.perplexity {
            writeln!(f, "Perplexity per tagged word: {p:.3}")?;
        }
        write!(f, "Sentence accuracy: {}", self.instances)
    }
}
