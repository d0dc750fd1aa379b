use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use super::{
    counts::{bigram_key, emission_key, CorpusStatistics},
    options::TrainOptions,
    tagger::Tagger,
    vocab::Vocabulary,
};
use crate::{errors::Error, Result, SEPARATOR};

/// One-count smoothed estimates over a set of finished counts.
///
/// Transition:
///   lambda = one-count weight of t1, backoff = c(t2) / (N - 1),
///   P(t2|t1) = (c(t1,t2) + lambda * backoff) / (c(t1) + lambda)
///
/// Emission:
///   lambda = one-count weight of w, backoff = (c(w) + 1) / (N + V),
///   P(w|t) = (c(t,w) + lambda * backoff) / (c(t) + lambda)
///
/// Unobserved events evaluate the same formulas with a zero joint count.
struct Estimator<'a> {
    stats: &'a CorpusStatistics,
    vocab_size: usize,
    lambda_floor: f64,
}

impl Estimator<'_> {
    fn lambda(&self, weight: Option<u64>) -> f64 {
        match weight {
            Some(n) if n > 0 => n as f64,
            _ => self.lambda_floor,
        }
    }

    fn transition(&self, t1: &str, t2: &str) -> f64 {
        let stats = self.stats;
        let lambda = self.lambda(stats.unique_tags.get(t1));
        let backoff = stats.tags.get(t2) as f64 / stats.total().saturating_sub(1).max(1) as f64;
        let num = stats.transitions.get(&bigram_key(t1, t2)) as f64 + lambda * backoff;
        let den = stats.tags.get(t1) as f64 + lambda;
        (num / den).ln()
    }

    fn emission(&self, tag: &str, token: &str) -> f64 {
        let stats = self.stats;
        let lambda = self.lambda(stats.unique_tokens.get(token));
        let backoff =
            (stats.tokens.get(token) + 1) as f64 / (stats.total() as f64 + self.vocab_size as f64);
        let num = stats.emissions.get(&emission_key(tag, token)) as f64 + lambda * backoff;
        let den = stats.tags.get(tag) as f64 + lambda;
        (num / den).ln()
    }
}

/// Natural-log probabilities of every observed transition and emission key.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityTable {
    pub transitions: HashMap<String, f64>,
    pub emissions: HashMap<String, f64>,
}

/// A trained tagging model. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    stats: CorpusStatistics,
    vocab: Vocabulary,
    probs: ProbabilityTable,
    opts: TrainOptions,
}

impl Model {
    /// Derives the vocabulary and freezes the probability tables from finished counts.
    pub fn new(stats: CorpusStatistics, opts: TrainOptions) -> Self {
        let vocab = Vocabulary::new(&stats);
        let est = Estimator {
            stats: &stats,
            vocab_size: vocab.num_tokens(),
            lambda_floor: opts.lambda_floor,
        };
        let transitions = stats
            .transitions
            .keys()
            .filter_map(|k| {
                let (t1, t2) = k.split_once(SEPARATOR)?;
                Some((k.to_string(), est.transition(t1, t2)))
            })
            .collect();
        let emissions = stats
            .emissions
            .keys()
            .filter_map(|k| {
                let (tag, token) = k.split_once(SEPARATOR)?;
                Some((k.to_string(), est.emission(tag, token)))
            })
            .collect();
        Self {
            probs: ProbabilityTable {
                transitions,
                emissions,
            },
            stats,
            vocab,
            opts,
        }
    }

    fn estimator(&self) -> Estimator<'_> {
        Estimator {
            stats: &self.stats,
            vocab_size: self.vocab.num_tokens(),
            lambda_floor: self.opts.lambda_floor,
        }
    }

    /// log P(t2 | t1), falling back to the smoothed estimate for unseen bigrams.
    pub fn transition(&self, t1: &str, t2: &str) -> f64 {
        match self.probs.transitions.get(&bigram_key(t1, t2)) {
            Some(&p) => p,
            None => self.estimator().transition(t1, t2),
        }
    }

    /// log P(token | tag), falling back to the smoothed estimate for unseen pairs.
    pub fn emission(&self, tag: &str, token: &str) -> f64 {
        match self.probs.emissions.get(&emission_key(tag, token)) {
            Some(&p) => p,
            None => self.estimator().emission(tag, token),
        }
    }

    pub fn stats(&self) -> &CorpusStatistics {
        &self.stats
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn probabilities(&self) -> &ProbabilityTable {
        &self.probs
    }

    pub fn options(&self) -> &TrainOptions {
        &self.opts
    }

    pub fn num_labels(&self) -> usize {
        self.vocab.num_tags()
    }

    pub fn tagger(&self) -> Result<Tagger<'_>> {
        Tagger::new(self)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let model: Self = serde_json::from_reader(reader)?;
        if !TrainOptions::is_valid_floor(model.opts.lambda_floor) {
            return Err(Error::InvalidModel(format!(
                "lambda_floor must be positive and finite, got {}",
                model.opts.lambda_floor
            )));
        }
        Ok(model)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| Error::unavailable(path, e))?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let f = File::create(path).map_err(|e| Error::unavailable(path, e))?;
        let mut w = BufWriter::new(f);
        self.to_writer(&mut w)?;
        w.flush()?;
        Ok(())
    }

    /// Writes the vocabulary and probability tables as plain text, keys sorted.
    pub fn dump<W: Write>(&self, mut w: W) -> Result<()> {
        writeln!(w, "TOTAL: {}", self.stats.total())?;
        writeln!(w, "TAGS: {}", self.vocab.num_tags())?;
        for (i, tag) in self.vocab.tags().iter().enumerate() {
            writeln!(w, "\t{i}: {tag} ({})", self.stats.tags.get(tag))?;
        }
        let mut tokens: Vec<&str> = self.vocab.tokens().collect();
        tokens.sort_unstable();
        writeln!(w, "TOKENS: {}", tokens.len())?;
        for token in tokens {
            writeln!(w, "\t{token} ({})", self.stats.tokens.get(token))?;
        }
        let mut trans: Vec<_> = self.probs.transitions.iter().collect();
        trans.sort_unstable_by(|a, b| a.0.cmp(b.0));
        writeln!(w, "TRANSITIONS: {}", trans.len())?;
        for (key, p) in trans {
            writeln!(w, "\t{key}: {p:.6}")?;
        }
        let mut emiss: Vec<_> = self.probs.emissions.iter().collect();
        emiss.sort_unstable_by(|a, b| a.0.cmp(b.0));
        writeln!(w, "EMISSIONS: {}", emiss.len())?;
        for (key, p) in emiss {
            writeln!(w, "\t{key}: {p:.6}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_of(lines: &[&str]) -> Model {
        let mut stats = CorpusStatistics::default();
        for w in lines.windows(2) {
            stats.count_lines(w[0], w[1]);
        }
        Model::new(stats, TrainOptions::default())
    }

    const CORPUS: &[&str] = &[
        "###/###", "the/D", "dog/N", "barks/V", "###/###", "a/D", "cat/N", "sleeps/V", "###/###",
        "the/D", "old/J", "dog/N", "sleeps/V", "###/###",
    ];

    #[test]
    fn transition_formula() {
        let m = model_of(CORPUS);
        let s = m.stats();
        // D was seen three times, so its one-count weight drops to the floor.
        assert_eq!(s.total(), 13);
        assert_eq!(s.tags.get("D"), 3);
        assert_eq!(s.unique_tags.get("D"), Some(0));
        let lambda: f64 = 1e-100;
        let backoff: f64 = 3.0 / 12.0;
        let expected = ((2.0 + lambda * backoff) / (3.0 + lambda)).ln();
        assert_eq!(m.transition("D", "N"), expected);
        assert_eq!(m.probabilities().transitions["D/N"], expected);
    }

    #[test]
    fn emission_formula() {
        let m = model_of(CORPUS);
        // "old" is seen exactly once, so its one-count weight is 1.
        let lambda: f64 = 1.0;
        let backoff = 2.0 / (13.0 + m.vocabulary().num_tokens() as f64);
        let expected = ((1.0 + lambda * backoff) / (1.0 + lambda)).ln();
        assert_eq!(m.emission("J", "old"), expected);
    }

    #[test]
    fn observed_probabilities_are_bounded() {
        let m = model_of(CORPUS);
        for (k, &p) in m.probabilities().transitions.iter().chain(&m.probabilities().emissions) {
            assert!(p <= 0.0, "{k}: {p}");
            assert!(p.is_finite(), "{k}: {p}");
        }
    }

    #[test]
    fn unseen_events_are_finite() {
        let m = model_of(CORPUS);
        assert!(!m.probabilities().transitions.contains_key("J/V"));
        let p = m.transition("J", "V");
        assert!(p.is_finite() && p < 0.0);
        let p = m.emission("N", "zebra");
        assert!(p.is_finite() && p < 0.0);
        // Unseen events are strictly less likely than the observed ones.
        assert!(m.emission("N", "dog") > m.emission("V", "dog"));
    }

    #[test]
    fn json_roundtrip_keeps_model() {
        let m = model_of(CORPUS);
        let mut buf = Vec::new();
        m.to_writer(&mut buf).unwrap();
        let back = Model::from_reader(buf.as_slice()).unwrap();
        assert_eq!(back.stats(), m.stats());
        assert_eq!(back.vocabulary(), m.vocabulary());
        assert!((back.transition("D", "N") - m.transition("D", "N")).abs() < 1e-12);
    }

    #[test]
    fn invalid_model() {
        assert!(matches!(Model::from_reader(&b"{\"stats\": 3}"[..]), Err(Error::InvalidModel(..))));
        assert!(matches!(Model::from_reader(&b""[..]), Err(Error::InvalidModel(..))));
    }

    #[test]
    fn reject_non_positive_floor() {
        let m = model_of(CORPUS);
        for floor in [0.0, -1e-100] {
            let mut value = serde_json::to_value(&m).unwrap();
            value["opts"]["lambda_floor"] = serde_json::json!(floor);
            let buf = serde_json::to_vec(&value).unwrap();
            assert!(matches!(Model::from_reader(buf.as_slice()), Err(Error::InvalidModel(..))));
        }
    }

    #[test]
    fn dump_lists_tables() {
        let m = model_of(CORPUS);
        let mut out = Vec::new();
        m.dump(&mut out).unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.starts_with("TOTAL: 13\nTAGS: 4\n\t0: D (3)\n"));
        assert!(s.contains("\tD/N: "));
        assert!(s.contains("\tN/dog: "));
    }
}
