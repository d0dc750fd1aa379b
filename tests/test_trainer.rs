use std::{fs, io::Write};

use hmmtag::{Error, Model, TrainOptions, Trainer};
use tempfile::NamedTempFile;

fn init() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

fn corpus_file(text: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("failed to create file");
    f.write_all(text.as_bytes()).expect("failed to write corpus");
    f
}

fn bytes_file(bytes: &[u8]) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("failed to create file");
    f.write_all(bytes).expect("failed to write corpus");
    f
}

const CORPUS: &str = "###/###
The/D
dog/N
barks/V
./.
###/###
A/D
cat/N
sleeps/V
./.
###/###
The/D
old/J
dog/N
sleeps/V
./.
###/###
";

#[test]
fn train_from_file() {
    init();
    let f = corpus_file(CORPUS);
    let mut trainer = Trainer::default();
    let model = trainer.train(Some(f.path())).expect("failed to train");
    assert_eq!(model.stats().total(), 16);
    assert_eq!(model.vocabulary().num_tags(), 5);
    assert_eq!(trainer.source(), Some(f.path()));
}

#[test]
fn total_excludes_malformed_pairs() {
    init();
    // The broken line invalidates both pairs it takes part in.
    let f = corpus_file("###/###\nthe/D\ndog/N\nbroken line\nbarks/V\n###/###\n");
    let model = Trainer::new(f.path()).train(None).expect("failed to train");
    assert_eq!(model.stats().total(), 3);
    assert_eq!(model.stats().tokens.get(""), 3);
    assert_eq!(model.stats().tokens.get("barks"), 0);
    assert_eq!(model.stats().transitions.get("V/###"), 1);
}

#[test]
fn non_utf8_line_is_skipped() {
    init();
    let f = bytes_file(b"###/###\nthe/D\ndog/N\ncaf\xe9/N\nbarks/V\n###/###\n");
    let model = Trainer::new(f.path()).train(None).expect("failed to train");
    // Only the two pairs touching the undecodable line are dropped.
    assert_eq!(model.stats().total(), 3);
    assert_eq!(model.stats().transitions.get("D/N"), 1);
    assert_eq!(model.stats().transitions.get("V/###"), 1);
    assert_eq!(model.stats().tokens.get("barks"), 0);
}

#[test]
fn unique_counts_after_training() {
    init();
    let f = corpus_file(CORPUS);
    let model = Trainer::new(f.path()).train(None).expect("failed to train");
    let unique = &model.stats().unique_tokens;
    // "old" appears once, "dog" twice.
    assert_eq!(unique.get("old"), Some(1));
    assert_eq!(unique.get("dog"), Some(0));
}

#[test]
fn observed_probabilities_are_at_most_one() {
    init();
    let f = corpus_file(CORPUS);
    let model = Trainer::new(f.path()).train(None).expect("failed to train");
    let probs = model.probabilities();
    assert!(!probs.transitions.is_empty());
    assert!(!probs.emissions.is_empty());
    for (key, &p) in probs.transitions.iter().chain(&probs.emissions) {
        assert!(p.is_finite() && p <= 0.0, "{key}: {p}");
        assert!(p.exp() > 0.0, "{key}: {p}");
    }
}

#[test]
fn retraining_replaces_state() {
    init();
    let f = corpus_file(CORPUS);
    let mut trainer = Trainer::new(f.path());
    let first = trainer.train(None).expect("failed to train");
    let second = trainer.train(None).expect("failed to train");
    assert_eq!(first, second);
    assert_eq!(first.stats().total(), second.stats().total());

    let words = ["The", "cat", "barks", "."];
    let a = first.tagger().unwrap().tag(&words).unwrap();
    let b = second.tagger().unwrap().tag(&words).unwrap();
    assert_eq!(a.tags, b.tags);
    assert_eq!(a.score.to_bits(), b.score.to_bits());
}

#[test]
fn configured_source_is_remembered() {
    init();
    let a = corpus_file(CORPUS);
    let b = corpus_file("x/A\ny/B\n");
    let mut trainer = Trainer::new(a.path());
    let small = trainer.train(Some(b.path())).expect("failed to train");
    assert_eq!(small.stats().total(), 1);
    let again = trainer.train(None).expect("failed to train");
    assert_eq!(again, small);
}

#[test]
fn missing_training_file() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.txt");
    match Trainer::new(&path).train(None) {
        Err(Error::UnavailableResource { path: p, .. }) => assert_eq!(p, path),
        other => panic!("unexpected: {other:?}"),
    }
    assert!(matches!(Trainer::default().train(None), Err(Error::Configuration)));
}

#[test]
fn save_and_load() {
    init();
    let f = corpus_file(CORPUS);
    let mut trainer = Trainer::new(f.path()).with_options(TrainOptions { lambda_floor: 1e-50 });
    let model = trainer.train(None).expect("failed to train");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    model.save(&path).expect("failed to save model");
    assert!(fs::metadata(&path).unwrap().len() > 0);

    let loaded = Model::load(&path).expect("failed to load model");
    assert_eq!(loaded.options().lambda_floor, 1e-50);
    assert_eq!(loaded.stats(), model.stats());
    assert_eq!(loaded.vocabulary(), model.vocabulary());
    let words = ["A", "dog", "sleeps", "."];
    assert_eq!(
        loaded.tagger().unwrap().tag(&words).unwrap().tags,
        model.tagger().unwrap().tag(&words).unwrap().tags
    );
}

#[test]
fn load_invalid_model() {
    init();
    let f = corpus_file("not a model");
    assert!(matches!(Model::load(f.path()), Err(Error::InvalidModel(..))));
    assert!(matches!(
        Model::load("tests/does-not-exist.json"),
        Err(Error::UnavailableResource { .. })
    ));
}
