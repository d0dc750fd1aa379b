/// Tag grammar of the synthetic corpus: each tag lists the tags that may follow it.
const GRAMMAR: &[(&str, &[&str])] = &[
    ("D", &["N", "J"]),
    ("J", &["N", "J"]),
    ("N", &["V", "P", "."]),
    ("V", &["D", "P", "R", "."]),
    ("P", &["D", "N"]),
    ("R", &["."]),
];

struct Lcg(u64);

impl Lcg {
    fn next(&mut self, n: usize) -> usize {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % n
    }
}

/// Generates `n` sentences as `token/tag` lines framed by boundary lines.
pub fn corpus(n: usize, seed: u64) -> Vec<String> {
    let mut rng = Lcg(seed);
    let mut lines = vec!["###/###".to_string()];
    for _ in 0..n {
        let mut tag = "D";
        while tag != "." {
            let word = rng.next(200);
            lines.push(format!("{}{word}/{tag}", tag.to_lowercase()));
            let next = GRAMMAR.iter().find(|(t, _)| *t == tag).map(|(_, n)| *n).unwrap_or(&["."]);
            tag = next[rng.next(next.len())];
        }
        lines.push("./.".to_string());
        lines.push("###/###".to_string());
    }
    lines
}

/// Token sequences of `n` generated sentences.
#[allow(dead_code)]
pub fn sentences(n: usize, seed: u64) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    let mut seq = Vec::new();
    for line in corpus(n, seed).into_iter().skip(1) {
        match hmmtag::dataset::parse_pair(&line) {
            Some(("###", "###")) => out.push(std::mem::take(&mut seq)),
            Some((token, _)) => seq.push(token.to_string()),
            None => {}
        }
    }
    out
}
