use std::{
    fs::File,
    io::{BufRead, BufReader, Write},
    path::Path,
};

use crate::{errors::Error, Result, BOUNDARY, SEPARATOR};

/// Splits a `token/tag` line into its two parts.
///
/// Returns `None` unless the trimmed line splits on the separator into exactly two
/// non-empty parts.
pub fn parse_pair(line: &str) -> Option<(&str, &str)> {
    let (token, tag) = line.trim().split_once(SEPARATOR)?;
    if token.is_empty() || tag.is_empty() || tag.contains(SEPARATOR) {
        return None;
    }
    Some((token, tag))
}

/// Layout of decoding input and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Format {
    /// One item per line, sentences separated by boundary or blank lines.
    #[default]
    Token,
    /// One sentence per line, items separated by whitespace.
    Sentence,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Sentence {
    pub tokens: Vec<String>,
    gold: Vec<Option<String>>,
}

impl Sentence {
    pub fn push(&mut self, token: &str, gold: Option<&str>) {
        self.tokens.push(token.to_string());
        self.gold.push(gold.map(str::to_string));
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Gold tags, available only when every item of the sentence carried one.
    pub fn gold(&self) -> Option<Vec<&str>> {
        self.gold.iter().map(|g| g.as_deref()).collect()
    }

    fn push_item(&mut self, item: &str) {
        if !item.contains(SEPARATOR) {
            self.push(item, None);
        } else if let Some((token, tag)) = parse_pair(item) {
            self.push(token, Some(tag));
        } else {
            log::warn!("invalid item: {item}");
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for Sentence {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut sentence = Sentence::default();
        for token in iter {
            sentence.push(token.as_ref(), None);
        }
        sentence
    }
}

fn is_boundary(line: &str) -> bool {
    line.is_empty() || line == BOUNDARY || parse_pair(line) == Some((BOUNDARY, BOUNDARY))
}

/// Sentences to decode, optionally carrying gold tags.
#[derive(Debug, Default)]
pub struct Dataset {
    pub seqs: Vec<Sentence>,
}

impl Dataset {
    pub fn read<R: BufRead>(reader: R, format: Format) -> Result<Self> {
        let mut ds = Dataset::default();
        let mut seq = Sentence::default();
        for line in reader.split(b'\n') {
            let line = line?;
            let Ok(line) = std::str::from_utf8(&line) else {
                log::warn!("invalid line: {:?}", String::from_utf8_lossy(&line));
                continue;
            };
            let line = line.trim();
            match format {
                Format::Token => {
                    if is_boundary(line) {
                        ds.append(std::mem::take(&mut seq));
                    } else {
                        seq.push_item(line);
                    }
                }
                Format::Sentence => {
                    for item in line.split_whitespace().filter(|s| !is_boundary(s)) {
                        seq.push_item(item);
                    }
                    ds.append(std::mem::take(&mut seq));
                }
            }
        }
        ds.append(seq);
        Ok(ds)
    }

    pub fn from_path<P: AsRef<Path>>(path: P, format: Format) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| Error::unavailable(path, e))?;
        Self::read(BufReader::new(f), format)
    }

    pub fn append(&mut self, seq: Sentence) {
        if !seq.is_empty() {
            self.seqs.push(seq);
        }
    }

    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }

    pub fn max_length(&self) -> usize {
        self.seqs.iter().map(|x| x.len()).max().unwrap_or_default()
    }

    pub fn total_items(&self) -> usize {
        self.seqs.iter().map(|x| x.len()).sum()
    }
}

/// Writes one tagged sentence in the given layout.
pub fn write_tagged<W, T, L>(w: &mut W, tokens: &[T], tags: &[L], format: Format) -> Result<()>
where
    W: Write,
    T: AsRef<str>,
    L: AsRef<str>,
{
    match format {
        Format::Token => {
            for (token, tag) in tokens.iter().zip(tags) {
                writeln!(w, "{}{SEPARATOR}{}", token.as_ref(), tag.as_ref())?;
            }
            writeln!(w, "{BOUNDARY}{SEPARATOR}{BOUNDARY}")?;
        }
        Format::Sentence => {
            let items: Vec<String> = tokens
                .iter()
                .zip(tags)
                .map(|(token, tag)| format!("{}{SEPARATOR}{}", token.as_ref(), tag.as_ref()))
                .collect();
            writeln!(w, "{}", items.join(" "))?;
        }
    }
    Ok(())
}
