use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::counts::{CorpusStatistics, TOTAL};
use crate::{
    quark::{Quark, StringTable, TextVectorizer},
    BOUNDARY, SEPARATOR,
};

/// Known tokens, known tags and the tags observed with each token.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    tokens: HashSet<String>,
    /// Known tags in sorted order; the id of a tag is its state index in decoding.
    tags: Quark,
    tag_dicts: HashMap<String, BTreeSet<String>>,
}

impl Vocabulary {
    pub fn new(stats: &CorpusStatistics) -> Self {
        let tokens = stats
            .tokens
            .keys()
            .filter(|k| *k != TOTAL && !k.contains(SEPARATOR))
            .map(str::to_string)
            .collect();

        let sorted: BTreeSet<&str> = stats
            .tags
            .keys()
            .filter(|k| !k.is_empty() && *k != BOUNDARY && !k.contains(SEPARATOR))
            .collect();
        let mut tags = Quark::default();
        for tag in sorted {
            tags.find_or_insert(tag);
        }

        let mut tag_dicts: HashMap<String, BTreeSet<String>> = HashMap::new();
        for (key, n) in stats.emissions.iter() {
            if n == 0 {
                continue;
            }
            if let Some((tag, token)) = key.split_once(SEPARATOR) {
                tag_dicts
                    .entry(token.to_string())
                    .or_default()
                    .insert(tag.to_string());
            }
        }

        Self {
            tokens,
            tags,
            tag_dicts,
        }
    }

    pub fn is_known(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Size of the known-token set.
    pub fn num_tokens(&self) -> usize {
        self.tokens.len()
    }

    pub fn num_tags(&self) -> usize {
        self.tags.len()
    }

    pub fn tags(&self) -> &Quark {
        &self.tags
    }

    /// Tags observed with `token` in training, if any.
    pub fn tags_of(&self, token: &str) -> Option<&BTreeSet<String>> {
        self.tag_dicts.get(token)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}
