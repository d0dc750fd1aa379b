use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{dataset::parse_pair, SEPARATOR};

/// Key holding the total number of counted pairs in the token table.
pub const TOTAL: &str = "";

/// String keyed counts; a missing key counts 0.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountTable(HashMap<String, u64>);

impl CountTable {
    pub fn get(&self, key: &str) -> u64 {
        self.0.get(key).copied().unwrap_or_default()
    }

    /// Increments `key` and returns its new count.
    pub fn incr(&mut self, key: &str) -> u64 {
        let n = self.0.entry(key.to_string()).or_default();
        *n += 1;
        *n
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Number of keys whose count is exactly one, tracked per unigram key.
///
/// The value moves up on a 0 -> 1 transition of the paired count and back down on
/// 1 -> 2, so it is exact at any point of the stream.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueCountTable(HashMap<String, u64>);

impl UniqueCountTable {
    /// The one-count weight of `key`, or `None` if it was never tracked.
    pub fn get(&self, key: &str) -> Option<u64> {
        self.0.get(key).copied()
    }

    fn update(&mut self, key: &str, count: u64) {
        match count {
            1 => *self.0.entry(key.to_string()).or_default() += 1,
            2 => {
                if let Some(n) = self.0.get_mut(key) {
                    *n = n.saturating_sub(1);
                }
            }
            _ => {}
        }
    }
}

pub fn bigram_key(t1: &str, t2: &str) -> String {
    format!("{t1}{SEPARATOR}{t2}")
}

pub fn emission_key(tag: &str, token: &str) -> String {
    format!("{tag}{SEPARATOR}{token}")
}

/// Raw counts gathered from consecutive training pairs.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusStatistics {
    /// Unigram token counts plus the total under [`TOTAL`].
    pub tokens: CountTable,
    /// Unigram tag counts.
    pub tags: CountTable,
    /// Tag bigram counts keyed `prev/curr`.
    pub transitions: CountTable,
    /// Emission counts keyed `tag/token`.
    pub emissions: CountTable,
    pub unique_tokens: UniqueCountTable,
    pub unique_tags: UniqueCountTable,
}

impl CorpusStatistics {
    /// Counts one pair of consecutive `(token, tag)` examples.
    pub fn count(&mut self, prev: (&str, &str), curr: (&str, &str)) {
        let (_, prev_tag) = prev;
        let (token, tag) = curr;

        self.tokens.incr(TOTAL);

        let n = self.tokens.incr(token);
        self.unique_tokens.update(token, n);

        let n = self.tags.incr(tag);
        self.unique_tags.update(tag, n);

        self.transitions.incr(&bigram_key(prev_tag, tag));
        self.emissions.incr(&emission_key(tag, token));
    }

    /// Counts two consecutive raw lines; returns `false` and leaves the counts untouched
    /// when either line is not a well-formed `token/tag` pair.
    pub fn count_lines(&mut self, prev: &str, curr: &str) -> bool {
        match (parse_pair(prev), parse_pair(curr)) {
            (Some(x), Some(y)) => {
                self.count(x, y);
                true
            }
            _ => {
                log::debug!("skip malformed pair: {:?} -> {:?}", prev.trim(), curr.trim());
                false
            }
        }
    }

    /// Number of pairs counted so far.
    pub fn total(&self) -> u64 {
        self.tokens.get(TOTAL)
    }
}
