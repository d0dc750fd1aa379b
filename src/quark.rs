use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Bidirectional mapping between strings and dense ids.
pub trait StringTable {
    fn to_str(&self, id: usize) -> Option<&str>;
    fn to_id(&self, s: &str) -> Option<usize>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait TextVectorizer {
    fn find_or_insert(&mut self, key: &str) -> usize;
}

/// String table assigning ids in insertion order.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Quark {
    v: Vec<String>,
    m: HashMap<String, usize>,
}

impl From<Vec<String>> for Quark {
    fn from(value: Vec<String>) -> Self {
        let m = value.iter().enumerate().map(|(i, s)| (s.to_string(), i)).collect();
        Self { v: value, m }
    }
}

impl From<Quark> for Vec<String> {
    fn from(value: Quark) -> Self {
        value.v
    }
}

impl StringTable for Quark {
    fn to_str(&self, id: usize) -> Option<&str> {
        self.v.get(id).map(|x| x.as_str())
    }

    fn to_id(&self, s: &str) -> Option<usize> {
        self.m.get(s).copied()
    }

    fn len(&self) -> usize {
        self.v.len()
    }
}

impl TextVectorizer for Quark {
    fn find_or_insert(&mut self, key: &str) -> usize {
        if let Some(&idx) = self.m.get(key) {
            return idx;
        }
        let idx = self.v.len();
        self.m.insert(key.to_string(), idx);
        self.v.push(key.to_string());
        idx
    }
}

impl Quark {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.v.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_by_str() {
        let mut quark = Quark::default();
        for (s, id) in [("NN", 0), ("VB", 1), ("DT", 2), ("JJ", 3), ("DT", 2), ("VB", 1), ("NN", 0), ("IN", 4)] {
            assert_eq!(id, quark.find_or_insert(s), "{} != {}", s, id);
        }
    }

    #[test]
    fn find_by_id() {
        let mut quark = Quark::default();
        quark.find_or_insert("NN");
        quark.find_or_insert("VB");
        assert_eq!(quark.to_str(0), Some("NN"));
        assert_eq!(quark.to_str(1), Some("VB"));
        assert_eq!(quark.to_str(2), None);
        assert_eq!(quark.to_id("VB"), Some(1));
    }

    #[test]
    fn serialize_as_list() {
        let quark = Quark::from(vec!["D".to_string(), "N".to_string()]);
        let s = serde_json::to_string(&quark).unwrap();
        assert_eq!(s, r#"["D","N"]"#);
        let back: Quark = serde_json::from_str(&s).unwrap();
        assert_eq!(back, quark);
    }
}
