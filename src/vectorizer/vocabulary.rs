use crate::parser::Document;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Every distinct link target seen in the corpus.
///
/// Iteration order is lexicographic, so the membership prefix of a feature
/// vector does not depend on the order documents were read in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    targets: BTreeSet<String>,
}

impl Vocabulary {
    pub fn build(documents: &[Document]) -> Self {
        let targets = documents
            .iter()
            .flat_map(|doc| doc.links.iter().cloned())
            .collect();
        Self { targets }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn contains(&self, target: &str) -> bool {
        self.targets.contains(target)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(String::as_str)
    }

    /// 1.0 for every vocabulary entry the links mention, 0.0 otherwise
    pub fn membership(&self, links: &[String]) -> Vec<f64> {
        let present: HashSet<&str> = links.iter().map(String::as_str).collect();
        self.iter()
            .map(|target| if present.contains(target) { 1.0 } else { 0.0 })
            .collect()
    }
}
