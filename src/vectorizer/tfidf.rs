//! TF-IDF text model
//!
//! Fit once over the paragraph text of the whole corpus, then reused
//! unchanged for every document so all text vectors share one coordinate
//! space.

use super::stopwords::is_stopword;
use crate::error::{Result, WikidexError};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

lazy_static! {
    // Runs of two or more word characters
    static ref TOKEN: Regex = Regex::new(r"\b\w\w+\b").expect("valid token pattern");
}

/// Lowercase, tokenize and drop stopwords.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !is_stopword(t))
        .map(|t| t.to_string())
        .collect()
}

/// Build the n-grams of `tokens` for every n in `min..=max`, unigrams first.
pub fn ngrams(tokens: &[String], min: usize, max: usize) -> Vec<String> {
    let mut out = Vec::new();
    for n in min.max(1)..=max {
        if n > tokens.len() {
            break;
        }
        out.extend(tokens.windows(n).map(|w| w.join(" ")));
    }
    out
}

/// Fitted term-weighting model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextModel {
    /// Terms in feature order
    terms: Vec<String>,
    index: HashMap<String, usize>,
    idf: Vec<f64>,
    ngram_range: (usize, usize),
}

impl TextModel {
    /// Fit over `corpus` with unigrams and bigrams.
    pub fn fit<S: AsRef<str>>(corpus: &[S]) -> Result<Self> {
        Self::fit_with_range(corpus, (1, 2))
    }

    pub fn fit_with_range<S: AsRef<str>>(corpus: &[S], ngram_range: (usize, usize)) -> Result<Self> {
        if corpus.is_empty() {
            return Err(WikidexError::EmptyCorpus(
                "no documents to fit the text model on".to_string(),
            ));
        }

        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for text in corpus {
            let grams = ngrams(&tokenize(text.as_ref()), ngram_range.0, ngram_range.1);
            let unique: HashSet<String> = grams.into_iter().collect();
            for gram in unique {
                *doc_freq.entry(gram).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(WikidexError::EmptyCorpus(
                "paragraph text is empty or contains only stopwords".to_string(),
            ));
        }

        // Smoothed idf, as if one extra document contained every term
        let n_docs = corpus.len() as f64;
        let mut terms = Vec::with_capacity(doc_freq.len());
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (term, df) in doc_freq {
            idf.push(((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0);
            terms.push(term);
        }
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();

        tracing::info!(
            "Fitted text model on {} documents: {} terms",
            corpus.len(),
            terms.len()
        );

        Ok(Self {
            terms,
            index,
            idf,
            ngram_range,
        })
    }

    /// Number of text features
    pub fn dimension(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.index.get(term).map(|&i| self.idf[i])
    }

    /// L2-normalized tf-idf weights of `text`. Zero vector when nothing matches.
    pub fn transform(&self, text: &str) -> Vec<f64> {
        let mut weights = vec![0.0; self.dimension()];
        let grams = ngrams(&tokenize(text), self.ngram_range.0, self.ngram_range.1);
        for gram in grams {
            if let Some(&i) = self.index.get(&gram) {
                weights[i] += 1.0;
            }
        }

        for (w, idf) in weights.iter_mut().zip(self.idf.iter()) {
            *w *= idf;
        }

        let norm = weights.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for w in weights.iter_mut() {
                *w /= norm;
            }
        }
        weights
    }
}
