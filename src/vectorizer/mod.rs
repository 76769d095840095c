//! Feature vectorizer
//!
//! Turns parsed documents into fixed-width vectors: a 0/1 link membership
//! prefix over the corpus [`Vocabulary`] followed by the [`TextModel`]
//! weights of the paragraph text. Both are fitted once over the whole batch.

pub mod stopwords;
pub mod table;
pub mod tfidf;
pub mod vocabulary;

pub use table::*;
pub use tfidf::*;
pub use vocabulary::*;

use crate::error::Result;
use crate::parser::Document;
use std::path::Path;

/// Feature vector of one document
pub fn vectorize(document: &Document, vocabulary: &Vocabulary, model: &TextModel) -> Vec<f64> {
    let mut vec = vocabulary.membership(&document.links);
    vec.extend(model.transform(&document.paragraphs));
    vec
}

/// Frozen vocabulary and text model for one run
#[derive(Debug, Clone)]
pub struct Featurizer {
    pub vocabulary: Vocabulary,
    pub model: TextModel,
}

impl Featurizer {
    pub fn new(vocabulary: Vocabulary, model: TextModel) -> Self {
        Self { vocabulary, model }
    }

    /// Build the vocabulary and fit the text model over `documents`.
    pub fn fit(documents: &[Document]) -> Result<Self> {
        let vocabulary = Vocabulary::build(documents);
        tracing::info!("Link vocabulary: {} distinct targets", vocabulary.len());

        let corpus: Vec<&str> = documents.iter().map(|d| d.paragraphs.as_str()).collect();
        let model = TextModel::fit(&corpus)?;
        Ok(Self::new(vocabulary, model))
    }

    pub fn width(&self) -> usize {
        self.vocabulary.len() + self.model.dimension()
    }

    pub fn vectorize(&self, document: &Document) -> Vec<f64> {
        vectorize(document, &self.vocabulary, &self.model)
    }

    /// Vectorize every document into `table`, in input order.
    ///
    /// Documents whose vector is empty are left out. Rows added before an
    /// error stay in `table`.
    pub fn extend_table(&self, documents: &[Document], table: &mut FeatureTable) -> Result<()> {
        for doc in documents {
            let vec = self.vectorize(doc);
            if vec.is_empty() {
                tracing::debug!("Dropping {}: empty feature vector", doc.file_name);
                continue;
            }
            if !doc.has_links() {
                tracing::debug!("{} has no outbound links", doc.file_name);
            }
            table.push(doc.file_name.clone(), vec)?;
        }
        Ok(())
    }

    pub fn vectorize_corpus(&self, documents: &[Document]) -> Result<FeatureTable> {
        let mut table = FeatureTable::new(self.width());
        self.extend_table(documents, &mut table)?;
        Ok(table)
    }

    /// Vectorize and write the snapshot to `path`.
    ///
    /// When vectorizing fails midway the rows computed so far are still
    /// written before the error is returned.
    pub fn vectorize_and_persist(&self, documents: &[Document], path: &Path) -> Result<FeatureTable> {
        let mut table = FeatureTable::new(self.width());
        let outcome = self.extend_table(documents, &mut table);
        table.persist(path)?;
        outcome.map(|_| table)
    }
}
