//! Batch stages wired end to end
//!
//! `vectorize_wiki` covers parser + vectorizer and ends in the feature
//! snapshot. `index_from_features` starts from that snapshot and ends in the
//! rendered index. The two only share the file.

use crate::cluster::{cluster_table, ClusterLevels, ClusterOptions, Linkage};
use crate::error::Result;
use crate::index::{group_by_label, render_index, ClusterGroup, RenderOptions};
use crate::parser::read_documents;
use crate::vectorizer::{FeatureTable, Featurizer};
use std::path::{Path, PathBuf};

/// Outcome of the vectorize stage
#[derive(Debug)]
pub struct VectorizeReport {
    pub documents: usize,
    pub skipped: Vec<PathBuf>,
    pub rows: usize,
    pub width: usize,
}

/// Parse `wiki_dir`, vectorize every document and persist to `features_path`.
pub fn vectorize_wiki(wiki_dir: &Path, features_path: &Path) -> Result<VectorizeReport> {
    let report = read_documents(wiki_dir)?;
    let featurizer = Featurizer::fit(&report.documents)?;
    let table = featurizer.vectorize_and_persist(&report.documents, features_path)?;

    Ok(VectorizeReport {
        documents: report.documents.len(),
        skipped: report.skipped.into_iter().map(|(path, _)| path).collect(),
        rows: table.len(),
        width: table.width(),
    })
}

/// Outcome of the index stage
#[derive(Debug)]
pub struct IndexReport {
    pub linkage: Linkage,
    pub levels: ClusterLevels,
    pub groups: Vec<ClusterGroup>,
    pub markdown: String,
}

/// Load the snapshot, cluster it and render the chosen level.
pub fn index_from_features(
    features_path: &Path,
    options: &ClusterOptions,
    level: usize,
    render: &RenderOptions,
) -> Result<IndexReport> {
    let table = FeatureTable::load(features_path)?;
    let (linkage, levels) = cluster_table(&table, options)?;

    let labels = levels.level(level)?;
    let groups = group_by_label(&table.file_names(), labels);
    let markdown = render_index(&groups, render);

    Ok(IndexReport {
        linkage,
        levels,
        groups,
        markdown,
    })
}
