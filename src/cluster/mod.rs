//! Clusterer
//!
//! Normalizes the feature rows, builds one linkage over them and cuts it at
//! every configured threshold. Each threshold gives an independent labeling.

pub mod linkage;

pub use linkage::*;

use crate::error::{Result, WikidexError};
use crate::vectorizer::FeatureTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Label of documents that fell into a cluster below the minimum size
pub const OUTLIER_LABEL: i32 = -1;

/// Scale every row to unit Euclidean norm. Zero rows stay zero.
pub fn normalize(table: &FeatureTable) -> Vec<Vec<f64>> {
    table
        .rows()
        .iter()
        .map(|row| normalize_row(&row.values))
        .collect()
}

pub fn normalize_row(values: &[f64]) -> Vec<f64> {
    let norm = values.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm == 0.0 {
        return values.to_vec();
    }
    values.iter().map(|x| x / norm).collect()
}

/// Relabel members of clusters smaller than `min_size` as [`OUTLIER_LABEL`]
/// and renumber the remaining clusters from 1 in order of first appearance.
pub fn mark_outliers(labels: &[i32], min_size: usize) -> Vec<i32> {
    let mut counts: HashMap<i32, usize> = HashMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut renumbered: HashMap<i32, i32> = HashMap::new();
    labels
        .iter()
        .map(|label| {
            if counts[label] < min_size {
                return OUTLIER_LABEL;
            }
            let next = renumbered.len() as i32 + 1;
            *renumbered.entry(*label).or_insert(next)
        })
        .collect()
}

pub fn count_clusters(labels: &[i32]) -> usize {
    let mut seen: Vec<i32> = labels.to_vec();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}

/// Labelings of the same documents at several thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterLevels {
    pub thresholds: Vec<f64>,
    /// `labels[level][doc]`
    pub labels: Vec<Vec<i32>>,
}

impl ClusterLevels {
    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    pub fn level(&self, level: usize) -> Result<&[i32]> {
        self.labels
            .get(level)
            .map(Vec::as_slice)
            .ok_or(WikidexError::InvalidLevel {
                level,
                levels: self.labels.len(),
            })
    }

    pub fn num_clusters(&self, level: usize) -> Result<usize> {
        self.level(level).map(count_clusters)
    }
}

/// Cluster options for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterOptions {
    pub method: LinkageMethod,
    pub thresholds: Vec<f64>,
    /// Outlier detection is off when unset
    pub min_cluster_size: Option<usize>,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            method: LinkageMethod::Ward,
            thresholds: vec![1.8, 1.9, 2.0, 2.1, 2.2, 2.3, 2.4, 2.5, 2.6],
            min_cluster_size: None,
        }
    }
}

/// Single flat cut at `threshold`.
pub fn cluster(vectors: &[Vec<f64>], method: LinkageMethod, threshold: f64) -> Result<Vec<i32>> {
    Ok(Linkage::build(vectors, method)?.cut(threshold))
}

/// One linkage, cut at every threshold.
pub fn cluster_levels(vectors: &[Vec<f64>], options: &ClusterOptions) -> Result<(Linkage, ClusterLevels)> {
    let linkage = Linkage::build(vectors, options.method)?;

    let labels = options
        .thresholds
        .iter()
        .map(|&t| {
            let labels = linkage.cut(t);
            let labels = match options.min_cluster_size {
                Some(min) => mark_outliers(&labels, min),
                None => labels,
            };
            tracing::info!("Number of clusters at level {}: {}", t, count_clusters(&labels));
            labels
        })
        .collect();

    Ok((
        linkage,
        ClusterLevels {
            thresholds: options.thresholds.clone(),
            labels,
        },
    ))
}

/// Normalize a loaded table and cluster it.
pub fn cluster_table(table: &FeatureTable, options: &ClusterOptions) -> Result<(Linkage, ClusterLevels)> {
    if table.len() < 2 {
        return Err(WikidexError::InsufficientData { found: table.len() });
    }
    cluster_levels(&normalize(table), options)
}
