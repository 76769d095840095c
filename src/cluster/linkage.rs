//! Hierarchical agglomerative clustering
//!
//! Greedy merge of the closest pair of clusters until one remains, using
//! Lance-Williams distance updates over a full Euclidean distance matrix.
//! Cluster ids follow the usual linkage-matrix convention: leaves are
//! `0..n`, the cluster created by merge `k` has id `n + k`.

use crate::error::{Result, WikidexError};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Linkage criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LinkageMethod {
    Single,
    Complete,
    Average,
    Weighted,
    /// Minimum-variance merge
    #[default]
    Ward,
}

impl std::fmt::Display for LinkageMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Complete => write!(f, "complete"),
            Self::Average => write!(f, "average"),
            Self::Weighted => write!(f, "weighted"),
            Self::Ward => write!(f, "ward"),
        }
    }
}

impl std::str::FromStr for LinkageMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "complete" => Ok(Self::Complete),
            "average" => Ok(Self::Average),
            "weighted" => Ok(Self::Weighted),
            "ward" => Ok(Self::Ward),
            _ => Err(format!("Unknown linkage method: {}", s)),
        }
    }
}

impl LinkageMethod {
    /// Distance from cluster k to the union of i and j.
    fn update(self, d_ik: f64, d_jk: f64, d_ij: f64, s_i: f64, s_j: f64, s_k: f64) -> f64 {
        match self {
            Self::Single => d_ik.min(d_jk),
            Self::Complete => d_ik.max(d_jk),
            Self::Average => (s_i * d_ik + s_j * d_jk) / (s_i + s_j),
            Self::Weighted => (d_ik + d_jk) / 2.0,
            Self::Ward => {
                let t = s_i + s_j + s_k;
                let sq = ((s_i + s_k) * d_ik * d_ik + (s_j + s_k) * d_jk * d_jk
                    - s_k * d_ij * d_ij)
                    / t;
                sq.max(0.0).sqrt()
            }
        }
    }
}

pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// One merge of the dendrogram
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Merge {
    /// Smaller of the two merged cluster ids
    pub left: usize,
    pub right: usize,
    pub distance: f64,
    /// Number of leaves under the new cluster
    pub size: usize,
}

/// Full merge tree over `leaves` points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Linkage {
    pub method: LinkageMethod,
    pub leaves: usize,
    pub merges: Vec<Merge>,
}

impl Linkage {
    /// Cluster `vectors` bottom-up.
    ///
    /// Ties in merge distance go to the first pair found scanning `(i, j)`
    /// with `i < j` in input order.
    pub fn build(vectors: &[Vec<f64>], method: LinkageMethod) -> Result<Self> {
        let n = vectors.len();
        if n < 2 {
            return Err(WikidexError::InsufficientData { found: n });
        }

        let mut dist = vec![vec![0.0f64; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = euclidean(&vectors[i], &vectors[j]);
                dist[i][j] = d;
                dist[j][i] = d;
            }
        }

        // Slot s holds the cluster with id ids[s] while active[s] is set
        let mut active = vec![true; n];
        let mut ids: Vec<usize> = (0..n).collect();
        let mut sizes = vec![1usize; n];
        let mut merges = Vec::with_capacity(n - 1);

        // Full rescan per merge: O(n^3) time, O(n^2) memory
        for step in 0..(n - 1) {
            let mut best: Option<(usize, usize, f64)> = None;
            for i in 0..n {
                if !active[i] {
                    continue;
                }
                for j in (i + 1)..n {
                    if !active[j] {
                        continue;
                    }
                    let d = dist[i][j];
                    if best.map_or(true, |(_, _, bd)| d < bd) {
                        best = Some((i, j, d));
                    }
                }
            }
            let Some((i, j, d_ij)) = best else {
                break;
            };

            let (s_i, s_j) = (sizes[i] as f64, sizes[j] as f64);
            for k in 0..n {
                if !active[k] || k == i || k == j {
                    continue;
                }
                let d = method.update(dist[i][k], dist[j][k], d_ij, s_i, s_j, sizes[k] as f64);
                dist[i][k] = d;
                dist[k][i] = d;
            }

            let (left, right) = if ids[i] < ids[j] { (ids[i], ids[j]) } else { (ids[j], ids[i]) };
            sizes[i] += sizes[j];
            merges.push(Merge {
                left,
                right,
                distance: d_ij,
                size: sizes[i],
            });
            active[j] = false;
            ids[i] = n + step;
        }

        tracing::debug!("Built {} linkage over {} points", method, n);
        Ok(Self {
            method,
            leaves: n,
            merges,
        })
    }

    /// Flat clusters: leaves joined by merges no higher than `threshold`
    /// share a label. Labels start at 1 in order of first appearance.
    pub fn cut(&self, threshold: f64) -> Vec<i32> {
        let n = self.leaves;
        let mut parent: Vec<usize> = (0..n).collect();

        fn find(parent: &mut [usize], i: usize) -> usize {
            let mut root = i;
            while parent[root] != root {
                root = parent[root];
            }
            let mut cur = i;
            while parent[cur] != root {
                let next = parent[cur];
                parent[cur] = root;
                cur = next;
            }
            root
        }

        // Any leaf under each cluster id
        let mut rep: Vec<usize> = (0..n).collect();
        for merge in &self.merges {
            rep.push(rep[merge.left]);
            if merge.distance <= threshold {
                let a = find(&mut parent, rep[merge.left]);
                let b = find(&mut parent, rep[merge.right]);
                if a != b {
                    parent[b] = a;
                }
            }
        }

        let mut label_of_root: Vec<i32> = vec![0; n];
        let mut next = 1;
        let mut labels = Vec::with_capacity(n);
        for leaf in 0..n {
            let root = find(&mut parent, leaf);
            if label_of_root[root] == 0 {
                label_of_root[root] = next;
                next += 1;
            }
            labels.push(label_of_root[root]);
        }
        labels
    }

    /// Merge table, one line per merge
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:>5} {:>7} {:>7} {:>10} {:>6}", "step", "left", "right", "distance", "size");
        for (step, m) in self.merges.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>5} {:>7} {:>7} {:>10.4} {:>6}",
                step, m.left, m.right, m.distance, m.size
            );
        }
        out
    }
}
