//! Index renderer
//!
//! Groups documents by cluster label and renders a markdown listing with one
//! section per label and `[[wiki-link]]` bullets.

use crate::cluster::OUTLIER_LABEL;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterGroup {
    pub label: i32,
    pub file_names: Vec<String>,
}

/// Group names by label; groups appear in order of first-encountered label.
pub fn group_by_label(file_names: &[String], labels: &[i32]) -> Vec<ClusterGroup> {
    let mut groups: Vec<ClusterGroup> = Vec::new();
    for (name, &label) in file_names.iter().zip(labels.iter()) {
        match groups.iter_mut().find(|g| g.label == label) {
            Some(group) => group.file_names.push(name.clone()),
            None => groups.push(ClusterGroup {
                label,
                file_names: vec![name.clone()],
            }),
        }
    }
    groups
}

/// Wiki-link target for a file: its name without the `.md` extension
pub fn wiki_link(file_name: &str) -> String {
    let stem = file_name.strip_suffix(".md").unwrap_or(file_name);
    format!("[[{}]]", stem)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    pub title: String,
    pub subtitle: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: "Wiki Index".to_string(),
            subtitle: "Documents grouped by similarity of links and text".to_string(),
        }
    }
}

pub fn render_index(groups: &[ClusterGroup], options: &RenderOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", options.title);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", options.subtitle);

    for group in groups {
        let _ = writeln!(out);
        if group.label == OUTLIER_LABEL {
            let _ = writeln!(out, "## Unclustered");
        } else {
            let _ = writeln!(out, "## Cluster {}", group.label);
        }
        let _ = writeln!(out);
        for name in &group.file_names {
            let _ = writeln!(out, "  - {}", wiki_link(name));
        }
    }
    out
}
