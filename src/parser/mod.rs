//! Document parser
//!
//! Reads every `*.md` file directly inside a wiki folder and turns each one
//! into a [`Document`]. Files that cannot be read are reported and skipped so
//! a single bad page never aborts the batch.

pub mod document;

pub use document::*;

use crate::error::{Result, WikidexError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of wiki pages
pub const MARKDOWN_EXTENSION: &str = "md";

/// Result of reading a wiki folder
#[derive(Debug, Default)]
pub struct ParseReport {
    pub documents: Vec<Document>,
    /// Files that were found but could not be read
    pub skipped: Vec<(PathBuf, WikidexError)>,
}

impl ParseReport {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == MARKDOWN_EXTENSION)
        .unwrap_or(false)
}

/// List markdown files directly inside `dir`, sorted by file name.
pub fn list_markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(WikidexError::FileAccess {
            path: dir.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable directory entry: {}", e);
                continue;
            }
        };
        if entry.file_type().is_file() && is_markdown(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Read and parse one file.
pub fn read_document(path: &Path) -> Result<Document> {
    let raw = std::fs::read_to_string(path).map_err(|source| WikidexError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    Ok(parse_document(&file_name, &raw))
}

/// Read every markdown document in `dir`.
pub fn read_documents(dir: &Path) -> Result<ParseReport> {
    let files = list_markdown_files(dir)?;
    tracing::info!("Found {} markdown files in {}", files.len(), dir.display());

    let mut report = ParseReport::default();
    for path in files {
        match read_document(&path) {
            Ok(doc) => {
                tracing::debug!(
                    "Parsed {} ({} links, title: {:?})",
                    doc.file_name,
                    doc.links.len(),
                    doc.title
                );
                report.documents.push(doc);
            }
            Err(e) => {
                tracing::warn!("Skipping {}: {}", path.display(), e);
                report.skipped.push((path, e));
            }
        }
    }

    Ok(report)
}
