//! Feature table and its tab-separated snapshot
//!
//! The snapshot has no header. Each line is `file_name<TAB>f0<TAB>...<TAB>fN`
//! and every line carries the same number of values.

use crate::error::{Result, WikidexError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Default location of the snapshot
pub const DEFAULT_FEATURES_FILE: &str = "featurized_text.tsv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub file_name: String,
    pub values: Vec<f64>,
}

/// Rows that all live in the same coordinate space
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureTable {
    width: usize,
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    /// Empty table whose rows must have `width` values
    pub fn new(width: usize) -> Self {
        Self {
            width,
            rows: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn file_names(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.file_name.clone()).collect()
    }

    pub fn vectors(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(|r| r.values.clone()).collect()
    }

    pub fn push(&mut self, file_name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let file_name = file_name.into();
        // tabs and line breaks would split the row on reload
        if file_name.is_empty() || file_name.contains(['\t', '\n', '\r']) {
            return Err(WikidexError::InvalidFileName(file_name));
        }
        if values.len() != self.width {
            return Err(WikidexError::DimensionMismatch {
                expected: self.width,
                found: values.len(),
                file_name,
            });
        }
        self.rows.push(FeatureRow { file_name, values });
        Ok(())
    }

    /// Write the snapshot to `path`, replacing any existing file.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        for row in &self.rows {
            if row.values.is_empty() {
                continue;
            }
            write!(out, "{}", row.file_name)?;
            for v in &row.values {
                write!(out, "\t{}", v)?;
            }
            writeln!(out)?;
        }
        out.flush()?;
        tracing::info!("Wrote {} feature rows to {}", self.rows.len(), path.display());
        Ok(())
    }

    /// Read a snapshot written by [`FeatureTable::persist`].
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| WikidexError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);

        let mut table: Option<FeatureTable> = None;
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = i + 1;
            if line.trim().is_empty() {
                continue;
            }

            let mut fields = line.split('\t');
            let file_name = fields.next().unwrap_or_default().to_string();
            let values = fields
                .map(|f| match f.trim().parse::<f64>() {
                    Ok(v) if v.is_finite() => Ok(v),
                    Ok(v) => Err(WikidexError::MalformedTable {
                        line: line_no,
                        reason: format!("non-finite value {}", v),
                    }),
                    Err(e) => Err(WikidexError::MalformedTable {
                        line: line_no,
                        reason: format!("invalid value {:?}: {}", f, e),
                    }),
                })
                .collect::<Result<Vec<f64>>>()?;

            let table = table.get_or_insert_with(|| FeatureTable::new(values.len()));
            if values.len() != table.width {
                return Err(WikidexError::MalformedTable {
                    line: line_no,
                    reason: format!(
                        "expected {} columns, found {}",
                        table.width + 1,
                        values.len() + 1
                    ),
                });
            }
            table.rows.push(FeatureRow { file_name, values });
        }

        let table = table.unwrap_or_default();
        tracing::info!(
            "Loaded {} feature rows of width {} from {}",
            table.len(),
            table.width,
            path.display()
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_push_rejects_wrong_width() {
        let mut table = FeatureTable::new(2);
        assert!(table.push("a.md", vec![1.0, 0.0]).is_ok());
        let err = table.push("b.md", vec![1.0]).unwrap_err();
        assert!(matches!(
            err,
            WikidexError::DimensionMismatch { expected: 2, found: 1, .. }
        ));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_FEATURES_FILE);

        let mut table = FeatureTable::new(3);
        table.push("a.md", vec![1.0, 0.0, 0.123456789012345]).unwrap();
        table.push("b.md", vec![0.0, 1.0, 1e-7]).unwrap();
        table.persist(&path).unwrap();

        let loaded = FeatureTable::load(&path).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_persist_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("features.tsv");
        std::fs::write(&path, "stale\t1\t2\t3\nstale2\t1\t2\t3\n").unwrap();

        let mut table = FeatureTable::new(1);
        table.push("a.md", vec![0.5]).unwrap();
        table.persist(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a.md\t0.5\n");
    }

    #[test]
    fn test_load_inconsistent_widths() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("features.tsv");
        std::fs::write(&path, "a.md\t1\t0\nb.md\t1\n").unwrap();

        match FeatureTable::load(&path) {
            Err(WikidexError::MalformedTable { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed table, got {:?}", other),
        }
    }

    #[test]
    fn test_load_non_numeric_value() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("features.tsv");
        std::fs::write(&path, "a.md\t1\tabc\n").unwrap();
        assert!(matches!(
            FeatureTable::load(&path),
            Err(WikidexError::MalformedTable { line: 1, .. })
        ));
    }

    #[test]
    fn test_push_rejects_unstorable_names() {
        let mut table = FeatureTable::new(1);
        for name in ["weird\tname.md", "two\nlines.md", "cr\r.md", ""] {
            assert!(matches!(
                table.push(name, vec![1.0]),
                Err(WikidexError::InvalidFileName(_))
            ));
        }
        assert!(table.is_empty());
    }

    #[test]
    fn test_round_trip_unusual_names() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("features.tsv");
        let mut table = FeatureTable::new(1);
        table.push("café notes.md", vec![0.25]).unwrap();
        table.push("a,b;c.md", vec![1.0]).unwrap();
        table.persist(&path).unwrap();
        assert_eq!(FeatureTable::load(&path).unwrap(), table);
    }

    #[test]
    fn test_load_rejects_non_finite_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("features.tsv");
        for bad in ["NaN", "inf", "-inf"] {
            std::fs::write(&path, format!("a.md\t1\nb.md\t{}\n", bad)).unwrap();
            assert!(matches!(
                FeatureTable::load(&path),
                Err(WikidexError::MalformedTable { line: 2, .. })
            ));
        }
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            FeatureTable::load(&temp_dir.path().join("missing.tsv")),
            Err(WikidexError::FileAccess { .. })
        ));
    }
}
