use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::model::Dataset;
use super::DatasetError;

// ---------------------------------------------------------------------------
// Name resolution
// ---------------------------------------------------------------------------

/// Normalize a dataset name: trim whitespace, lowercase.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A source of datasets addressed by normalized name.
pub trait DatasetSource: Send + Sync {
    /// Load the dataset called `name` (already normalized).
    fn load(&self, name: &str) -> Result<Dataset, DatasetError>;
}

/// Resolves `<name>.csv` under a fixed data directory.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    root: PathBuf,
}

impl CsvDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path backing `name`, or `None` for names that cannot map to a file
    /// inside the data directory.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return None;
        }
        Some(self.root.join(format!("{name}.csv")))
    }
}

impl DatasetSource for CsvDirectory {
    fn load(&self, name: &str) -> Result<Dataset, DatasetError> {
        let path = self
            .resolve(name)
            .filter(|p| p.is_file())
            .ok_or_else(|| DatasetError::NotFound {
                name: name.to_string(),
            })?;

        let dataset = load_csv(&path).map_err(|source| DatasetError::Load {
            name: name.to_string(),
            source,
        })?;

        log::info!(
            "loaded dataset '{name}' from {} ({} rows, {} columns)",
            path.display(),
            dataset.len(),
            dataset.columns.len()
        );
        Ok(dataset)
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, comma-delimited data rows.
/// Every column is kept; cell types are inferred per value.
pub fn load_csv(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    read_csv(file)
}

/// Parse CSV from any reader into a normalized [`Dataset`].
pub fn read_csv<R: Read>(input: R) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Dataset::from_text(headers, rows))
}
