//! Manifest parsing and validation.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::record::SampleRecord;

/// Ordered list of sample records as read from the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    records: Vec<SampleRecord>,
}

impl Manifest {
    /// All records in manifest order, including the sentinel.
    pub fn records(&self) -> &[SampleRecord] {
        &self.records
    }

    /// Samples in manifest order, sentinel records skipped.
    pub fn samples(&self) -> impl Iterator<Item = &SampleRecord> {
        self.records.iter().filter(|r| !r.is_sentinel())
    }

    /// Samples tagged for the web toolchain.
    pub fn web_samples(&self) -> impl Iterator<Item = &SampleRecord> {
        self.samples().filter(|r| r.targets_web())
    }
}

/// Errors that can occur when loading the manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {path}: {message}")]
    Read { path: String, message: String },

    #[error("Invalid YAML in manifest: {0}")]
    InvalidYaml(String),

    #[error("Sample at position {0} has an empty name")]
    EmptyName(usize),

    #[error("Duplicate sample name: {0}")]
    DuplicateName(String),
}

/// Read and parse the manifest at `path`.
pub fn load_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    let content = fs::read_to_string(path).map_err(|e| ManifestError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    parse_manifest(&content)
}

/// Parse manifest YAML text.
pub fn parse_manifest(source: &str) -> Result<Manifest, ManifestError> {
    let records: Vec<SampleRecord> =
        serde_yaml::from_str(source).map_err(|e| ManifestError::InvalidYaml(e.to_string()))?;

    let mut seen = HashSet::new();
    for (index, record) in records.iter().enumerate() {
        if record.is_sentinel() {
            continue;
        }
        if record.name.trim().is_empty() {
            return Err(ManifestError::EmptyName(index));
        }
        if !seen.insert(record.name.as_str()) {
            return Err(ManifestError::DuplicateName(record.name.clone()));
        }
    }

    Ok(Manifest { records })
}
