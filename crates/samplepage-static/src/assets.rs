//! Export of the project's runtime data files into the deploy directory.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::builder::DeployError;
use crate::io;

/// Which data files are exported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetExportConfig {
    /// Extensions of files copied flat from the data directory
    pub extensions: Vec<String>,

    /// Subdirectories copied recursively
    pub dirs: Vec<String>,
}

impl Default for AssetExportConfig {
    fn default() -> Self {
        Self {
            extensions: ["txt", "dump", "kcc", "tap", "orb"]
                .map(String::from)
                .to_vec(),
            dirs: vec!["tbui".to_string(), "nkui".to_string()],
        }
    }
}

/// Copies data files and directories from a project into the deploy tree.
pub struct AssetExporter<'a> {
    config: &'a AssetExportConfig,
}

impl<'a> AssetExporter<'a> {
    pub fn new(config: &'a AssetExportConfig) -> Self {
        Self { config }
    }

    /// Export `source` into `dest`, returning the number of files copied.
    ///
    /// Each configured subdirectory must exist in `source` and must not yet
    /// exist in `dest`.
    pub fn export(&self, source: &Path, dest: &Path) -> Result<usize, DeployError> {
        io::create_dir_all(dest)?;

        let mut copied = self.copy_flat(source, dest)?;

        for dir in &self.config.dirs {
            copied += copy_tree(&source.join(dir), &dest.join(dir))?;
        }

        tracing::debug!("Exported {} data files to {}", copied, dest.display());

        Ok(copied)
    }

    /// Copy matching files directly inside `source`, without descending.
    fn copy_flat(&self, source: &Path, dest: &Path) -> Result<usize, DeployError> {
        if !source.exists() {
            return Ok(0);
        }

        let files = self.data_files(source)?;

        for file in &files {
            if let Some(name) = file.file_name() {
                io::copy(file, &dest.join(name))?;
            }
        }

        Ok(files.len())
    }

    /// Matching files directly inside `source`, sorted by path.
    fn data_files(&self, source: &Path) -> Result<Vec<PathBuf>, DeployError> {
        let read_error = |e: std::io::Error| DeployError::ReadError {
            path: source.display().to_string(),
            message: e.to_string(),
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(source).map_err(read_error)? {
            let path = entry.map_err(read_error)?.path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if path.is_file() && !name.starts_with('.') && self.matches_extension(name) {
                files.push(path);
            }
        }
        files.sort();

        Ok(files)
    }

    fn matches_extension(&self, file_name: &str) -> bool {
        self.config.extensions.iter().any(|ext| {
            file_name
                .strip_suffix(ext.as_str())
                .is_some_and(|stem| stem.ends_with('.') && stem.len() > 1)
        })
    }
}

/// Recursively copy `from` into a new directory `to`.
fn copy_tree(from: &Path, to: &Path) -> Result<usize, DeployError> {
    if to.exists() {
        return Err(DeployError::DestinationExists(to.display().to_string()));
    }
    if !from.is_dir() {
        return Err(DeployError::ReadError {
            path: from.display().to_string(),
            message: "not a directory".to_string(),
        });
    }

    let mut copied = 0;

    for entry in WalkDir::new(from).sort_by_file_name() {
        let entry = entry.map_err(|e| DeployError::ReadError {
            path: from.display().to_string(),
            message: e.to_string(),
        })?;

        let relative = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            io::create_dir_all(&target)?;
        } else {
            io::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn data_dir(root: &Path) -> PathBuf {
        let data = root.join("data");
        fs::create_dir_all(data.join("tbui/skin")).unwrap();
        fs::create_dir_all(data.join("nkui")).unwrap();
        fs::create_dir_all(data.join("shaders")).unwrap();
        fs::write(data.join("readme.txt"), "readme").unwrap();
        fs::write(data.join("kc85.kcc"), [0u8, 1, 2]).unwrap();
        fs::write(data.join("game.tap"), [3u8]).unwrap();
        fs::write(data.join("model.bin"), [4u8]).unwrap();
        fs::write(data.join("shaders/skip.txt"), "nested").unwrap();
        fs::write(data.join("tbui/skin/skin.tb.txt"), "skin").unwrap();
        fs::write(data.join("tbui/layout.tb.txt"), "layout").unwrap();
        fs::write(data.join("nkui/font.ttf"), "font").unwrap();
        data
    }

    #[test]
    fn copies_matching_files_and_subdirs() {
        let temp = tempdir().unwrap();
        let source = data_dir(temp.path());
        let dest = temp.path().join("deploy/data");

        let config = AssetExportConfig::default();
        let copied = AssetExporter::new(&config).export(&source, &dest).unwrap();

        assert_eq!(copied, 6);
        assert!(dest.join("readme.txt").is_file());
        assert!(dest.join("kc85.kcc").is_file());
        assert!(dest.join("game.tap").is_file());
        assert!(!dest.join("model.bin").exists());
        assert!(!dest.join("shaders").exists());
        assert!(!dest.join("skip.txt").exists());
        assert!(dest.join("tbui/skin/skin.tb.txt").is_file());
        assert!(dest.join("tbui/layout.tb.txt").is_file());
        assert!(dest.join("nkui/font.ttf").is_file());
    }

    #[test]
    fn errors_when_subdir_already_exported() {
        let temp = tempdir().unwrap();
        let source = data_dir(temp.path());
        let dest = temp.path().join("deploy/data");
        fs::create_dir_all(dest.join("tbui")).unwrap();

        let config = AssetExportConfig::default();
        let result = AssetExporter::new(&config).export(&source, &dest);

        assert!(matches!(result, Err(DeployError::DestinationExists(_))));
    }

    #[test]
    fn errors_when_subdir_missing_from_source() {
        let temp = tempdir().unwrap();
        let source = data_dir(temp.path());
        fs::remove_dir_all(source.join("nkui")).unwrap();

        let config = AssetExportConfig::default();
        let result = AssetExporter::new(&config).export(&source, &temp.path().join("out"));

        assert!(matches!(result, Err(DeployError::ReadError { .. })));
    }

    #[test]
    fn lists_data_files_sorted() {
        let temp = tempdir().unwrap();
        let source = data_dir(temp.path());

        let config = AssetExportConfig::default();
        let files = AssetExporter::new(&config).data_files(&source).unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["game.tap", "kc85.kcc", "readme.txt"]);
    }

    #[test]
    fn unreadable_data_dir_is_an_error() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("data");
        fs::write(&source, "not a directory").unwrap();

        let config = AssetExportConfig {
            extensions: vec!["txt".to_string()],
            dirs: vec![],
        };
        let result = AssetExporter::new(&config).export(&source, &temp.path().join("out"));

        assert!(matches!(result, Err(DeployError::ReadError { .. })));
    }

    #[test]
    fn extension_match_requires_a_dot() {
        let config = AssetExportConfig {
            extensions: vec!["tap".to_string()],
            dirs: vec![],
        };
        let exporter = AssetExporter::new(&config);

        assert!(exporter.matches_extension("game.tap"));
        assert!(!exporter.matches_extension("gametap"));
        assert!(!exporter.matches_extension(".tap"));
        assert!(!exporter.matches_extension("game.tape"));
    }
}
