//! Filesystem helpers that attach paths to errors.

use std::fs;
use std::path::Path;

use crate::builder::DeployError;

pub(crate) fn read_to_string(path: &Path) -> Result<String, DeployError> {
    fs::read_to_string(path).map_err(|e| DeployError::ReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

pub(crate) fn write(path: &Path, contents: &str) -> Result<(), DeployError> {
    fs::write(path, contents).map_err(|e| DeployError::WriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

pub(crate) fn create_dir_all(path: &Path) -> Result<(), DeployError> {
    fs::create_dir_all(path).map_err(|e| DeployError::WriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

pub(crate) fn copy(from: &Path, to: &Path) -> Result<(), DeployError> {
    fs::copy(from, to)
        .map(|_| ())
        .map_err(|e| DeployError::CopyError {
            from: from.display().to_string(),
            to: to.display().to_string(),
            message: e.to_string(),
        })
}
