use std::fs;
use std::path::{Path, PathBuf};

use super::models::Group;
use super::StorageError;

const REQUESTS_DIR_NAME: &str = "requests";

pub(crate) fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// Finds a child directory named `name`, ignoring case.
pub(crate) fn find_dir(parent: &Path, name: &str) -> Result<Option<PathBuf>, StorageError> {
    if !parent.is_dir() {
        return Ok(None);
    }
    let entries = fs::read_dir(parent).map_err(|source| StorageError::ReadDir {
        path: parent.to_path_buf(),
        source,
    })?;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() && entry.file_name().to_string_lossy().eq_ignore_ascii_case(name) {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

/// Sorted list of files in `dir` carrying one of `extensions`.
pub(crate) fn list_files(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, StorageError> {
    let entries = fs::read_dir(dir).map_err(|source| StorageError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_extension(path, extensions))
        .collect();
    files.sort();
    Ok(files)
}

pub fn load_group(path: &Path) -> Result<Group, StorageError> {
    let contents = fs::read_to_string(path).map_err(|source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| StorageError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads every request group under `<data_dir>/requests`. The unsorted group,
/// if any, comes first; the rest keep file-name order.
pub fn load_groups(data_dir: &Path) -> Result<Vec<Group>, StorageError> {
    let dir = match find_dir(data_dir, REQUESTS_DIR_NAME)? {
        Some(dir) => dir,
        None => return Ok(Vec::new()),
    };

    let mut groups = Vec::new();
    for path in list_files(&dir, &["yaml", "yml"])? {
        groups.push(load_group(&path)?);
    }
    groups.sort_by_key(|group| !group.is_unsorted());
    Ok(groups)
}
