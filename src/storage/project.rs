use std::env;
use std::path::{Path, PathBuf};

pub const PROJECT_DIR_NAME: &str = ".courier";

const PROJECT_MARKERS: &[&str] = &[".git", "Cargo.toml", "package.json", PROJECT_DIR_NAME];

/// Walks up from `start` to the first directory holding a project marker.
pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        if PROJECT_MARKERS.iter().any(|marker| dir.join(marker).exists()) {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

pub fn find_project_root() -> Option<PathBuf> {
    let current = env::current_dir().ok()?;
    find_project_root_from(&current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_finds_marker_in_ancestor() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join(PROJECT_DIR_NAME)).unwrap();
        let nested = tmp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let root = find_project_root_from(&nested).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn test_nearest_marker_wins() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join(".git")).unwrap();
        let inner = tmp.path().join("inner");
        fs::create_dir(&inner).unwrap();
        fs::write(inner.join("Cargo.toml"), "").unwrap();

        assert_eq!(find_project_root_from(&inner).unwrap(), inner);
    }
}
