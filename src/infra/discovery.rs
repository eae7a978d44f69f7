//! Job source discovery on the local filesystem.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::core::SchedulerError;

/// List files under `dir` whose extension is `extension`, sorted by path.
///
/// Only the top level is searched unless `recursive` is set.
pub fn discover_jobs(
    dir: &Path,
    extension: &str,
    recursive: bool,
) -> Result<Vec<PathBuf>, SchedulerError> {
    if !dir.is_dir() {
        return Err(SchedulerError::Config(format!(
            "job directory does not exist or is not a directory: {}",
            dir.display()
        )));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(max_depth) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            SchedulerError::io(path, e.into())
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == OsStr::new(extension)) {
            found.push(path.to_path_buf());
        }
    }
    found.sort();
    tracing::debug!(dir = %dir.display(), recursive, jobs = found.len(), "discovered job sources");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn layout() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.sh"), "max_threads='1'").unwrap();
        fs::write(dir.path().join("a.sh"), "max_threads='1'").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.sh"), "max_threads='1'").unwrap();
        dir
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_flat_discovery_is_sorted() {
        let dir = layout();
        let jobs = discover_jobs(dir.path(), "sh", false).unwrap();
        assert_eq!(names(&jobs), vec!["a.sh", "b.sh"]);
    }

    #[test]
    fn test_recursive_discovery() {
        let dir = layout();
        let jobs = discover_jobs(dir.path(), "sh", true).unwrap();
        assert_eq!(names(&jobs), vec!["a.sh", "b.sh", "c.sh"]);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_jobs(&dir.path().join("nope"), "sh", false).unwrap_err();
        assert!(matches!(err, SchedulerError::Config(_)));
    }
}
