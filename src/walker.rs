/// The canonical content root and every regular file found beneath it.
#[derive(Debug, Clone, Default)]
pub struct ContentTree {
    pub root: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Lists every regular file under `root`, descending at most `max_depth`
/// levels.
///
/// Entries are sorted by file name at each level so a pass always visits
/// files in the same order. Symlinks are followed; a link that points back
/// at one of its ancestors is reported by `walkdir` as a loop and skipped.
pub fn walk_files(root: &Path, max_depth: usize) -> Result<ContentTree> {
    let root = std::fs::canonicalize(root).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ContentError::RootNotFound {
            path: root.to_path_buf(),
        },
        _ => ContentError::Io {
            path: root.to_path_buf(),
            source: e,
        },
    })?;

    if !root.is_dir() {
        return Err(ContentError::RootNotFound { path: root });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&root)
        .follow_links(true)
        .max_depth(max_depth)
        .sort_by_file_name()
    {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => {
                if let Some(ancestor) = e.loop_ancestor() {
                    warn!(
                        path = ?e.path(),
                        ancestor = ?ancestor,
                        "Symlink cycle detected, skipping"
                    );
                } else {
                    warn!(path = ?e.path(), error = %e, "Unreadable entry, skipping");
                }
            }
        }
    }

    debug!(root = ?root, count = files.len(), "Walked content root");
    Ok(ContentTree { root, files })
}

use crate::error::{ContentError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_root_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = walk_files(&dir.path().join("nope"), 8).unwrap_err();
        assert!(matches!(err, ContentError::RootNotFound { .. }));
    }

    #[test]
    fn lists_nested_files_in_name_order() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("B/lesson")).unwrap();
        fs::create_dir_all(dir.path().join("A")).unwrap();
        fs::write(dir.path().join("B/lesson/z-quiz.json"), "{}").unwrap();
        fs::write(dir.path().join("B/a-quiz.json"), "{}").unwrap();
        fs::write(dir.path().join("A/c-flashcard.json"), "{}").unwrap();

        let tree = walk_files(dir.path(), 8).unwrap();
        let names: Vec<_> = tree
            .files
            .iter()
            .map(|p| p.strip_prefix(&tree.root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from("A/c-flashcard.json"),
                PathBuf::from("B/a-quiz.json"),
                PathBuf::from("B/lesson/z-quiz.json"),
            ]
        );
        assert!(tree.files.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn depth_cap_limits_descent() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("top.json"), "{}").unwrap();
        fs::write(dir.path().join("a/b/deep.json"), "{}").unwrap();

        let files = walk_files(dir.path(), 1).unwrap().files;
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("top.json"));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_cycle_terminates() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("course")).unwrap();
        fs::write(dir.path().join("course/one-quiz.json"), "{}").unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("course/loop")).unwrap();

        let files = walk_files(dir.path(), 32).unwrap().files;
        assert_eq!(files.len(), 1);
    }
}
