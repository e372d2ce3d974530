use std::path::{Path, PathBuf};

use regex::Regex;
use thiserror::Error;
use walkdir::WalkDir;

/// Plain or gzipped `.dat` files.
pub const DEFAULT_FILE_PATTERN: &str = r"\.dat(\.gz)?$";

#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("walking directory tree: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Recursively list every file under `top` whose full path contains a match
/// for `pattern`.
///
/// The pattern is a regex *search*: it may match any substring of the path.
/// Results come back in traversal order, not sorted.
pub fn find_files(top: impl AsRef<Path>, pattern: &str) -> Result<Vec<PathBuf>, DiscoverError> {
    let re = Regex::new(pattern)?;
    find_files_with(top, &re)
}

/// Same as [`find_files`] with a precompiled pattern.
pub fn find_files_with(top: impl AsRef<Path>, pattern: &Regex) -> Result<Vec<PathBuf>, DiscoverError> {
    let mut found = Vec::new();
    for entry in WalkDir::new(top.as_ref()).follow_links(false) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if pattern.is_match(&path.to_string_lossy()) {
            log::debug!("matched {}", path.display());
            found.push(path);
        }
    }
    log::debug!(
        "{} files under {} match {:?}",
        found.len(),
        top.as_ref().display(),
        pattern.as_str()
    );
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs;

    #[test]
    fn finds_matching_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("ctrl_1/nested")).unwrap();
        fs::create_dir_all(root.join("hot_2")).unwrap();
        fs::write(root.join("ctrl_1/fitness.dat"), "x\n1\n").unwrap();
        fs::write(root.join("ctrl_1/nested/fitness.dat.gz"), "").unwrap();
        fs::write(root.join("hot_2/fitness.dat"), "x\n1\n").unwrap();
        fs::write(root.join("hot_2/notes.txt"), "").unwrap();

        let found: BTreeSet<PathBuf> = find_files(root, r"fitness\.dat")
            .unwrap()
            .into_iter()
            .collect();
        let expected: BTreeSet<PathBuf> = [
            root.join("ctrl_1/fitness.dat"),
            root.join("ctrl_1/nested/fitness.dat.gz"),
            root.join("hot_2/fitness.dat"),
        ]
        .into_iter()
        .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn pattern_may_match_directory_part_of_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("hot_2")).unwrap();
        fs::write(dir.path().join("hot_2/a.dat"), "").unwrap();
        fs::write(dir.path().join("b.dat"), "").unwrap();

        let found = find_files(dir.path(), "hot_").unwrap();
        assert_eq!(found, vec![dir.path().join("hot_2/a.dat")]);
    }

    #[test]
    fn directories_are_never_returned() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("data_dir")).unwrap();
        assert!(find_files(dir.path(), "data").unwrap().is_empty());
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            find_files(dir.path(), "("),
            Err(DiscoverError::Pattern(_))
        ));
    }

    #[test]
    fn missing_root_is_a_walk_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            find_files(&missing, "."),
            Err(DiscoverError::Walk(_))
        ));
    }
}
