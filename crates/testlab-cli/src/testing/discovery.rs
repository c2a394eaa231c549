//! Test discovery - find test sources under a directory

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// File name suffix that marks a test source
pub const TEST_FILE_SUFFIX: &str = ".test.rs";

/// Find every test source below `root`, sorted by path
///
/// Hidden directories and `target/` are not descended into. A missing root
/// yields no files.
pub fn discover_test_files(root: &Path) -> Vec<PathBuf> {
    if !root.is_dir() {
        tracing::debug!(root = %root.display(), "test directory does not exist");
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry during discovery");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_test_file(entry.path()))
        .map(DirEntry::into_path)
        .collect();

    files.sort();
    tracing::debug!(root = %root.display(), count = files.len(), "discovered test files");
    files
}

/// Whether the file name ends in `.test.rs`
pub fn is_test_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.len() > TEST_FILE_SUFFIX.len() && name.ends_with(TEST_FILE_SUFFIX))
        .unwrap_or(false)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.') || name == "target")
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[rstest]
    #[case("math.test.rs", true)]
    #[case("nested/io.test.rs", true)]
    #[case("math.rs", false)]
    #[case("math.test.js", false)]
    #[case(".test.rs", false)]
    fn test_is_test_file(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_test_file(Path::new(path)), expected);
    }

    #[test]
    fn test_discovers_recursively_and_sorted() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "b.test.rs");
        touch(temp.path(), "a.test.rs");
        touch(temp.path(), "nested/c.test.rs");
        touch(temp.path(), "helpers.rs");

        let files = discover_test_files(temp.path());
        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(temp.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from("a.test.rs"),
                PathBuf::from("b.test.rs"),
                PathBuf::from("nested/c.test.rs"),
            ]
        );
    }

    #[test]
    fn test_skips_hidden_and_target() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), ".cache/x.test.rs");
        touch(temp.path(), "target/debug/y.test.rs");
        touch(temp.path(), "z.test.rs");

        let files = discover_test_files(temp.path());
        assert_eq!(files, vec![temp.path().join("z.test.rs")]);
    }

    #[test]
    fn test_missing_directory_yields_nothing() {
        let temp = TempDir::new().unwrap();
        assert!(discover_test_files(&temp.path().join("absent")).is_empty());
    }
}
