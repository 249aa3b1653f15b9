//! Fast tree summaries using jwalk.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;

/// Totals for a directory tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeSummary {
    /// Regular files.
    pub files: u64,
    /// Directories, not counting the root.
    pub directories: u64,
    /// Symlinks (not followed).
    pub symlinks: u64,
    /// Total size of regular files in bytes.
    pub bytes: u64,
}

/// Summarize a path.
///
/// - If path is a file: one file of its size
/// - If path is a directory: totals of everything under it
/// - If path doesn't exist: all zeros
///
/// Unreadable entries are skipped. Uses `jwalk` with sorting disabled for
/// speed.
#[must_use]
pub fn summarize_tree(path: &Path) -> TreeSummary {
    let mut summary = TreeSummary::default();

    let Ok(metadata) = path.symlink_metadata() else {
        return summary;
    };

    if metadata.file_type().is_symlink() {
        summary.symlinks = 1;
        return summary;
    }

    if metadata.is_file() {
        summary.files = 1;
        summary.bytes = metadata.len();
        return summary;
    }

    for entry in jwalk::WalkDir::new(path)
        .skip_hidden(false)
        .follow_links(false)
        .sort(false)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
    {
        let file_type = entry.file_type();
        if file_type.is_dir() {
            summary.directories += 1;
        } else if file_type.is_symlink() {
            summary.symlinks += 1;
        } else if file_type.is_file() {
            summary.files += 1;
            summary.bytes += entry.path().symlink_metadata().map_or(0, |m| m.len());
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_summarize_single_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("test.txt");
        fs::write(&file, "content").unwrap();

        let summary = summarize_tree(&file);
        assert_eq!(summary.files, 1);
        assert_eq!(summary.bytes, 7);
    }

    #[test]
    fn test_summarize_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("file1.txt"), "1").unwrap();
        fs::write(dir.path().join("file2.txt"), "22").unwrap();
        fs::create_dir(dir.path().join("subdir")).unwrap();
        fs::write(dir.path().join("subdir/file3.txt"), "333").unwrap();

        assert_eq!(
            summarize_tree(dir.path()),
            TreeSummary {
                files: 3,
                directories: 1,
                symlinks: 0,
                bytes: 6,
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_summarize_does_not_follow_symlinks() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("real")).unwrap();
        fs::write(dir.path().join("real/file.txt"), "abc").unwrap();
        std::os::unix::fs::symlink("real", dir.path().join("link")).unwrap();

        let summary = summarize_tree(dir.path());
        assert_eq!(summary.files, 1);
        assert_eq!(summary.symlinks, 1);
    }

    #[test]
    fn test_summarize_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert_eq!(summarize_tree(dir.path()), TreeSummary::default());
    }

    #[test]
    fn test_summarize_nonexistent() {
        let path = Path::new("/nonexistent/path/that/does/not/exist");
        assert_eq!(summarize_tree(path), TreeSummary::default());
    }
}
