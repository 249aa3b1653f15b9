//! In-process archive-mode copy engine.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use rayon::prelude::*;

use crate::engine::{CopyEngine, CopyMode, CopyOptions, CopyRequest};
use crate::error::CopyError;

/// Copies with `jwalk` + `rayon` instead of an external tool.
///
/// Permissions, modification times and symlinks are preserved. Existing
/// destination files are overwritten. Tool option strings are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeEngine;

impl NativeEngine {
    /// Create a native engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CopyEngine for NativeEngine {
    fn name(&self) -> &'static str {
        "native"
    }

    fn copy(&self, request: &CopyRequest, options: &CopyOptions) -> Result<(), CopyError> {
        let source = &request.source;
        let metadata = fs::symlink_metadata(source).map_err(|e| CopyError::MetadataError {
            path: source.clone(),
            io_error: e,
        })?;

        // Contents of a non-directory is the entry itself.
        let target = if request.mode == CopyMode::Contents && metadata.is_dir() {
            request.destination.clone()
        } else {
            CopyRequest::entry(source, &request.destination).target()
        };

        log::debug!(
            "Native copy{}: {} -> {}",
            if options.dry_run { " (dry run)" } else { "" },
            source.display(),
            target.display()
        );

        if metadata.is_dir() {
            copy_tree(source, &target, options)
        } else if is_special(&metadata.file_type()) {
            skip_special(source);
            Ok(())
        } else {
            report(options, source);
            if options.dry_run {
                return Ok(());
            }
            if let Some(parent) = target.parent() {
                create_dir(parent)?;
            }
            copy_entry(&FileEntry {
                source: source.clone(),
                target,
                is_symlink: metadata.file_type().is_symlink(),
            })
        }
    }
}

/// Fifos, sockets and device nodes. Opening a fifo for reading blocks until
/// a writer shows up, so these are never read.
#[cfg(unix)]
fn is_special(file_type: &fs::FileType) -> bool {
    use std::os::unix::fs::FileTypeExt;

    file_type.is_fifo()
        || file_type.is_socket()
        || file_type.is_block_device()
        || file_type.is_char_device()
}

#[cfg(not(unix))]
const fn is_special(_file_type: &fs::FileType) -> bool {
    false
}

fn skip_special(path: &Path) {
    log::warn!("Skipping special file {}", path.display());
}

/// Entry collected during directory enumeration.
#[derive(Debug, Clone)]
struct FileEntry {
    source: PathBuf,
    target: PathBuf,
    is_symlink: bool,
}

/// Enumerated tree: directories (parents first) and non-directory entries.
#[derive(Debug, Default)]
struct TreeListing {
    dirs: Vec<FileEntry>,
    files: Vec<FileEntry>,
}

fn copy_tree(source: &Path, target: &Path, options: &CopyOptions) -> Result<(), CopyError> {
    let listing = enumerate_directory(source, target)?;

    log::debug!(
        "Found {} directories and {} files under {}",
        listing.dirs.len(),
        listing.files.len(),
        source.display()
    );

    if options.dry_run {
        for entry in listing.dirs.iter().chain(&listing.files) {
            report(options, &entry.source);
        }
        return Ok(());
    }

    replace_with_dir(target)?;
    for dir in &listing.dirs {
        replace_with_dir(&dir.target)?;
    }

    listing
        .files
        .par_iter()
        .try_for_each(|entry| -> Result<(), CopyError> {
            report(options, &entry.source);
            copy_entry(entry)
        })?;

    // Directory times change as children are written, so apply them last,
    // deepest first.
    for dir in listing.dirs.iter().rev() {
        copy_dir_metadata(&dir.source, &dir.target)?;
    }
    copy_dir_metadata(source, target)
}

/// Enumerate a directory tree using jwalk for parallel traversal.
fn enumerate_directory(source: &Path, target: &Path) -> Result<TreeListing, CopyError> {
    let mut listing = TreeListing::default();

    for entry in jwalk::WalkDir::new(source)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
        .min_depth(1)
    {
        let entry = entry.map_err(|e| CopyError::EnumerationError {
            path: source.to_path_buf(),
            message: e.to_string(),
        })?;

        let source_path = entry.path();
        let rel_path =
            source_path
                .strip_prefix(source)
                .map_err(|_| CopyError::EnumerationError {
                    path: source_path.clone(),
                    message: "Failed to strip prefix".to_string(),
                })?;
        let target_path = target.join(rel_path);

        let file_type = entry.file_type();
        let file_entry = FileEntry {
            source: source_path.clone(),
            target: target_path,
            is_symlink: file_type.is_symlink(),
        };

        if file_type.is_dir() {
            listing.dirs.push(file_entry);
        } else if is_special(&file_type) {
            skip_special(&file_entry.source);
        } else {
            listing.files.push(file_entry);
        }
    }

    Ok(listing)
}

fn report(options: &CopyOptions, path: &Path) {
    if options.verbose {
        log::info!("{}", path.display());
    } else {
        log::trace!("{}", path.display());
    }
}

fn create_dir(path: &Path) -> Result<(), CopyError> {
    fs::create_dir_all(path).map_err(|e| CopyError::CreateDirError {
        path: path.to_path_buf(),
        io_error: e,
    })
}

/// Create `path` as a real directory. A symlink or file already sitting
/// there is removed first so nothing is written through it.
fn replace_with_dir(path: &Path) -> Result<(), CopyError> {
    if path.is_symlink() || (path.exists() && !path.is_dir()) {
        log::debug!("Replacing {} with a directory", path.display());
        remove_existing(path)?;
    }
    create_dir(path)
}

fn copy_entry(entry: &FileEntry) -> Result<(), CopyError> {
    if entry.is_symlink {
        copy_symlink(&entry.source, &entry.target)
    } else {
        copy_file_with_reflink(&entry.source, &entry.target)?;
        copy_file_times(&entry.source, &entry.target)
    }
}

/// Copy a single file, trying reflink first then falling back to regular copy.
fn copy_file_with_reflink(source: &Path, target: &Path) -> Result<(), CopyError> {
    // Reflink refuses to replace an existing file.
    if target.is_symlink() || target.exists() {
        remove_existing(target)?;
    }

    match reflink_copy::reflink(source, target) {
        Ok(()) => {
            // Reflink clones data only.
            let permissions = fs::metadata(source)
                .map_err(|e| CopyError::MetadataError {
                    path: source.to_path_buf(),
                    io_error: e,
                })?
                .permissions();
            fs::set_permissions(target, permissions).map_err(|e| CopyError::MetadataError {
                path: target.to_path_buf(),
                io_error: e,
            })?;
            log::trace!("Reflinked {} -> {}", source.display(), target.display());
            Ok(())
        }
        Err(_) => {
            fs::copy(source, target).map_err(|e| CopyError::FileCopyError {
                source_path: source.to_path_buf(),
                target_path: target.to_path_buf(),
                io_error: e,
            })?;
            log::trace!("Copied {} -> {}", source.display(), target.display());
            Ok(())
        }
    }
}

fn remove_existing(target: &Path) -> Result<(), CopyError> {
    let result = if target.is_dir() && !target.is_symlink() {
        fs::remove_dir_all(target)
    } else {
        fs::remove_file(target)
    };
    result.map_err(|e| CopyError::FileCopyError {
        source_path: target.to_path_buf(),
        target_path: target.to_path_buf(),
        io_error: e,
    })
}

fn copy_file_times(source: &Path, target: &Path) -> Result<(), CopyError> {
    let metadata = fs::metadata(source).map_err(|e| CopyError::MetadataError {
        path: source.to_path_buf(),
        io_error: e,
    })?;
    filetime::set_file_times(
        target,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )
    .map_err(|e| CopyError::MetadataError {
        path: target.to_path_buf(),
        io_error: e,
    })
}

fn copy_dir_metadata(source: &Path, target: &Path) -> Result<(), CopyError> {
    let metadata = fs::metadata(source).map_err(|e| CopyError::MetadataError {
        path: source.to_path_buf(),
        io_error: e,
    })?;
    fs::set_permissions(target, metadata.permissions()).map_err(|e| {
        CopyError::MetadataError {
            path: target.to_path_buf(),
            io_error: e,
        }
    })?;
    filetime::set_file_mtime(target, FileTime::from_last_modification_time(&metadata)).map_err(
        |e| CopyError::MetadataError {
            path: target.to_path_buf(),
            io_error: e,
        },
    )
}

/// Copy a symlink, preserving it as a symlink.
fn copy_symlink(source: &Path, target: &Path) -> Result<(), CopyError> {
    let link_target = fs::read_link(source).map_err(|e| CopyError::ReadLinkError {
        path: source.to_path_buf(),
        io_error: e,
    })?;

    if target.is_symlink() || target.exists() {
        remove_existing(target)?;
    }

    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(&link_target, target).map_err(|e| {
            CopyError::CreateSymlinkError {
                path: target.to_path_buf(),
                io_error: e,
            }
        })?;
    }

    #[cfg(windows)]
    {
        let resolved = source
            .parent()
            .map_or_else(|| link_target.clone(), |p| p.join(&link_target));
        let created = if resolved.is_dir() {
            std::os::windows::fs::symlink_dir(&link_target, target)
        } else {
            std::os::windows::fs::symlink_file(&link_target, target)
        };
        created.map_err(|e| CopyError::CreateSymlinkError {
            path: target.to_path_buf(),
            io_error: e,
        })?;
    }

    let metadata = fs::symlink_metadata(source).map_err(|e| CopyError::MetadataError {
        path: source.to_path_buf(),
        io_error: e,
    })?;
    filetime::set_symlink_file_times(
        target,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )
    .map_err(|e| CopyError::MetadataError {
        path: target.to_path_buf(),
        io_error: e,
    })?;

    log::trace!(
        "Symlinked {} -> {} (target: {})",
        source.display(),
        target.display(),
        link_target.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn options() -> CopyOptions {
        CopyOptions::default()
    }

    #[test]
    fn test_copy_contents() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        let dest = dir.path().join("dst");

        fs::create_dir_all(source.join("subdir")).unwrap();
        fs::write(source.join("file1.txt"), "content1").unwrap();
        fs::write(source.join("subdir/file2.txt"), "content2").unwrap();

        NativeEngine::new()
            .copy(&CopyRequest::contents(&source, &dest), &options())
            .unwrap();

        assert_eq!(
            fs::read_to_string(dest.join("file1.txt")).unwrap(),
            "content1"
        );
        assert_eq!(
            fs::read_to_string(dest.join("subdir/file2.txt")).unwrap(),
            "content2"
        );
        assert!(!dest.join("src").exists());
    }

    #[test]
    fn test_copy_directory_entry() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        let dest = dir.path().join("dst");

        fs::create_dir_all(source.join("d/nested")).unwrap();
        fs::write(source.join("d/nested/deep.txt"), "deep").unwrap();
        fs::create_dir_all(&dest).unwrap();

        NativeEngine::new()
            .copy(&CopyRequest::entry(&source.join("d"), &dest), &options())
            .unwrap();

        assert_eq!(
            fs::read_to_string(dest.join("d/nested/deep.txt")).unwrap(),
            "deep"
        );
    }

    #[test]
    fn test_copy_file_entry_overwrites() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("x");
        let dest = dir.path().join("dst");

        fs::write(&source, "new").unwrap();
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("x"), "old").unwrap();

        NativeEngine::new()
            .copy(&CopyRequest::entry(&source, &dest), &options())
            .unwrap();

        assert_eq!(fs::read_to_string(dest.join("x")).unwrap(), "new");
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        let dest = dir.path().join("dst");

        fs::create_dir_all(source.join("d")).unwrap();
        fs::write(source.join("d/file.txt"), "content").unwrap();
        fs::write(source.join("top.txt"), "top").unwrap();

        let dry = CopyOptions {
            dry_run: true,
            ..CopyOptions::default()
        };
        let engine = NativeEngine::new();
        engine
            .copy(&CopyRequest::contents(&source, &dest), &dry)
            .unwrap();
        engine
            .copy(&CopyRequest::entry(&source.join("top.txt"), &dest), &dry)
            .unwrap();

        assert!(!dest.exists());
    }

    #[test]
    fn test_preserves_modification_time() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        let dest = dir.path().join("dst");

        fs::create_dir_all(&source).unwrap();
        let file = source.join("old.txt");
        fs::write(&file, "old").unwrap();
        let mtime = FileTime::from_unix_time(1_600_000_000, 0);
        filetime::set_file_mtime(&file, mtime).unwrap();

        NativeEngine::new()
            .copy(&CopyRequest::contents(&source, &dest), &options())
            .unwrap();

        let copied = fs::metadata(dest.join("old.txt")).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&copied), mtime);
    }

    #[cfg(unix)]
    #[test]
    fn test_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        let dest = dir.path().join("dst");

        fs::create_dir_all(&source).unwrap();
        let script = source.join("run.sh");
        fs::write(&script, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o750)).unwrap();

        NativeEngine::new()
            .copy(&CopyRequest::contents(&source, &dest), &options())
            .unwrap();

        let mode = fs::metadata(dest.join("run.sh")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o750);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_copied_as_links() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        let dest = dir.path().join("dst");

        fs::create_dir_all(source.join("real")).unwrap();
        fs::write(source.join("real/file.txt"), "content").unwrap();
        std::os::unix::fs::symlink("real", source.join("link")).unwrap();

        NativeEngine::new()
            .copy(&CopyRequest::contents(&source, &dest), &options())
            .unwrap();

        let link = dest.join("link");
        assert!(link.is_symlink());
        assert_eq!(fs::read_link(&link).unwrap(), PathBuf::from("real"));
        assert_eq!(
            fs::read_to_string(link.join("file.txt")).unwrap(),
            "content"
        );
    }

    #[cfg(unix)]
    fn mkfifo(path: &Path) {
        let status = std::process::Command::new("mkfifo")
            .arg(path)
            .status()
            .unwrap();
        assert!(status.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_fifos_are_skipped() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        let dest = dir.path().join("dst");

        fs::create_dir_all(source.join("d")).unwrap();
        fs::write(source.join("d/file.txt"), "content").unwrap();
        mkfifo(&source.join("d/pipe"));
        mkfifo(&source.join("top-pipe"));

        let engine = NativeEngine::new();
        engine
            .copy(&CopyRequest::entry(&source.join("d"), &dest), &options())
            .unwrap();
        engine
            .copy(&CopyRequest::entry(&source.join("top-pipe"), &dest), &options())
            .unwrap();

        assert_eq!(
            fs::read_to_string(dest.join("d/file.txt")).unwrap(),
            "content"
        );
        assert!(fs::symlink_metadata(dest.join("d/pipe")).is_err());
        assert!(fs::symlink_metadata(dest.join("top-pipe")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_target_directory_is_replaced() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        let dest = dir.path().join("dst");
        let outside = dir.path().join("outside");

        fs::create_dir_all(source.join("d/sub")).unwrap();
        fs::write(source.join("d/f.txt"), "f").unwrap();
        fs::write(source.join("d/sub/g.txt"), "g").unwrap();
        fs::create_dir_all(&dest).unwrap();
        fs::create_dir_all(outside.join("sub")).unwrap();
        std::os::unix::fs::symlink(&outside, dest.join("d")).unwrap();

        NativeEngine::new()
            .copy(&CopyRequest::entry(&source.join("d"), &dest), &options())
            .unwrap();

        let target = dest.join("d");
        assert!(!target.is_symlink());
        assert!(target.is_dir());
        assert_eq!(fs::read_to_string(target.join("f.txt")).unwrap(), "f");
        assert_eq!(fs::read_to_string(target.join("sub/g.txt")).unwrap(), "g");
        assert!(!outside.join("f.txt").exists());
        assert!(!outside.join("sub/g.txt").exists());
    }

    #[test]
    fn test_file_in_place_of_directory_is_replaced() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        let dest = dir.path().join("dst");

        fs::create_dir_all(source.join("d")).unwrap();
        fs::write(source.join("d/f.txt"), "f").unwrap();
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("d"), "stale").unwrap();

        NativeEngine::new()
            .copy(&CopyRequest::entry(&source.join("d"), &dest), &options())
            .unwrap();

        assert_eq!(fs::read_to_string(dest.join("d/f.txt")).unwrap(), "f");
    }

    #[test]
    fn test_missing_source_is_metadata_error() {
        let dir = TempDir::new().unwrap();
        let err = NativeEngine::new()
            .copy(
                &CopyRequest::entry(&dir.path().join("missing"), dir.path()),
                &options(),
            )
            .unwrap_err();
        assert!(matches!(err, CopyError::MetadataError { .. }));
    }
}
