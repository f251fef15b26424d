use crate::error::Error;
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use walkdir::{DirEntry, WalkDir};

/// Recursive scan of `root` for files whose name ends with `.{extension}`,
/// compared case-insensitively. Anything under `exclude_dirs` or matching
/// one of `ignore_globs` is skipped. Symlinks are not followed.
///
/// The result is sorted. An unreadable root is an error; unreadable
/// entries further down are logged and skipped.
pub fn find_matching_files(
    root: &Path,
    extension: &str,
    exclude_dirs: &[PathBuf],
    ignore_globs: &[String],
) -> Result<Vec<PathBuf>, Error> {
    let metadata = fs::metadata(root).map_err(|e| Error::filesystem(root, e))?;
    if !metadata.is_dir() {
        return Err(Error::filesystem(
            root,
            std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        ));
    }
    // read_dir surfaces permission problems that metadata() does not
    fs::read_dir(root).map_err(|e| Error::filesystem(root, e))?;

    let ignore_patterns: Vec<Pattern> = ignore_globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(p) => Some(p),
            Err(e) => {
                error!("Invalid glob pattern '{}': {}", glob, e);
                None
            }
        })
        .collect();

    let suffix = format!(".{}", extension.trim_start_matches('.').to_lowercase());

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry, exclude_dirs, &ignore_patterns));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if err.depth() == 0 {
                    let path = err.path().unwrap_or(root).to_path_buf();
                    let io_err = err
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                    return Err(Error::filesystem(path, io_err));
                }
                error!("Error reading entry under {}: {}", root.display(), err);
                continue;
            }
        };

        if !has_suffix(&entry, &suffix) {
            continue;
        }
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        } else if entry.path_is_symlink() {
            debug!("Skipping symlink {}", entry.path().display());
        }
    }

    files.sort();
    debug!("Found {} '{}' files under {}", files.len(), suffix, root.display());
    Ok(files)
}

fn has_suffix(entry: &DirEntry, suffix: &str) -> bool {
    entry
        .file_name()
        .to_string_lossy()
        .to_lowercase()
        .ends_with(suffix)
}

fn is_excluded(entry: &DirEntry, exclude_dirs: &[PathBuf], ignore_patterns: &[Pattern]) -> bool {
    let path = entry.path();
    exclude_dirs.iter().any(|dir| path.starts_with(dir))
        || ignore_patterns
            .iter()
            .any(|pattern| pattern.matches_path(path))
}
