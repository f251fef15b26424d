use crate::error::Error;
use crate::model::BackupOutcome;
use std::fs::{self, File, FileTimes};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Mirror of `file` under `backup_root`, keeping its path relative to `root`.
pub fn backup_path(root: &Path, backup_root: &Path, file: &Path) -> PathBuf {
    match file.strip_prefix(root) {
        Ok(relative) => backup_root.join(relative),
        Err(_) => backup_root.join(path_without_root(file)),
    }
}

/// Drops drive prefixes and the root so a foreign absolute path can be
/// nested under the backup root.
fn path_without_root(path: &Path) -> PathBuf {
    path.components()
        .skip_while(|comp| matches!(comp, Component::Prefix(_) | Component::RootDir))
        .collect()
}

/// Copies contents and permissions, then carries over the timestamps.
/// Timestamp failures are logged only: the bytes are what matter.
pub fn copy_with_metadata(src: &Path, dest: &Path) -> Result<u64, Error> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::filesystem(parent, e))?;
    }

    let bytes = fs::copy(src, dest).map_err(|e| Error::filesystem(src, e))?;

    if let Err(e) = copy_times(src, dest) {
        warn!("Could not preserve timestamps on {}: {}", dest.display(), e);
    }

    Ok(bytes)
}

fn copy_times(src: &Path, dest: &Path) -> std::io::Result<()> {
    let metadata = fs::metadata(src)?;
    let mut times = FileTimes::new().set_modified(metadata.modified()?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    File::options().write(true).open(dest)?.set_times(times)
}

pub fn backup_file(root: &Path, backup_root: &Path, file: &Path) -> BackupOutcome {
    let path = backup_path(root, backup_root, file);
    match copy_with_metadata(file, &path) {
        Ok(bytes) => {
            debug!("Backed up {} ({} bytes) to {}", file.display(), bytes, path.display());
            BackupOutcome::Copied { path }
        }
        Err(err) => {
            warn!("Backup failed for {}: {}", file.display(), err);
            BackupOutcome::Failed {
                path,
                reason: err.to_string(),
            }
        }
    }
}
