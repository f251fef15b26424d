use crate::model::{BackupOutcome, DimensionProbe, FileRecord, RunSummary};
use std::path::Path;

/// Trait for reporting run progress.
///
/// The CLI implements it with indicatif and colored output; library users
/// and tests can use `SilentReporter`. All methods have default no-op
/// implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_discovery_complete(&self, _total_files: usize, _backup_root: &Path) {}
    fn on_file_start(&self, _index: usize, _total: usize, _path: &Path) {}
    fn on_dimensions(&self, _path: &Path, _probe: &DimensionProbe) {}
    fn on_backup(&self, _outcome: &BackupOutcome) {}
    fn on_fetch_start(&self, _url: &str) {}
    fn on_file_complete(&self, _record: &FileRecord) {}
    fn on_run_complete(&self, _summary: &RunSummary) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
