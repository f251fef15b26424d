use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Used whenever the source image cannot be measured.
    pub const FALLBACK: Dimensions = Dimensions {
        width: 800,
        height: 600,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Result of reading an image header. Decode failures are not errors,
/// they carry the fallback size and the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimensionProbe {
    Measured(Dimensions),
    Fallback { dimensions: Dimensions, reason: String },
}

impl DimensionProbe {
    pub fn dimensions(&self) -> Dimensions {
        match self {
            DimensionProbe::Measured(d) => *d,
            DimensionProbe::Fallback { dimensions, .. } => *dimensions,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, DimensionProbe::Fallback { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    Copied { path: PathBuf },
    Failed { path: PathBuf, reason: String },
}

impl BackupOutcome {
    pub fn path(&self) -> &Path {
        match self {
            BackupOutcome::Copied { path } | BackupOutcome::Failed { path, .. } => path,
        }
    }

    pub fn is_copied(&self) -> bool {
        matches!(self, BackupOutcome::Copied { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Replaced { bytes: usize },
    NotReplaced { reason: String },
}

#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    pub probe: DimensionProbe,
    pub backup: BackupOutcome,
    pub seed: u32,
    pub outcome: FileOutcome,
}

impl FileRecord {
    pub fn is_replaced(&self) -> bool {
        matches!(self.outcome, FileOutcome::Replaced { .. })
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub root: PathBuf,
    pub backup_root: PathBuf,
    pub records: Vec<FileRecord>,
    pub duration: Duration,
}

impl RunSummary {
    pub fn total_found(&self) -> usize {
        self.records.len()
    }

    pub fn replaced(&self) -> usize {
        self.records.iter().filter(|r| r.is_replaced()).count()
    }

    pub fn failed(&self) -> usize {
        self.total_found() - self.replaced()
    }

    pub fn backups_failed(&self) -> usize {
        self.records.iter().filter(|r| !r.backup.is_copied()).count()
    }
}
