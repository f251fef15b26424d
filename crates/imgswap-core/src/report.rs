use crate::error::Error;
use crate::model::{BackupOutcome, DimensionProbe, FileOutcome, FileRecord, RunSummary};
use serde::Serialize;
use std::fs::File;
use std::path::Path;

#[derive(Debug, Serialize)]
struct OutcomeRow {
    path: String,
    width: u32,
    height: u32,
    dimensions_fallback: bool,
    backup_path: String,
    backup_ok: bool,
    seed: u32,
    replaced: bool,
    bytes: usize,
    error: String,
}

impl From<&FileRecord> for OutcomeRow {
    fn from(record: &FileRecord) -> Self {
        let dims = record.probe.dimensions();
        let mut errors = Vec::new();

        if let DimensionProbe::Fallback { reason, .. } = &record.probe {
            errors.push(format!("dimensions: {}", reason));
        }
        if let BackupOutcome::Failed { reason, .. } = &record.backup {
            errors.push(format!("backup: {}", reason));
        }
        let (replaced, bytes) = match &record.outcome {
            FileOutcome::Replaced { bytes } => (true, *bytes),
            FileOutcome::NotReplaced { reason } => {
                errors.push(format!("replace: {}", reason));
                (false, 0)
            }
        };

        OutcomeRow {
            path: record.path.to_string_lossy().into_owned(),
            width: dims.width,
            height: dims.height,
            dimensions_fallback: record.probe.is_fallback(),
            backup_path: record.backup.path().to_string_lossy().into_owned(),
            backup_ok: record.backup.is_copied(),
            seed: record.seed,
            replaced,
            bytes,
            error: errors.join("; "),
        }
    }
}

/// One row per processed file, header included. Failing to create or flush
/// the file is an `Error::Io`; row encoding failures are `Error::Csv`.
pub fn write_outcome_csv(path: &Path, summary: &RunSummary) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::Writer::from_writer(file);
    for record in &summary.records {
        wtr.serialize(OutcomeRow::from(record))?;
    }
    wtr.flush()?;
    Ok(())
}
