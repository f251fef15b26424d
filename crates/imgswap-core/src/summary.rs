use crate::model::RunSummary;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub level: SummaryLevel,
    pub text: String,
}

impl SummaryLine {
    fn new(level: SummaryLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// End-of-run report. The failure line only appears when something was
/// not replaced.
pub fn summary_lines(summary: &RunSummary) -> Vec<SummaryLine> {
    use SummaryLevel::*;

    let total = summary.total_found();
    let replaced = summary.replaced();

    let mut lines = Vec::new();
    if total == 0 {
        lines.push(SummaryLine::new(Warning, "No matching files found"));
    } else {
        lines.push(SummaryLine::new(Info, "Replacement complete"));
    }
    lines.push(SummaryLine::new(Info, format!("Files found: {}", total)));
    lines.push(SummaryLine::new(
        if replaced == total { Success } else { Info },
        format!("Successfully replaced: {}/{}", replaced, total),
    ));

    if total > 0 {
        lines.push(SummaryLine::new(
            Info,
            format!(
                "Original images backed up to: {}",
                summary.backup_root.display()
            ),
        ));
    }
    if replaced < total {
        lines.push(SummaryLine::new(
            Warning,
            format!("{} images failed to download", summary.failed()),
        ));
    }
    let backups_failed = summary.backups_failed();
    if backups_failed > 0 {
        lines.push(SummaryLine::new(
            Warning,
            format!("{} backups could not be written", backups_failed),
        ));
    }

    lines
}
