use colored::*;
use imgswap_core::summary::{summary_lines, SummaryLevel};
use imgswap_core::{
    BackupOutcome, DimensionProbe, FileOutcome, FileRecord, ProgressReporter, RunSummary,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Mutex;

/// CLI progress reporter: per-file lines printed above an indicatif bar,
/// then the coloured run summary.
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn line(&self, msg: String) {
        let guard = self.bar.lock().unwrap();
        match guard.as_ref() {
            Some(pb) => pb.println(msg),
            None => eprintln!("{}", msg),
        }
    }

    fn finish_bar(&self) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_discovery_complete(&self, total_files: usize, backup_root: &Path) {
        if total_files == 0 {
            return;
        }
        eprintln!(
            "Found {} files to replace, backups go to {}",
            format!("{}", total_files).cyan(),
            backup_root.display()
        );

        let pb = ProgressBar::new(total_files as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "  {spinner:.cyan} Replacing [{bar:30.cyan/dim}] {pos}/{len} files ({eta} remaining)",
            )
            .unwrap()
            .progress_chars("━╸─")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        *self.bar.lock().unwrap() = Some(pb);
    }

    fn on_file_start(&self, index: usize, total: usize, path: &Path) {
        self.line(format!(
            "\n[{}/{}] Processing: {}",
            index,
            total,
            path.display()
        ));
    }

    fn on_dimensions(&self, _path: &Path, probe: &DimensionProbe) {
        match probe {
            DimensionProbe::Measured(dims) => {
                self.line(format!("  Original dimensions: {}", dims));
            }
            DimensionProbe::Fallback { dimensions, reason } => {
                self.line(format!(
                    "  {} {} (using {})",
                    "Could not read dimensions:".yellow(),
                    reason,
                    dimensions
                ));
            }
        }
    }

    fn on_backup(&self, outcome: &BackupOutcome) {
        match outcome {
            BackupOutcome::Copied { path } => {
                self.line(format!("  Backed up to: {}", path.display()));
            }
            BackupOutcome::Failed { reason, .. } => {
                self.line(format!("  {} {}", "Backup failed:".yellow(), reason));
            }
        }
    }

    fn on_fetch_start(&self, url: &str) {
        self.line(format!("  Downloading {}", url));
    }

    fn on_file_complete(&self, record: &FileRecord) {
        match &record.outcome {
            FileOutcome::Replaced { bytes } => self.line(format!(
                "  {} Replaced {} ({} bytes)",
                "✓".green(),
                record.path.display(),
                bytes
            )),
            FileOutcome::NotReplaced { reason } => {
                self.line(format!("  {} {}", "✗".red(), reason))
            }
        }

        if let Some(pb) = self.bar.lock().unwrap().as_ref() {
            pb.inc(1);
        }
    }

    fn on_run_complete(&self, summary: &RunSummary) {
        self.finish_bar();

        println!();
        println!("{}", "=".repeat(50));
        for line in summary_lines(summary) {
            let text = match line.level {
                SummaryLevel::Info => line.text.normal(),
                SummaryLevel::Success => line.text.green(),
                SummaryLevel::Warning => line.text.red(),
            };
            println!("{}", text);
        }
        println!(
            "Elapsed: {}",
            format!("{:.2}s", summary.duration.as_secs_f64()).green()
        );
    }
}
