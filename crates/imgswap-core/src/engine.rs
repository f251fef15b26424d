use crate::backup;
use crate::config::AppConfig;
use crate::dimensions;
use crate::error::Error;
use crate::fetcher::{PicsumClient, PlaceholderSource};
use crate::model::{FileOutcome, FileRecord, RunSummary};
use crate::progress::ProgressReporter;
use crate::replace;
use crate::scanner;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Files selected for a run, with the canonical root they were found under.
#[derive(Debug)]
pub struct Discovery {
    pub root: PathBuf,
    pub backup_root: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Resolve the configured root and list matching files. The backup root is
/// never scanned. This is the only step whose failure ends a run.
pub fn discover(config: &AppConfig) -> Result<Discovery, Error> {
    let root = fs::canonicalize(&config.root_dir)
        .map_err(|e| Error::filesystem(&config.root_dir, e))?;
    let backup_root = resolve_links(&config.backup_root(&root));
    let extension = config.normalized_extension();

    info!("Scanning {} for .{} files...", root.display(), extension);
    let files = scanner::find_matching_files(
        &root,
        &extension,
        std::slice::from_ref(&backup_root),
        &config.ignore_patterns,
    )?;
    info!("Found {} .{} files to replace", files.len(), extension);

    Ok(Discovery {
        root,
        backup_root,
        files,
    })
}

/// Canonicalize the longest existing ancestor of `path` and re-append the
/// rest, so a backup root reached through a symlink compares equal to the
/// canonical paths the walker yields.
fn resolve_links(path: &Path) -> PathBuf {
    let mut existing = path;
    let mut tail = Vec::new();
    loop {
        if let Ok(canonical) = fs::canonicalize(existing) {
            return tail
                .iter()
                .rev()
                .fold(canonical, |acc: PathBuf, part| acc.join(part));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name.to_os_string());
                existing = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}

pub struct ReplaceEngine<S: PlaceholderSource = PicsumClient> {
    config: AppConfig,
    source: S,
    delay: Duration,
    rng: StdRng,
}

impl ReplaceEngine<PicsumClient> {
    pub fn from_config(config: AppConfig) -> Result<Self, Error> {
        config.validate()?;
        let source = PicsumClient::from_config(&config)?;
        Ok(Self::new(config, source))
    }
}

impl<S: PlaceholderSource> ReplaceEngine<S> {
    pub fn new(config: AppConfig, source: S) -> Self {
        let delay = config.delay();
        Self {
            config,
            source,
            delay,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Reproducible seed sequence.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run the full pipeline over every discovered file:
    /// 1. Measure dimensions (fallback on decode failure)
    /// 2. Back up to the mirrored path (failure does not stop the file)
    /// 3. Fetch a placeholder with a fresh seed
    /// 4. Atomically overwrite the original on success
    /// 5. Pause before the next file
    pub fn run(&mut self, reporter: &dyn ProgressReporter) -> Result<RunSummary, Error> {
        self.config.validate()?;
        let start = Instant::now();
        let Discovery {
            root,
            backup_root,
            files,
        } = discover(&self.config)?;
        reporter.on_discovery_complete(files.len(), &backup_root);

        let mut records = Vec::with_capacity(files.len());

        if !files.is_empty() {
            fs::create_dir_all(&backup_root).map_err(|e| Error::filesystem(&backup_root, e))?;
            info!("Backup directory: {}", backup_root.display());

            let total = files.len();
            for (i, path) in files.iter().enumerate() {
                if i > 0 && !self.delay.is_zero() {
                    thread::sleep(self.delay);
                }
                let record = self.process_file(&root, &backup_root, path, i + 1, total, reporter);
                reporter.on_file_complete(&record);
                records.push(record);
            }
        }

        let summary = RunSummary {
            root,
            backup_root,
            records,
            duration: start.elapsed(),
        };
        info!(
            "Replaced {}/{} files in {:.2}s",
            summary.replaced(),
            summary.total_found(),
            summary.duration.as_secs_f64()
        );
        reporter.on_run_complete(&summary);
        Ok(summary)
    }

    fn process_file(
        &mut self,
        root: &Path,
        backup_root: &Path,
        path: &Path,
        index: usize,
        total: usize,
        reporter: &dyn ProgressReporter,
    ) -> FileRecord {
        reporter.on_file_start(index, total, path);
        debug!("[{}/{}] Processing {}", index, total, path.display());

        let probe = dimensions::probe_dimensions(path);
        reporter.on_dimensions(path, &probe);

        let backup = backup::backup_file(root, backup_root, path);
        reporter.on_backup(&backup);

        let seed = self.next_seed();
        let dims = probe.dimensions();
        reporter.on_fetch_start(&self.source.url_for(dims, seed));

        let outcome = match self
            .source
            .fetch(dims, seed)
            .and_then(|bytes| replace::write_atomically(path, &bytes).map(|_| bytes.len()))
        {
            Ok(bytes) => FileOutcome::Replaced { bytes },
            Err(err) => {
                warn!("Not replacing {}: {}", path.display(), err);
                FileOutcome::NotReplaced {
                    reason: err.to_string(),
                }
            }
        };

        FileRecord {
            path: path.to_path_buf(),
            probe,
            backup,
            seed,
            outcome,
        }
    }

    fn next_seed(&mut self) -> u32 {
        let placeholder = &self.config.placeholder;
        self.rng.gen_range(placeholder.seed_min..=placeholder.seed_max)
    }
}
