pub mod backup;
pub mod config;
pub mod dimensions;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod progress;
pub mod replace;
pub mod report;
pub mod scanner;
pub mod summary;

pub use config::AppConfig;
pub use engine::{discover, Discovery, ReplaceEngine};
pub use error::Error;
pub use fetcher::{PicsumClient, PlaceholderSource};
pub use model::{BackupOutcome, DimensionProbe, Dimensions, FileOutcome, FileRecord, RunSummary};
pub use progress::{ProgressReporter, SilentReporter};
