use crate::error::Error;
use config::{Config, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BACKUP_DIR: &str = "backup_original_images";
pub const DEFAULT_EXTENSION: &str = "jpg";
pub const DEFAULT_BASE_URL: &str = "https://picsum.photos";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub root_dir: PathBuf,
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    #[serde(default)]
    pub placeholder: PlaceholderConfig,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaceholderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub seed_min: u32,
    pub seed_max: u32,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            seed_min: 1,
            seed_max: 1000,
        }
    }
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from(DEFAULT_BACKUP_DIR)
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_delay_ms() -> u64 {
    500
}

/// Values given on the command line. They win over every other source.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub root_dir: Option<PathBuf>,
    pub backup_dir: Option<PathBuf>,
    pub extension: Option<String>,
}

/// Layers, lowest priority first: field defaults, `Imgswap.toml` (or the
/// explicit `config_file`), `IMGSWAP_*` environment variables, overrides.
pub fn load_configuration(
    config_file: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<AppConfig, Error> {
    let file_source = match config_file {
        Some(path) => ConfigFile::from(path).required(true),
        None => ConfigFile::with_name("Imgswap").required(false),
    };

    let builder = Config::builder()
        .add_source(file_source)
        .add_source(
            Environment::with_prefix("IMGSWAP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .set_override_option("root_dir", path_override(&overrides.root_dir))?
        .set_override_option("backup_dir", path_override(&overrides.backup_dir))?
        .set_override_option("extension", overrides.extension.clone())?
        .build()?;

    let config = builder.try_deserialize::<AppConfig>()?;
    config.validate()?;
    Ok(config)
}

fn path_override(path: &Option<PathBuf>) -> Option<String> {
    path.as_ref().map(|p| p.to_string_lossy().into_owned())
}

impl AppConfig {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            backup_dir: default_backup_dir(),
            extension: default_extension(),
            ignore_patterns: Vec::new(),
            placeholder: PlaceholderConfig::default(),
            delay_ms: default_delay_ms(),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.normalized_extension().is_empty() {
            return Err(Error::InvalidConfig("extension must not be empty".into()));
        }
        if self.placeholder.timeout_secs == 0 {
            return Err(Error::InvalidConfig(
                "placeholder.timeout_secs must be positive".into(),
            ));
        }
        if self.placeholder.seed_min > self.placeholder.seed_max {
            return Err(Error::InvalidConfig(format!(
                "placeholder.seed_min ({}) is greater than placeholder.seed_max ({})",
                self.placeholder.seed_min, self.placeholder.seed_max
            )));
        }
        Ok(())
    }

    /// Lowercased extension without a leading dot.
    pub fn normalized_extension(&self) -> String {
        self.extension
            .trim()
            .trim_start_matches('.')
            .to_ascii_lowercase()
    }

    /// Relative backup dirs live under the scanned root.
    pub fn backup_root(&self, root: &Path) -> PathBuf {
        if self.backup_dir.is_absolute() {
            self.backup_dir.clone()
        } else {
            root.join(&self.backup_dir)
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.placeholder.timeout_secs)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
