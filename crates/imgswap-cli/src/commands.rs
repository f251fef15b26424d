use clap::{Args, Parser, Subcommand};
use imgswap_core::config::ConfigOverrides;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "imgswap")]
#[command(
    about = "Back up images in a directory tree and replace them with same-sized placeholders",
    long_about = None
)]
pub struct Cli {
    /// Configuration file (default: Imgswap.toml in the working directory, if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Back up every matching image and replace it with a downloaded placeholder
    Replace(ReplaceArgs),
    /// List matching images and their dimensions without changing anything
    Scan(TargetArgs),
    /// Print configuration values
    PrintConfig(TargetArgs),
}

#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Directory to scan
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Where originals are copied to; relative paths are under the root
    #[arg(long)]
    pub backup_dir: Option<PathBuf>,

    /// File extension to match, case-insensitive
    #[arg(long)]
    pub extension: Option<String>,
}

impl TargetArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            root_dir: self.root.clone(),
            backup_dir: self.backup_dir.clone(),
            extension: self.extension.clone(),
        }
    }
}

#[derive(Debug, Args)]
pub struct ReplaceArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Write a per-file CSV report here
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}
