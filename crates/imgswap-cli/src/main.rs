mod commands;
mod logging;
mod progress;

use std::io::{self, Write};
use std::path::Path;
use std::process;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands, ReplaceArgs, TargetArgs};
use dotenv::dotenv;
use imgswap_core::config::load_configuration;
use imgswap_core::dimensions::probe_dimensions;
use imgswap_core::report::write_outcome_csv;
use imgswap_core::{AppConfig, DimensionProbe, ReplaceEngine};
use progress::CliReporter;
use tracing::{error, info};

fn main() {
    dotenv().ok();

    let guard = logging::init_logger();

    let args = Cli::parse();
    let config_file = args.config.as_deref();

    let result = match &args.command {
        Some(Commands::Replace(cmd)) => run_replace(config_file, cmd),
        Some(Commands::Scan(target)) => run_scan(config_file, target),
        Some(Commands::PrintConfig(target)) => {
            load_config(config_file, target).map(|config| println!("Configuration: {:#?}", config))
        }
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = result {
        error!("Error: {:#}", err);
        drop(guard);
        process::exit(1);
    }
}

fn load_config(config_file: Option<&Path>, target: &TargetArgs) -> anyhow::Result<AppConfig> {
    load_configuration(config_file, &target.overrides()).context("Error loading configuration")
}

fn run_replace(config_file: Option<&Path>, args: &ReplaceArgs) -> anyhow::Result<()> {
    let config = load_config(config_file, &args.target)?;

    if !args.yes {
        let prompt = format!(
            "Replace every .{} file under {} with a placeholder image?",
            config.normalized_extension(),
            config.root_dir.display()
        );
        if !prompt_confirm(&prompt, Some(false))? {
            info!("Aborted, nothing was changed");
            return Ok(());
        }
    }

    let mut engine = ReplaceEngine::from_config(config)?;
    let reporter = CliReporter::new();
    let summary = engine.run(&reporter)?;

    if let Some(report_path) = &args.report {
        write_outcome_csv(report_path, &summary)
            .with_context(|| format!("Error writing report to {}", report_path.display()))?;
        info!("Wrote per-file report to {}", report_path.display());
    }

    Ok(())
}

fn run_scan(config_file: Option<&Path>, target: &TargetArgs) -> anyhow::Result<()> {
    let config = load_config(config_file, target)?;
    let discovery = imgswap_core::discover(&config)?;

    for path in &discovery.files {
        match probe_dimensions(path) {
            DimensionProbe::Measured(dims) => println!("{}  {}", dims, path.display()),
            DimensionProbe::Fallback { dimensions, .. } => println!(
                "{}  {}",
                format!("{} (fallback)", dimensions).yellow(),
                path.display()
            ),
        }
    }
    info!(
        "{} files would be replaced, backups would go to {}",
        format!("{}", discovery.files.len()).cyan(),
        discovery.backup_root.display()
    );

    Ok(())
}

fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        if io::stdin().read_line(&mut input)? == 0 {
            // stdin closed: fall back to the default, or refuse
            return Ok(default.unwrap_or(false));
        }

        match input.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}
