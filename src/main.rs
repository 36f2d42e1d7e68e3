use std::process::ExitCode;

use anyhow::{Context, Result};

use html5_validator::config::Config;
use html5_validator::{FileCollector, Validator};

fn main() -> Result<ExitCode> {
    // Parse configuration from command line and config files
    let config = Config::from_args_and_env()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    if let Some(path) = &config.config_file {
        log::debug!("Using config file {}", path.display());
    }

    let files = if config.files.is_empty() {
        FileCollector::new(
            config.match_patterns.as_slice(),
            config.blacklist.clone(),
            config.skip_hidden,
        )?
        .collect(&config.root)
        .with_context(|| format!("Failed to collect files below {}", config.root.display()))?
    } else {
        config.files.clone()
    };

    if files.is_empty() {
        log::info!("No files to validate.");
        return Ok(ExitCode::SUCCESS);
    }
    log::debug!("Validating {} file(s)", files.len());

    let validator = Validator::new(config.validator).context("Invalid validator settings")?;
    let errors = validator.validate(&files)?;

    Ok(if errors == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
