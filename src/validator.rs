//! The validator facade: discovery, error counting and structured messages.

use std::path::{Path, PathBuf};

use crate::discovery::FileCollector;
use crate::engine::EngineInvoker;
use crate::error::Result;
use crate::options::{OutputFormat, ValidatorConfig, ValidatorOptions};
use crate::validation::{DiagnosticMessage, NoiseFilter, parse_messages};

#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    pub fn new(options: ValidatorOptions) -> Result<Self> {
        Ok(Self::with_config(ValidatorConfig::new(options)?))
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Files below `root` matching any of `patterns` (default `*.html`).
    pub fn all_files<S: AsRef<str>>(
        &self,
        root: &Path,
        patterns: &[S],
        blacklist: Vec<String>,
        skip_hidden: bool,
    ) -> Result<Vec<PathBuf>> {
        FileCollector::new(patterns, blacklist, skip_hidden)?.collect(root)
    }

    /// Check `files` and return the number of diagnostic lines left after
    /// the ignore rules. Each remaining line is logged at error level.
    pub fn validate(&self, files: &[PathBuf]) -> Result<usize> {
        let stderr = EngineInvoker::new(&self.config).run(files, None)?;
        let lines = NoiseFilter::new(&self.config).filter(&stderr);

        if lines.is_empty() {
            log::info!("All good.");
        } else {
            for line in &lines {
                log::error!("{}", line);
            }
        }

        Ok(lines.len())
    }

    /// Check `files` with JSON output and return every message the checker
    /// reported. Ignore rules do not apply here.
    pub fn get_messages(&self, files: &[PathBuf]) -> Result<Vec<DiagnosticMessage>> {
        let stderr = EngineInvoker::new(&self.config).run(files, Some(OutputFormat::Json))?;
        parse_messages(&stderr)
    }
}
