//! Checker Invocation
//!
//! Runs the external checker over a set of files and returns its
//! diagnostic stream (stderr), with runtime noise stripped.

pub mod command;
pub mod path;
pub mod process;

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::options::{OutputFormat, ValidatorConfig};
use crate::validation::normalize_quotes;

/// Lines the JVM prints when it honours an options environment variable
pub const STDERR_IGNORE_RE: &str = r"(?m)^Picked up (?:_JAVA_OPTIONS|JAVA_TOOL_OPTIONS):.*\n";

static STDERR_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(STDERR_IGNORE_RE).unwrap()
});

/// Remove the runtime's own announcement lines from `stderr`.
pub fn strip_runtime_noise(stderr: &str) -> String {
    STDERR_NOISE.replace_all(stderr, "").into_owned()
}

/// Runs the checker with the settings of one validator
#[derive(Debug, Clone, Copy)]
pub struct EngineInvoker<'a> {
    config: &'a ValidatorConfig,
}

impl<'a> EngineInvoker<'a> {
    pub fn new(config: &'a ValidatorConfig) -> Self {
        Self { config }
    }

    /// Check `files` and return the checker's diagnostic text.
    ///
    /// `format` overrides the configured output format. Unless JSON is
    /// requested here, typographic quotes are rewritten to ASCII so the
    /// text lines up with the normalized ignore rules.
    pub fn run(&self, files: &[PathBuf], format: Option<OutputFormat>) -> Result<String> {
        let (jar, files) = if self.config.translate_paths() {
            let converter = self.config.path_converter();
            (
                path::translate(converter, self.config.engine_jar())?,
                path::translate_all(converter, files)?,
            )
        } else {
            (self.config.engine_jar().to_path_buf(), files.to_vec())
        };

        let command = command::build_command(self.config, &jar, &files, format);
        log::debug!("{:?}", command);

        let captured = process::run_capturing_stderr(command, self.config.timeout())?;
        log::debug!("validator exited with {}", captured.status);

        let stderr = String::from_utf8_lossy(&captured.stderr);
        let stderr = strip_runtime_noise(&stderr);

        if format == Some(OutputFormat::Json) {
            Ok(stderr)
        } else {
            Ok(normalize_quotes(&stderr))
        }
    }
}
