//! Validator settings.
//!
//! `ValidatorOptions` is what callers fill in; `ValidatorConfig` is the
//! immutable, normalized form the pipeline reads from. Building the config
//! appends the built-in ignore rules after the user's own, rewrites
//! typographic quotes in every rule, and compiles the ignore patterns.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use regex::Regex;
use serde::Deserialize;

use crate::error::{Result, ValidatorError};
use crate::validation::filter::{DEFAULT_IGNORE, DEFAULT_IGNORE_RE, normalize_quotes};

pub const DEFAULT_RUNTIME: &str = "java";
pub const DEFAULT_ENGINE_JAR: &str = "vnu.jar";
pub const DEFAULT_PATH_CONVERTER: &str = "cygpath";

/// Environment variable pointing at the checker jar
pub const ENGINE_JAR_ENV: &str = "VNU_JAR";

/// Output formats understood by the checker's `--format` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Gnu,
    Xml,
    Json,
    Text,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Gnu => "gnu",
            OutputFormat::Xml => "xml",
            OutputFormat::Json => "json",
            OutputFormat::Text => "text",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-facing validator options
#[derive(Debug, Clone)]
pub struct ValidatorOptions {
    /// Substrings; any diagnostic line containing one is dropped
    pub ignore: Vec<String>,
    /// Regular expressions searched anywhere in a diagnostic line
    pub ignore_re: Vec<String>,
    /// Pass `--errors-only` to the checker
    pub errors_only: bool,
    /// When false, pass `--no-langdetect`
    pub detect_language: bool,
    pub format: Option<OutputFormat>,
    /// Runtime thread stack size in KiB (`-Xss<N>k`)
    pub stack_size: Option<u32>,
    /// Extra checker arguments, appended verbatim
    pub engine_args: Vec<String>,
    pub runtime: PathBuf,
    pub engine_jar: PathBuf,
    pub timeout: Option<Duration>,
    /// Rewrite paths through `path_converter -w` before handing them over
    pub translate_paths: bool,
    pub path_converter: PathBuf,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            ignore: Vec::new(),
            ignore_re: Vec::new(),
            errors_only: false,
            detect_language: true,
            format: None,
            stack_size: None,
            engine_args: Vec::new(),
            runtime: PathBuf::from(DEFAULT_RUNTIME),
            engine_jar: default_engine_jar(),
            timeout: None,
            translate_paths: cfg!(target_os = "cygwin"),
            path_converter: PathBuf::from(DEFAULT_PATH_CONVERTER),
        }
    }
}

/// Jar location from `$VNU_JAR`, falling back to `vnu.jar`
pub fn default_engine_jar() -> PathBuf {
    std::env::var_os(ENGINE_JAR_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ENGINE_JAR))
}

/// Immutable validator configuration
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    ignore: Vec<String>,
    ignore_re: Vec<Regex>,
    errors_only: bool,
    detect_language: bool,
    format: Option<OutputFormat>,
    stack_size: Option<u32>,
    engine_args: Vec<String>,
    runtime: PathBuf,
    engine_jar: PathBuf,
    timeout: Option<Duration>,
    translate_paths: bool,
    path_converter: PathBuf,
}

impl ValidatorConfig {
    pub fn new(options: ValidatorOptions) -> Result<Self> {
        let ignore = options
            .ignore
            .iter()
            .map(String::as_str)
            .chain(DEFAULT_IGNORE.iter().copied())
            .map(normalize_quotes)
            .collect();

        let ignore_re = options
            .ignore_re
            .iter()
            .map(String::as_str)
            .chain(DEFAULT_IGNORE_RE.iter().copied())
            .map(|pattern| {
                let pattern = normalize_quotes(pattern);
                Regex::new(&pattern)
                    .map_err(|source| ValidatorError::InvalidIgnorePattern { pattern, source })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            ignore,
            ignore_re,
            errors_only: options.errors_only,
            detect_language: options.detect_language,
            format: options.format,
            stack_size: options.stack_size,
            engine_args: options.engine_args,
            runtime: options.runtime,
            engine_jar: options.engine_jar,
            timeout: options.timeout,
            translate_paths: options.translate_paths,
            path_converter: options.path_converter,
        })
    }

    pub fn ignore(&self) -> &[String] {
        &self.ignore
    }

    pub fn ignore_re(&self) -> &[Regex] {
        &self.ignore_re
    }

    pub fn errors_only(&self) -> bool {
        self.errors_only
    }

    pub fn detect_language(&self) -> bool {
        self.detect_language
    }

    pub fn format(&self) -> Option<OutputFormat> {
        self.format
    }

    pub fn stack_size(&self) -> Option<u32> {
        self.stack_size
    }

    pub fn engine_args(&self) -> &[String] {
        &self.engine_args
    }

    pub fn runtime(&self) -> &Path {
        &self.runtime
    }

    pub fn engine_jar(&self) -> &Path {
        &self.engine_jar
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn translate_paths(&self) -> bool {
        self.translate_paths
    }

    pub fn path_converter(&self) -> &Path {
        &self.path_converter
    }
}
