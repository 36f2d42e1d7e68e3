//! Command line construction for the checker.
//!
//! Layout: `<runtime> [runtime options] -jar <jar> [checker options] <files>`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::options::{OutputFormat, ValidatorConfig};

/// Options for the runtime itself
pub fn runtime_options(config: &ValidatorConfig) -> Vec<String> {
    config
        .stack_size()
        .map(|kib| format!("-Xss{kib}k"))
        .into_iter()
        .collect()
}

/// Options for the checker. `format` overrides the configured format.
pub fn engine_options(config: &ValidatorConfig, format: Option<OutputFormat>) -> Vec<String> {
    let mut options = Vec::new();

    if config.errors_only() {
        options.push("--errors-only".to_string());
    }
    if !config.detect_language() {
        options.push("--no-langdetect".to_string());
    }
    if let Some(format) = format.or(config.format()) {
        options.push("--format".to_string());
        options.push(format.as_str().to_string());
    }
    options.extend(config.engine_args().iter().cloned());

    options
}

/// Every argument after the runtime program, in order
pub fn command_args(
    config: &ValidatorConfig,
    jar: &Path,
    files: &[PathBuf],
    format: Option<OutputFormat>,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = runtime_options(config)
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push("-jar".into());
    args.push(jar.as_os_str().to_owned());
    args.extend(engine_options(config, format).into_iter().map(OsString::from));
    args.extend(files.iter().map(|f| f.as_os_str().to_owned()));
    args
}

pub fn build_command(
    config: &ValidatorConfig,
    jar: &Path,
    files: &[PathBuf],
    format: Option<OutputFormat>,
) -> Command {
    let mut command = Command::new(config.runtime());
    command.args(command_args(config, jar, files, format));
    command
}
