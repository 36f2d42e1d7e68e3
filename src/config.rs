//! Configuration management for the `html5validator` binary.
//!
//! Handles:
//! - Command-line argument parsing
//! - Optional TOML config file (explicit, project, or user-global)
//! - Merging both into validator options and discovery settings

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{ArgAction, Parser};
use log::LevelFilter;
use serde::Deserialize;

use crate::error::{Result, ValidatorError};
use crate::options::{OutputFormat, ValidatorOptions, default_engine_jar};

/// Config file looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = ".html5validator.toml";

/// Default match patterns for discovery
pub const DEFAULT_MATCH_PATTERNS: &[&str] = &["*.html", "*.htm"];

/// Stack sizes in KiB selected by `-l`, `-ll` and `-lll`
const STACK_LEVELS: [u32; 3] = [2048, 8192, 32768];

/// Command-line arguments for the validator
#[derive(Debug, Parser)]
#[command(name = "html5validator")]
#[command(about = "Validate HTML, CSS and SVG files with the Nu Html Checker")]
#[command(version)]
pub struct Args {
    /// Files to validate; when omitted, files are discovered below --root
    pub files: Vec<PathBuf>,

    #[arg(long, help = "Directory to search for files (default: .)")]
    pub root: Option<PathBuf>,

    #[arg(
        long = "match",
        num_args = 1..,
        help = "Glob patterns for file names (default: *.html *.htm)"
    )]
    pub match_patterns: Vec<String>,

    #[arg(long, num_args = 1.., help = "Directory names to skip entirely")]
    pub blacklist: Vec<String>,

    #[arg(
        long,
        overrides_with = "no_include_hidden",
        help = "Also validate hidden files and directories"
    )]
    pub include_hidden: bool,

    #[arg(long, overrides_with = "include_hidden", hide = true)]
    pub no_include_hidden: bool,

    #[arg(
        long,
        overrides_with = "no_show_warnings",
        help = "Report warnings as well as errors"
    )]
    pub show_warnings: bool,

    #[arg(long, overrides_with = "show_warnings", hide = true)]
    pub no_show_warnings: bool,

    #[arg(long, overrides_with = "langdetect", help = "Disable language detection")]
    pub no_langdetect: bool,

    #[arg(long, overrides_with = "no_langdetect", hide = true)]
    pub langdetect: bool,

    #[arg(long, value_enum, help = "Output format of the checker")]
    pub format: Option<OutputFormat>,

    #[arg(long, num_args = 1.., help = "Ignore diagnostic lines containing these strings")]
    pub ignore: Vec<String>,

    #[arg(
        long = "ignore-re",
        num_args = 1..,
        help = "Ignore diagnostic lines matching these regular expressions"
    )]
    pub ignore_re: Vec<String>,

    #[arg(
        short = 'l',
        action = ArgAction::Count,
        help = "Raise the runtime stack size (-l, -ll, -lll)"
    )]
    pub stack_level: u8,

    #[arg(long, help = "Runtime stack size in KiB")]
    pub stack_size: Option<u32>,

    #[arg(long, overrides_with = "no_also_check_css", help = "Also check CSS files")]
    pub also_check_css: bool,

    #[arg(long, overrides_with = "also_check_css", hide = true)]
    pub no_also_check_css: bool,

    #[arg(long, overrides_with = "no_also_check_svg", help = "Also check SVG files")]
    pub also_check_svg: bool,

    #[arg(long, overrides_with = "also_check_svg", hide = true)]
    pub no_also_check_svg: bool,

    #[arg(
        long,
        overrides_with = "no_skip_non_html",
        help = "Skip files that do not look like HTML"
    )]
    pub skip_non_html: bool,

    #[arg(long, overrides_with = "skip_non_html", hide = true)]
    pub no_skip_non_html: bool,

    #[arg(
        long = "engine-arg",
        allow_hyphen_values = true,
        help = "Extra argument passed to the checker verbatim (repeatable)"
    )]
    pub engine_args: Vec<String>,

    #[arg(long, help = "Java runtime to run the checker with (default: java)")]
    pub runtime: Option<PathBuf>,

    #[arg(long, help = "Location of vnu.jar (default: $VNU_JAR or vnu.jar)")]
    pub vnu_jar: Option<PathBuf>,

    #[arg(long, help = "Seconds to wait for the checker before killing it")]
    pub timeout: Option<u64>,

    #[arg(long, help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(
        long = "log",
        value_parser = parse_log_level,
        help = "Log level (debug, info, warn, error)"
    )]
    pub log_level: Option<LevelFilter>,
}

/// Settings read from a TOML config file. Keys mirror the long flags.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub root: Option<PathBuf>,
    #[serde(rename = "match")]
    pub match_patterns: Option<Vec<String>>,
    pub blacklist: Option<Vec<String>>,
    pub include_hidden: bool,
    pub show_warnings: bool,
    pub no_langdetect: bool,
    pub format: Option<OutputFormat>,
    pub ignore: Option<Vec<String>>,
    pub ignore_re: Option<Vec<String>>,
    pub stack_size: Option<u32>,
    pub also_check_css: bool,
    pub also_check_svg: bool,
    pub skip_non_html: bool,
    pub engine_args: Option<Vec<String>>,
    pub runtime: Option<PathBuf>,
    pub vnu_jar: Option<PathBuf>,
    pub timeout: Option<u64>,
    pub log: Option<String>,
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Explicit files; empty means discover below `root`
    pub files: Vec<PathBuf>,
    pub root: PathBuf,
    pub match_patterns: Vec<String>,
    pub blacklist: Vec<String>,
    pub skip_hidden: bool,
    pub log_level: LevelFilter,
    pub validator: ValidatorOptions,
    /// Config file that contributed to this configuration, if any
    pub config_file: Option<PathBuf>,
}

impl Config {
    /// Create configuration from command-line arguments and config files
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments, looking up a config file
    pub fn from_args(args: Args) -> Result<Self> {
        let file = match find_config_file(args.config.as_deref())? {
            Some(path) => {
                let file = load_file_config(&path)?;
                Some((path, file))
            }
            None => None,
        };
        Self::resolve(args, file)
    }

    /// Merge `args` over an already loaded config file. Flags and values
    /// given on the command line win; lists replace the file's lists. A
    /// switch the file turns on is turned off again by its `--no-` form.
    pub fn resolve(args: Args, file: Option<(PathBuf, FileConfig)>) -> Result<Self> {
        let (config_file, file) = match file {
            Some((path, file)) => (Some(path), file),
            None => (None, FileConfig::default()),
        };

        let log_level = match (args.log_level, &file.log) {
            (Some(level), _) => level,
            (None, Some(name)) => parse_log_level(name).map_err(|message| ValidatorError::Config {
                path: config_file.clone().unwrap_or_default(),
                message,
            })?,
            (None, None) => LevelFilter::Warn,
        };

        let also_check_css =
            switch(args.also_check_css, args.no_also_check_css, file.also_check_css);
        let also_check_svg =
            switch(args.also_check_svg, args.no_also_check_svg, file.also_check_svg);
        let skip_non_html = switch(args.skip_non_html, args.no_skip_non_html, file.skip_non_html);
        let show_warnings = switch(args.show_warnings, args.no_show_warnings, file.show_warnings);
        let no_langdetect = switch(args.no_langdetect, args.langdetect, file.no_langdetect);
        let include_hidden =
            switch(args.include_hidden, args.no_include_hidden, file.include_hidden);

        let mut match_patterns = non_empty(args.match_patterns)
            .or(file.match_patterns)
            .unwrap_or_else(|| DEFAULT_MATCH_PATTERNS.iter().map(|s| s.to_string()).collect());

        let mut engine_args = Vec::new();
        if also_check_css {
            engine_args.push("--also-check-css".to_string());
            match_patterns.push("*.css".to_string());
        }
        if also_check_svg {
            engine_args.push("--also-check-svg".to_string());
            match_patterns.push("*.svg".to_string());
        }
        if skip_non_html {
            engine_args.push("--skip-non-html".to_string());
        }
        engine_args.extend(
            non_empty(args.engine_args)
                .or(file.engine_args)
                .unwrap_or_default(),
        );

        let stack_size = args
            .stack_size
            .or_else(|| stack_size_for_level(args.stack_level))
            .or(file.stack_size);

        let validator = ValidatorOptions {
            ignore: non_empty(args.ignore).or(file.ignore).unwrap_or_default(),
            ignore_re: non_empty(args.ignore_re)
                .or(file.ignore_re)
                .unwrap_or_default(),
            errors_only: !show_warnings,
            detect_language: !no_langdetect,
            format: args.format.or(file.format),
            stack_size,
            engine_args,
            runtime: args
                .runtime
                .or(file.runtime)
                .unwrap_or_else(|| ValidatorOptions::default().runtime),
            engine_jar: args
                .vnu_jar
                .or(file.vnu_jar)
                .unwrap_or_else(default_engine_jar),
            timeout: args.timeout.or(file.timeout).map(Duration::from_secs),
            ..ValidatorOptions::default()
        };

        Ok(Config {
            files: args.files,
            root: args.root.or(file.root).unwrap_or_else(|| PathBuf::from(".")),
            match_patterns,
            blacklist: non_empty(args.blacklist)
                .or(file.blacklist)
                .unwrap_or_default(),
            skip_hidden: !include_hidden,
            log_level,
            validator,
            config_file,
        })
    }

    /// Whether a config file contributed to this configuration
    pub fn has_config_file(&self) -> bool {
        self.config_file.is_some()
    }
}

/// A command-line switch and its negation; only the last one given is set.
fn switch(on: bool, off: bool, from_file: bool) -> bool {
    if on {
        true
    } else if off {
        false
    } else {
        from_file
    }
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() { None } else { Some(values) }
}

fn stack_size_for_level(level: u8) -> Option<u32> {
    match level {
        0 => None,
        n => Some(STACK_LEVELS[usize::from(n).min(STACK_LEVELS.len()) - 1]),
    }
}

/// Parse a log level name; `warning` is accepted as an alias of `warn`.
pub fn parse_log_level(name: &str) -> std::result::Result<LevelFilter, String> {
    if name.eq_ignore_ascii_case("warning") {
        return Ok(LevelFilter::Warn);
    }
    name.parse::<LevelFilter>()
        .map_err(|_| format!("unknown log level '{}'", name))
}

/// Locate the config file: an explicit path must exist; otherwise the
/// project file in the working directory, then the user config directory.
pub fn find_config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(ValidatorError::Config {
                path: path.to_path_buf(),
                message: "file not found".to_string(),
            });
        }
        return Ok(Some(path.to_path_buf()));
    }

    let project = PathBuf::from(PROJECT_CONFIG_FILE);
    if project.is_file() {
        return Ok(Some(project));
    }

    Ok(user_config_file().filter(|p| p.is_file()))
}

/// `<config dir>/html5validator/config.toml`
pub fn user_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("html5validator").join("config.toml"))
}

pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let text = fs::read_to_string(path).map_err(|source| ValidatorError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|e| ValidatorError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
