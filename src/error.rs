//! Error types shared by every stage of the diagnostic pipeline.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error(
        "Missing Java Runtime Environment on this system. \
         The command \"{runtime}\" must be available."
    )]
    RuntimeNotFound { runtime: String },

    #[error("Failed to run {program}")]
    ProcessLaunch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Validator did not finish within {after:?}")]
    Timeout { after: Duration },

    #[error("Malformed JSON diagnostics: {0}")]
    DataFormat(#[from] serde_json::Error),

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Invalid match pattern: {pattern}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid ignore pattern: {pattern}")]
    InvalidIgnorePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config file {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl ValidatorError {
    pub(crate) fn launch(program: impl Into<String>, source: io::Error) -> Self {
        Self::ProcessLaunch {
            program: program.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ValidatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_not_found_names_the_command() {
        let err = ValidatorError::RuntimeNotFound {
            runtime: "java".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing Java Runtime Environment on this system. The command \"java\" must be available."
        );
    }

    #[test]
    fn process_launch_keeps_source() {
        use std::error::Error as _;

        let err = ValidatorError::launch("cygpath", io::Error::other("boom"));
        assert_eq!(err.to_string(), "Failed to run cygpath");
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("boom"));
    }

    #[test]
    fn data_format_wraps_serde_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ValidatorError = json_err.into();
        assert!(matches!(err, ValidatorError::DataFormat(_)));
        assert!(err.to_string().starts_with("Malformed JSON diagnostics"));
    }
}
