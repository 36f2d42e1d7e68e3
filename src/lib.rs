//! HTML5 Validator
//!
//! Validates collections of HTML, CSS and SVG files with the Nu Html Checker
//! (`vnu.jar`).
//!
//! This library provides:
//! - File discovery with glob matching and directory pruning
//! - Checker invocation and diagnostic stream normalization
//! - Noise filtering and error counting
//! - Structured messages from the checker's JSON output
//! - Command-line and config file handling for the binary

pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod options;
pub mod validation;
pub mod validator;

// Re-exports for clean public API
pub use discovery::FileCollector;
pub use engine::EngineInvoker;
pub use error::{Result, ValidatorError};
pub use options::{OutputFormat, ValidatorConfig, ValidatorOptions};
pub use validation::{DiagnosticMessage, NoiseFilter};
pub use validator::Validator;
