//! Diagnostic Processing
//!
//! Turns raw checker output into an error count or structured messages.

pub mod filter;
pub mod messages;

pub use filter::{NoiseFilter, effective_ignore, normalize_quotes};
pub use messages::{DiagnosticMessage, parse_messages};
