#![warn(missing_docs)]
//! Nested key/value configuration sections and the diagnostics sink used while
//! reading them.
//!
//! Sections are backed by TOML tables with key order preserved, so a document
//! that is parsed and written back keeps the layout its author chose.

mod section;
mod sink;

pub use section::{join_path, ConfigSection, Entry};
pub use sink::{ConfigIssue, ErrorLog, ErrorSink};

use thiserror::Error;

/// Errors raised while reading or writing configuration documents.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Wrap IO errors when reading or writing files.
    #[error("failed to access config file: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap TOML parse failures.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// Wrap TOML serialization failures.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
