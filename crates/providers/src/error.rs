//! Construction-time failures.

use mdfx_config::ErrorSink;
use thiserror::Error;

/// Why a provider could not be built from configuration.
///
/// Every error is written to the [`ErrorSink`] once, where it is detected;
/// callers further up only propagate it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// A required field is absent and no default was supplied.
    #[error("Missing required key: {key}")]
    MissingRequiredKey {
        /// Name of the missing field.
        key: String,
        /// Section that should have contained it.
        path: String,
    },
    /// Unknown tag, wrong arity, ambiguous selection or wrong value type.
    #[error("{message}")]
    InvalidConfiguration {
        /// Human-readable description.
        message: String,
        /// Field that failed.
        path: String,
    },
}

impl ProviderError {
    /// Path of the field that failed.
    pub fn path(&self) -> &str {
        match self {
            Self::MissingRequiredKey { path, .. } | Self::InvalidConfiguration { path, .. } => path,
        }
    }

    pub(crate) fn missing(key: &str, path: &str) -> Self {
        Self::MissingRequiredKey {
            key: key.to_string(),
            path: path.to_string(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>, path: &str) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
            path: path.to_string(),
        }
    }

    /// Write the error to `sink` and hand it back for propagation.
    pub(crate) fn report(self, sink: &mut dyn ErrorSink) -> Self {
        sink.log_error(&self.to_string(), self.path());
        self
    }
}

/// Result alias for provider construction.
pub type ProviderResult<T> = Result<T, ProviderError>;
