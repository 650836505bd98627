//! Diagnostics sink for configuration problems.

use tracing::warn;

/// Receives user-facing configuration problems together with the path of the
/// offending field.
pub trait ErrorSink {
    /// Record one problem.
    fn log_error(&mut self, message: &str, path: &str);
}

/// A single recorded configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Human-readable description.
    pub message: String,
    /// Traversal from the document root to the field.
    pub path: String,
}

/// Collects every issue raised while loading a document, in order.
#[derive(Debug, Default)]
pub struct ErrorLog {
    issues: Vec<ConfigIssue>,
}

impl ErrorLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues recorded so far.
    pub fn issues(&self) -> &[ConfigIssue] {
        &self.issues
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of recorded issues.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Drop all recorded issues.
    pub fn clear(&mut self) {
        self.issues.clear();
    }
}

impl ErrorSink for ErrorLog {
    fn log_error(&mut self, message: &str, path: &str) {
        warn!(path, "{message}");
        self.issues.push(ConfigIssue {
            message: message.to_string(),
            path: path.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_keeps_issues_in_order() {
        let mut log = ErrorLog::new();
        assert!(log.is_empty());
        log.log_error("first", "a/b");
        log.log_error("second", "a/c");
        assert_eq!(log.len(), 2);
        assert_eq!(log.issues()[0].path, "a/b");
        assert_eq!(log.issues()[1].message, "second");
        log.clear();
        assert!(log.is_empty());
    }
}
