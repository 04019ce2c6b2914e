//! Error types for SapScout.
//!
//! Library crates use [`SapScoutError`] via `thiserror`.
//! The CLI app wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all SapScout operations.
#[derive(Debug, thiserror::Error)]
pub enum SapScoutError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while fetching a table page.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Text-generation API error (transport, auth, quota, or response shape).
    #[error("generation error: {0}")]
    Generation(String),

    /// The batch input source could not be opened or parsed.
    #[error("batch source error: {message}")]
    BatchSource { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SapScoutError>;

impl SapScoutError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a batch source error from any displayable message.
    pub fn batch_source(msg: impl Into<String>) -> Self {
        Self::BatchSource {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = SapScoutError::config("missing API key");
        assert_eq!(err.to_string(), "config error: missing API key");

        let err = SapScoutError::Fetch("https://example.com: HTTP 404 Not Found".into());
        assert!(err.to_string().contains("HTTP 404"));

        let err = SapScoutError::batch_source("missing required column 'table_name'");
        assert!(err.to_string().contains("table_name"));
    }
}
