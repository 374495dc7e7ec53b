//! Error types for the CLI

use std::path::PathBuf;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading input or writing output failed
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file could not be read as JSON
    #[error("Config error in '{}': {source}", path.display())]
    Config {
        /// Settings file path
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// Diagnostics could not be written as JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A `--define` argument with an empty name
    #[error("Invalid define '{0}'")]
    InvalidDefine(String),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = CliError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        assert_eq!(err.to_string(), "File error: missing");
    }

    #[test]
    fn test_config_error_names_file() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CliError::Config {
            path: PathBuf::from("settings.json"),
            source,
        };
        assert!(err.to_string().starts_with("Config error in 'settings.json': "));
    }
}
