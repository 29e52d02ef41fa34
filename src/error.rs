// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Malformed source text. The only failure the analysis pipeline can produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not analyze this code: {message} ({line}:{column})")]
pub struct ParseError {
    /// Underlying syntax-error message.
    pub message: String,
    /// 1-based line of the first offending token.
    pub line: usize,
    /// 0-based column of the first offending token.
    pub column: usize,
}

impl ParseError {
    #[must_use]
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

#[derive(Debug, Error)]
pub enum CodesenseError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid setting `{key}`: {message}")]
    Setting { key: &'static str, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CodesenseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display_names_position() {
        let err = ParseError::new("Unexpected token '}'", 3, 7);
        assert_eq!(
            err.to_string(),
            "could not analyze this code: Unexpected token '}' (3:7)"
        );
    }

    #[test]
    fn parse_error_converts_transparently() {
        let err: CodesenseError = ParseError::new("boom", 1, 0).into();
        assert!(matches!(err, CodesenseError::Parse(_)));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn parse_error_is_a_std_error() {
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(ParseError::new("x", 2, 4));
        assert_eq!(boxed.to_string(), "could not analyze this code: x (2:4)");
        assert!(boxed.source().is_none());
    }

    #[test]
    fn setting_error_names_the_key() {
        let err = CodesenseError::Setting {
            key: "min_confidence",
            message: "out of range".into(),
        };
        assert_eq!(err.to_string(), "Invalid setting `min_confidence`: out of range");
    }
}
