use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Field '{field}' of '{record}' has no default value")]
    MissingDefault { record: String, field: String },

    #[error("Config fields '{first}' and '{second}' both normalise to flag '{flag}'")]
    AmbiguousFlag {
        flag: String,
        first: String,
        second: String,
    },

    #[error("Unknown field '{path}'. Valid fields are: {}", .valid.join(", "))]
    UnknownField { path: String, valid: Vec<String> },

    #[error("Expected {expected} at '{path}', got {actual}")]
    Shape {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("Cannot convert {value} to {target} at '{path}'")]
    Conversion {
        path: String,
        value: String,
        target: String,
    },

    #[error("Unknown override path '{path}'")]
    UnknownOverridePath { path: String },

    #[error("Invalid duration '{input}': {reason}")]
    InvalidDuration { input: String, reason: String },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
}
