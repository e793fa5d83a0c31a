//! Purpose history, persisted as one JSON object per line.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One entry of the purpose log: what the user was doing, and since when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purpose {
    pub text: String,
    pub timestamp: f64,
}

impl Purpose {
    pub fn new(text: impl Into<String>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        Purpose {
            text: text.into(),
            timestamp,
        }
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_user(path: &Path) -> PathBuf {
    let Some(base) = BaseDirs::new() else {
        return path.to_path_buf();
    };
    match path.strip_prefix("~") {
        Ok(rest) => base.home_dir().join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Make sure the history file and its parent directory exist.
pub fn ensure_file(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            action: "create directory",
            path: parent.to_path_buf(),
            source,
        })?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| ConfigError::Io {
            action: "open",
            path: path.to_path_buf(),
            source,
        })?;
    Ok(())
}

/// Append one purpose as a JSON line.
pub fn append(path: &Path, purpose: &Purpose) -> Result<(), ConfigError> {
    let io = |source| ConfigError::Io {
        action: "append to",
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io)?;
    let line = serde_json::to_string(purpose).map_err(|source| ConfigError::Io {
        action: "encode entry for",
        path: path.to_path_buf(),
        source: source.into(),
    })?;
    writeln!(file, "{line}").map_err(io)
}

/// Read all recorded purposes, skipping blank lines.
pub fn read_all(path: &Path) -> Result<Vec<Purpose>, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        action: "read",
        path: path.to_path_buf(),
        source,
    })?;
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str(line).map_err(|source| ConfigError::Io {
                action: "decode entry from",
                path: path.to_path_buf(),
                source: source.into(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        let first = Purpose {
            text: "write tests".into(),
            timestamp: 1000.0,
        };
        let second = Purpose {
            text: "".into(),
            timestamp: 1060.5,
        };
        append(&path, &first).unwrap();
        append(&path, &second).unwrap();
        assert_eq!(read_all(&path).unwrap(), vec![first, second]);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        fs::write(&path, "\n{\"text\": \"a\", \"timestamp\": 1.0}\n\n").unwrap();
        let entries = read_all(&path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "a");
    }

    #[test]
    fn ensure_file_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep/nested/history.jsonl");
        ensure_file(&path).unwrap();
        assert!(path.exists());
        assert!(read_all(&path).unwrap().is_empty());
    }

    #[test]
    fn expand_user_leaves_absolute_paths_alone() {
        let path = PathBuf::from("/tmp/history");
        assert_eq!(expand_user(&path), path);
    }

    #[test]
    fn expand_user_replaces_tilde() {
        let expanded = expand_user(Path::new("~/.pucoti_history"));
        assert!(!expanded.starts_with("~"));
        assert!(expanded.ends_with(".pucoti_history"));
    }
}
