//! Library configuration
//!
//! One explicit value names the data directory and the four files inside
//! it. It is threaded into the stores at construction; nothing else in the
//! crate knows a path.
//!
//! ```json
//! { "data_dir": "./data", "books_file": "books.bin" }
//! ```
//!
//! Every file name is optional and defaults to the names below.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Data directory and file names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Directory holding all data files (required)
    pub data_dir: PathBuf,

    #[serde(default = "default_books_file")]
    pub books_file: String,

    #[serde(default = "default_members_file")]
    pub members_file: String,

    #[serde(default = "default_loans_file")]
    pub loans_file: String,

    #[serde(default = "default_report_file")]
    pub report_file: String,
}

fn default_books_file() -> String {
    "books.bin".to_string()
}
fn default_members_file() -> String {
    "members.bin".to_string()
}
fn default_loans_file() -> String {
    "loans.bin".to_string()
}
fn default_report_file() -> String {
    "report.txt".to_string()
}

impl LibraryConfig {
    /// Default file names under `data_dir`
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            books_file: default_books_file(),
            members_file: default_members_file(),
            loans_file: default_loans_file(),
            report_file: default_report_file(),
        }
    }

    /// Load and validate configuration from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: LibraryConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// File names must be plain, non-empty and pairwise distinct.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_dir must not be empty".into()));
        }

        let names = [
            ("books_file", &self.books_file),
            ("members_file", &self.members_file),
            ("loans_file", &self.loans_file),
            ("report_file", &self.report_file),
        ];

        for (key, name) in &names {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", key)));
            }
            if name.contains('/') || name.contains('\\') || *name == ".." || *name == "." {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a file name inside data_dir, got '{}'",
                    key, name
                )));
            }
        }

        for (i, (key_a, a)) in names.iter().enumerate() {
            for (key_b, b) in &names[i + 1..] {
                if a == b {
                    return Err(ConfigError::Invalid(format!(
                        "{} and {} both name '{}'",
                        key_a, key_b, a
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn books_path(&self) -> PathBuf {
        self.data_dir.join(&self.books_file)
    }

    pub fn members_path(&self) -> PathBuf {
        self.data_dir.join(&self.members_file)
    }

    pub fn loans_path(&self) -> PathBuf {
        self.data_dir.join(&self.loans_file)
    }

    pub fn report_path(&self) -> PathBuf {
        self.data_dir.join(&self.report_file)
    }
}
