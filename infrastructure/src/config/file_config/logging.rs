//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for JSONL conversation transcripts (disabled when unset)
    pub transcript_dir: Option<PathBuf>,
    /// Also write diagnostics to a daily log file
    pub file: bool,
    /// Directory for diagnostic log files (defaults to the data dir)
    pub dir: Option<PathBuf>,
}

impl FileLoggingConfig {
    /// Directory for diagnostic log files
    pub fn log_dir(&self) -> Option<PathBuf> {
        self.dir
            .clone()
            .or_else(|| dirs::data_local_dir().map(|d| d.join("screening-client").join("logs")))
    }
}
