//! Configuration file loading for screening-client
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SCREENING_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./screening.toml` or `./.screening.toml`
//! 4. Global: `~/.config/screening-client/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileConnectionConfig, FileEndpointsConfig,
    FileLoggingConfig, FileOutputConfig,
};
pub use loader::ConfigLoader;
