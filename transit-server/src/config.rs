//! Environment configuration.
//!
//! The core honors a single variable: `GTFS_PATH`, the folder holding the
//! feed tables. Everything else is fixed at startup.

use std::env;
use std::path::PathBuf;

/// The environment variable naming the GTFS folder.
pub const GTFS_PATH_VAR: &str = "GTFS_PATH";

/// Default feed folder, relative to the working directory.
pub const DEFAULT_GTFS_PATH: &str = "GTFS";

/// Server configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Folder containing the GTFS tables.
    pub gtfs_path: PathBuf,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_value(env::var(GTFS_PATH_VAR).ok())
    }

    fn from_value(gtfs_path: Option<String>) -> Self {
        Self {
            gtfs_path: gtfs_path
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_GTFS_PATH)),
        }
    }
}
