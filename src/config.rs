//! Configuration management.
//!
//! Configuration comes from environment variables (with an optional `.env`
//! file). Everything has a default so the engine runs without any
//! environment at all; validation catches values that would only fail later
//! inside an export run.

use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::path::PathBuf;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the JSON contact store backing the binary (default:
    /// `contacts.json`)
    pub contacts_db_path: PathBuf,

    /// Directory vCard exports are written into (default: `.`)
    pub export_dir: PathBuf,

    /// Base name for exported vCard files, without extension (default:
    /// `contacts`)
    pub vcard_filename_base: String,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `CONTACTS_DB_PATH`: JSON contact store path (default: `contacts.json`)
    /// - `EXPORT_DIR`: destination directory for exports (default: `.`)
    /// - `VCARD_FILENAME_BASE`: exported file base name (default: `contacts`)
    /// - `LOG_LEVEL`: logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        // Load .env if present; never fail when it is absent.
        let _ = dotenvy::dotenv();

        let contacts_db_path =
            PathBuf::from(Self::var_or("CONTACTS_DB_PATH", "contacts.json"));
        let export_dir = PathBuf::from(Self::var_or("EXPORT_DIR", "."));
        let vcard_filename_base = Self::var_or("VCARD_FILENAME_BASE", "contacts");

        if vcard_filename_base.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "VCARD_FILENAME_BASE".to_string(),
                reason: "Cannot be empty".to_string(),
            });
        }
        // A path separator in the base name would escape the export dir.
        if vcard_filename_base.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue {
                var: "VCARD_FILENAME_BASE".to_string(),
                reason: "Must be a bare file name, not a path".to_string(),
            });
        }

        let log_level = Self::var_or("LOG_LEVEL", "error");

        Ok(Config {
            contacts_db_path,
            export_dir,
            vcard_filename_base,
            log_level,
        })
    }

    fn var_or(name: &str, default: &str) -> String {
        env::var(name).unwrap_or_else(|_| default.to_string())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            contacts_db_path: PathBuf::from("contacts.json"),
            export_dir: PathBuf::from("."),
            vcard_filename_base: "contacts".to_string(),
            log_level: "error".to_string(),
        }
    }
}
