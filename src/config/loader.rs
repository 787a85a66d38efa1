//! Configuration Loader
//!
//! Reads an optional TOML file on top of the built-in defaults. The file path
//! comes from the caller (the `--config` flag) or from
//! `LBAAS_BATCHOPS_CONFIG_PATH`; with neither, defaults are used as-is.

use super::BatchConfig;
use crate::error::{BatchError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "LBAAS_BATCHOPS_CONFIG_PATH";

const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024; // 1MB limit

#[derive(Debug)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from `path`, the environment-named file, or defaults
    pub fn load(path: Option<&Path>) -> Result<BatchConfig> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from));

        let config = match path {
            Some(path) => Self::load_file(&path)?,
            None => {
                debug!("No configuration file given, using defaults");
                BatchConfig::default()
            }
        };

        Ok(config)
    }

    /// Load and parse one TOML file
    pub fn load_file(path: &Path) -> Result<BatchConfig> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            BatchError::configuration(format!("cannot read '{}': {e}", path.display()))
        })?;

        if !metadata.is_file() {
            return Err(BatchError::configuration(format!(
                "'{}' is not a regular file",
                path.display()
            )));
        }
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(BatchError::configuration(format!(
                "'{}' is larger than {MAX_CONFIG_FILE_SIZE} bytes",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            BatchError::configuration(format!("cannot read '{}': {e}", path.display()))
        })?;
        let config = Self::from_toml_str(&content).map_err(|e| match e {
            BatchError::Configuration(msg) => {
                BatchError::configuration(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;

        info!(path = %path.display(), "Configuration file loaded");
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<BatchConfig> {
        toml::from_str(content)
            .map_err(|e| BatchError::configuration(format!("invalid TOML: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ConfigLoader::from_toml_str(
            r#"
            check_lb = "lb-web"

            [readiness]
            max_check_times = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.check_lb, "lb-web");
        assert_eq!(config.readiness.max_check_times, 10);
        assert_eq!(config.readiness.poll_interval_ms, 1000);
        assert_eq!(config.control_plane.binary, "neutron");
        assert_eq!(config.output_path, "/dev/stdout");
    }

    #[test]
    fn test_database_section_with_quoted_port() {
        let config = ConfigLoader::from_toml_str(
            r#"
            [database]
            username = "neutron"
            password = "pw"
            dbname = "neutron"
            hostname = "10.0.0.5"
            port = "3306"
            "#,
        )
        .unwrap();
        assert_eq!(config.database.port, Some(3306));
        assert!(config.database.is_complete());
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let err = ConfigLoader::from_toml_str("readiness = [").unwrap_err();
        assert!(matches!(err, BatchError::Configuration(_)));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        // probe budgets are fixed protocol values, not settings
        let err = ConfigLoader::from_toml_str(
            r#"
            [readiness]
            max_probe_errors = 5
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, BatchError::Configuration(_)));
        assert!(err.to_string().contains("max_probe_errors"));

        let err = ConfigLoader::from_toml_str("chek_lb = \"lb-web\"").unwrap_err();
        assert!(err.to_string().contains("chek_lb"));
    }

    #[test]
    fn test_load_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "pacing_ms = 0").unwrap();

        let config = ConfigLoader::load(Some(file.path())).unwrap();
        assert_eq!(config.pacing_ms, 0);
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = ConfigLoader::load(Some(Path::new("/nonexistent/lbaas-batchops.toml")))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/lbaas-batchops.toml"));
    }
}
