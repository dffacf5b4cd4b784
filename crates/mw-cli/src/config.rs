//! Configuration loading for the Model Warden CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Operator or team name recorded in evidence manifests.
    #[serde(default = "default_team_or_user")]
    pub team_or_user: String,

    /// Directory export runs write their artifacts into.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// File name of the final audit package.
    #[serde(default = "default_archive_name")]
    pub archive_name: String,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

fn default_team_or_user() -> String {
    "AI Governance Team".to_string()
}

fn default_output_dir() -> String {
    "output_artifacts".to_string()
}

fn default_archive_name() -> String {
    "audit_package.zip".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            team_or_user: default_team_or_user(),
            output_dir: default_output_dir(),
            archive_name: default_archive_name(),
            logging: LoggingSettings::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }
}

/// Logging section of the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON-formatted logs.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.team_or_user, "AI Governance Team");
        assert_eq!(config.output_dir, "output_artifacts");
        assert_eq!(config.archive_name, "audit_package.zip");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_partial_config_fills_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "team_or_user: Sarah (AI Program Lead)").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.team_or_user, "Sarah (AI Program Lead)");
        assert_eq!(config.output_dir, "output_artifacts");
    }

    #[test]
    fn test_load_missing_file_errors() {
        let result = AppConfig::load(Path::new("/nonexistent/config.yaml"));
        assert!(result.is_err());
    }
}
