use std::collections::HashSet;
use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{LoyaltyError, Result};

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Valid department names, in display order
    pub department: Vec<String>,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub default_format: String,
    pub output_directory: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:data/loyalty.db".to_string(),
            max_connections: 4,
            connection_timeout_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
            format: "text".to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_format: "json".to_string(),
            output_directory: "./output".to_string(),
        }
    }
}

impl AppConfig {
    /// Build a configuration with default settings and the given departments
    pub fn with_departments<I, S>(departments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            department: departments.into_iter().map(Into::into).collect(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            export: ExportConfig::default(),
        }
    }

    /// Load configuration from the YAML file at `path`, then the environment.
    ///
    /// The file is required: without a department list the application
    /// cannot decide which submissions carry a valid department.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let defaults = Self::with_departments(Vec::<String>::new());

        let config = Config::builder()
            .set_default("database.url", defaults.database.url)?
            .set_default("database.max_connections", i64::from(defaults.database.max_connections))?
            .set_default(
                "database.connection_timeout_secs",
                i64::try_from(defaults.database.connection_timeout_secs).unwrap_or(i64::MAX),
            )?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            .set_default("export.default_format", defaults.export.default_format)?
            .set_default("export.output_directory", defaults.export.output_directory)?
            .add_source(File::new(&path.to_string_lossy(), FileFormat::Yaml).required(true))
            // LOYALTY__DATABASE__URL, LOYALTY__LOGGING__LEVEL, ...
            .add_source(Environment::with_prefix("LOYALTY").separator("__"))
            .build()?;

        let app_config: Self = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.department.is_empty() {
            warn!("No departments configured; every new achievement must inherit one");
        }

        let mut seen = HashSet::new();
        for name in &self.department {
            if name.trim().is_empty() {
                return Err(LoyaltyError::InvalidConfig(
                    "department names cannot be blank".to_string(),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(LoyaltyError::InvalidConfig(format!(
                    "department {name:?} is listed more than once"
                )));
            }
        }

        if self.database.max_connections == 0 {
            return Err(LoyaltyError::InvalidConfig(
                "max_connections must be greater than 0".to_string(),
            ));
        }
        if self.database.connection_timeout_secs == 0 {
            return Err(LoyaltyError::InvalidConfig(
                "connection_timeout_secs must be greater than 0".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(LoyaltyError::InvalidConfig(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level, valid_levels
            )));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(LoyaltyError::InvalidConfig(format!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format, valid_formats
            )));
        }

        let valid_formats = ["json", "csv"];
        if !valid_formats.contains(&self.export.default_format.as_str()) {
            return Err(LoyaltyError::InvalidConfig(format!(
                "Invalid export format: {}. Must be one of: {:?}",
                self.export.default_format, valid_formats
            )));
        }

        Ok(())
    }

    /// True when `name` is one of the configured departments (exact match)
    #[must_use]
    pub fn is_known_department(&self, name: &str) -> bool {
        self.department.iter().any(|d| d == name)
    }

    /// Get database URL from environment or config
    #[must_use]
    pub fn get_database_url(&self) -> String {
        std::env::var("DATABASE_URL").unwrap_or_else(|_| self.database.url.clone())
    }

    /// Get log level from environment or config
    #[must_use]
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }

    /// Render the effective configuration as YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| LoyaltyError::InvalidConfig(e.to_string()))
    }
}
