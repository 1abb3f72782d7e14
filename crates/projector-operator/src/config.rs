use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

// Default derived via field defaults

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        // Controller validations
        if self.controller.requeue_after_secs == 0 {
            return Err("controller.requeue_after_secs must be > 0".into());
        }
        if self.controller.error_backoff_secs == 0 {
            return Err("controller.error_backoff_secs must be > 0".into());
        }
        if self
            .controller
            .namespace
            .as_deref()
            .is_some_and(|ns| ns.trim().is_empty())
        {
            return Err("controller.namespace must not be blank when set".into());
        }
        // Store validation
        if self.store.request_timeout_ms == 0 {
            return Err("store.request_timeout_ms must be > 0".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Namespace to watch; all namespaces when unset.
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default = "default_requeue_after_secs")]
    pub requeue_after_secs: u64,
    #[serde(default = "default_error_backoff_secs")]
    pub error_backoff_secs: u64,
}
fn default_requeue_after_secs() -> u64 {
    300
}
fn default_error_backoff_secs() -> u64 {
    15
}
impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            requeue_after_secs: default_requeue_after_secs(),
            error_backoff_secs: default_error_backoff_secs(),
        }
    }
}
impl ControllerConfig {
    pub fn requeue_after(&self) -> Duration {
        Duration::from_secs(self.requeue_after_secs)
    }
    pub fn error_backoff(&self) -> Duration {
        Duration::from_secs(self.error_backoff_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Upper bound for each store call.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}
fn default_request_timeout_ms() -> u64 {
    10_000
}
impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}
impl StoreConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    /// Default config file looked up in the working directory.
    pub const DEFAULT_CONFIG_PATH: &str = "projector.toml";

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        match path {
            Some(p) => {
                let pathbuf = PathBuf::from(p);
                if pathbuf.exists() {
                    builder = builder.add_source(File::from(pathbuf));
                }
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        // Environment variable overrides, e.g., PROJECTOR__CONTROLLER__REQUEUE_AFTER_SECS=60
        builder = builder.add_source(
            Environment::with_prefix("PROJECTOR")
                .prefix_separator("__")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.controller.namespace, None);
        assert_eq!(cfg.controller.requeue_after(), Duration::from_secs(300));
        assert_eq!(cfg.controller.error_backoff(), Duration::from_secs(15));
        assert_eq!(cfg.store.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_validation_errors() {
        let mut cfg = AppConfig::default();
        cfg.logging.level = "verbose".into();
        assert!(cfg.validate().unwrap_err().contains("logging.level"));

        let mut cfg = AppConfig::default();
        cfg.controller.requeue_after_secs = 0;
        assert!(cfg.validate().unwrap_err().contains("requeue_after_secs"));

        let mut cfg = AppConfig::default();
        cfg.controller.error_backoff_secs = 0;
        assert!(cfg.validate().unwrap_err().contains("error_backoff_secs"));

        let mut cfg = AppConfig::default();
        cfg.controller.namespace = Some("  ".into());
        assert!(cfg.validate().unwrap_err().contains("controller.namespace"));

        let mut cfg = AppConfig::default();
        cfg.store.request_timeout_ms = 0;
        assert!(cfg.validate().unwrap_err().contains("request_timeout_ms"));
    }

    #[test]
    fn test_level_is_case_insensitive() {
        let mut cfg = AppConfig::default();
        cfg.logging.level = "DEBUG".into();
        assert!(cfg.validate().is_ok());
    }
}
