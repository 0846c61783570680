//! TOML configuration for the tabwarden daemon.

use crate::error::TabwardenError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level tabwarden configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub warden: WardenConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
}

/// General daemon settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardenConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for WardenConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Persistent store config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Scheduler configuration -- the reminder reconciliation tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Reconciliation cadence in seconds. Reminder latency is bounded by one
    /// tick period, so anything above 5s is rejected at load.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_interval_secs: default_tick_interval(),
        }
    }
}

/// Notification delivery config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Delivery backend. `stdio` writes JSON lines for the browser bridge.
    #[serde(default = "default_notifier_kind")]
    pub kind: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            kind: default_notifier_kind(),
        }
    }
}

fn default_notifier_kind() -> String {
    "stdio".to_string()
}

fn default_data_dir() -> String {
    "~/.tabwarden".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_db_path() -> String {
    "~/.tabwarden/data/warden.db".to_string()
}

fn default_tick_interval() -> u64 {
    1
}

fn default_true() -> bool {
    true
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, TabwardenError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| TabwardenError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| TabwardenError::Config(format!("failed to parse config: {}", e)))?;

    validate(&config)?;
    Ok(config)
}

/// Reject configurations the scheduler cannot honor.
fn validate(config: &Config) -> Result<(), TabwardenError> {
    let tick = config.scheduler.tick_interval_secs;
    if tick == 0 || tick > 5 {
        return Err(TabwardenError::Config(format!(
            "scheduler.tick_interval_secs must be between 1 and 5, got {tick}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_missing() {
        let config = load("/nonexistent/tabwarden.toml").unwrap();
        assert_eq!(config.scheduler.tick_interval_secs, 1);
        assert!(config.scheduler.enabled);
        assert_eq!(config.store.db_path, "~/.tabwarden/data/warden.db");
        assert_eq!(config.notifier.kind, "stdio");
    }

    #[test]
    fn test_scheduler_config_from_toml() {
        let toml_str = r#"
            [scheduler]
            tick_interval_secs = 5
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.scheduler.tick_interval_secs, 5);
        assert!(config.scheduler.enabled);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_tick_interval_bounds() {
        for bad in [0u64, 6, 60] {
            let config = Config {
                scheduler: SchedulerConfig {
                    enabled: true,
                    tick_interval_secs: bad,
                },
                ..Default::default()
            };
            assert!(validate(&config).is_err(), "tick {bad} should be rejected");
        }
    }

    #[test]
    fn test_shellexpand_home() {
        std::env::set_var("HOME", "/home/tester");
        assert_eq!(
            shellexpand("~/.tabwarden/data/warden.db"),
            "/home/tester/.tabwarden/data/warden.db"
        );
        assert_eq!(shellexpand("/absolute/path"), "/absolute/path");
    }
}
