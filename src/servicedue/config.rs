use crate::error::{Result, ServiceDueError};
use crate::snapshot::DEFAULT_UPCOMING_LIMIT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Settings stored in `config.json` in the data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// How many upcoming reminders the widget snapshot carries
    #[serde(default = "default_upcoming_limit")]
    pub upcoming_limit: usize,

    /// Local hour (0-23) at which date alerts fire
    #[serde(default = "default_alert_hour")]
    pub alert_hour: u32,

    /// Whether the user allowed alerts
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,

    #[serde(default = "default_distance_unit")]
    pub distance_unit: String,

    #[serde(default = "default_volume_unit")]
    pub volume_unit: String,

    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_upcoming_limit() -> usize {
    DEFAULT_UPCOMING_LIMIT
}

fn default_alert_hour() -> u32 {
    9
}

fn default_true() -> bool {
    true
}

fn default_distance_unit() -> String {
    "km".to_string()
}

fn default_volume_unit() -> String {
    "L".to_string()
}

fn default_currency() -> String {
    "$".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            upcoming_limit: default_upcoming_limit(),
            alert_hour: default_alert_hour(),
            notifications_enabled: true,
            distance_unit: default_distance_unit(),
            volume_unit: default_volume_unit(),
            currency: default_currency(),
        }
    }
}

impl AppConfig {
    pub const KEYS: [&'static str; 6] = [
        "upcoming-limit",
        "alert-hour",
        "notifications",
        "distance-unit",
        "volume-unit",
        "currency",
    ];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "upcoming-limit" => self.upcoming_limit.to_string(),
            "alert-hour" => self.alert_hour.to_string(),
            "notifications" => if self.notifications_enabled { "on" } else { "off" }.to_string(),
            "distance-unit" => self.distance_unit.clone(),
            "volume-unit" => self.volume_unit.clone(),
            "currency" => self.currency.clone(),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "upcoming-limit" => {
                let limit: usize = parse_number(key, value)?;
                if limit == 0 {
                    return Err(ServiceDueError::Validation(
                        "upcoming-limit must be at least 1".to_string(),
                    ));
                }
                self.upcoming_limit = limit;
            }
            "alert-hour" => {
                let hour: u32 = parse_number(key, value)?;
                if hour > 23 {
                    return Err(ServiceDueError::Validation(
                        "alert-hour must be between 0 and 23".to_string(),
                    ));
                }
                self.alert_hour = hour;
            }
            "notifications" => {
                self.notifications_enabled = match value.to_lowercase().as_str() {
                    "on" | "true" | "yes" => true,
                    "off" | "false" | "no" => false,
                    _ => {
                        return Err(ServiceDueError::Validation(format!(
                            "notifications must be on or off, got {}",
                            value
                        )))
                    }
                };
            }
            "distance-unit" => self.distance_unit = value.to_string(),
            "volume-unit" => self.volume_unit = value.to_string(),
            "currency" => self.currency = value.to_string(),
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| ServiceDueError::Validation(format!("{} expects a number, got {}", key, value)))
}

fn unknown_key(key: &str) -> ServiceDueError {
    ServiceDueError::Validation(format!(
        "Unknown config key: {} (expected one of {})",
        key,
        AppConfig::KEYS.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.upcoming_limit, 5);
        assert_eq!(config.alert_hour, 9);
        assert!(config.notifications_enabled);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path().join("nowhere")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.set("alert-hour", "7").unwrap();
        config.set("notifications", "off").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = AppConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.alert_hour, 7);
        assert!(!loaded.notifications_enabled);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"currency":"€"}"#).unwrap();
        let loaded = AppConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.currency, "€");
        assert_eq!(loaded.upcoming_limit, 5);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = AppConfig::default();
        assert!(config.set("alert-hour", "25").is_err());
        assert!(config.set("upcoming-limit", "zero").is_err());
        assert!(config.set("colour", "red").is_err());
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_get_every_key() {
        let config = AppConfig::default();
        for key in AppConfig::KEYS {
            assert!(config.get(key).is_ok());
        }
        assert_eq!(config.get("notifications").unwrap(), "on");
    }
}
