//! Configuration management for adaptlearn using the prefer crate.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::controller::ControllerConfig;

/// Default delay before uploaded files are marked processed.
pub const DEFAULT_UPLOAD_DELAY_MS: u64 = 2000;
/// Default delay before a requested quiz is marked ready.
pub const DEFAULT_QUIZ_DELAY_MS: u64 = 1500;

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Address the page host binds to.
    pub host: String,
    /// Port the page host binds to.
    pub port: u16,
    /// Simulated file processing delay in milliseconds.
    pub upload_delay_ms: u64,
    /// Simulated quiz generation delay in milliseconds.
    pub quiz_delay_ms: u64,
    /// Cancel pending processing when a new one is triggered.
    pub coalesce_tasks: bool,
    /// Maximum live sessions; the oldest are evicted beyond this.
    pub max_sessions: usize,
    /// Long-poll timeout in milliseconds.
    pub poll_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            upload_delay_ms: DEFAULT_UPLOAD_DELAY_MS,
            quiz_delay_ms: DEFAULT_QUIZ_DELAY_MS,
            coalesce_tasks: false,
            max_sessions: 256,
            poll_timeout_ms: 25_000,
        }
    }
}

impl Settings {
    /// Controller timings derived from these settings.
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            upload_delay: Duration::from_millis(self.upload_delay_ms),
            quiz_delay: Duration::from_millis(self.quiz_delay_ms),
            coalesce_tasks: self.coalesce_tasks,
        }
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub upload_delay_ms: Option<u64>,
    #[serde(default)]
    pub quiz_delay_ms: Option<u64>,
    #[serde(default)]
    pub coalesce_tasks: Option<bool>,
    #[serde(default)]
    pub max_sessions: Option<usize>,
    #[serde(default)]
    pub poll_timeout_ms: Option<u64>,
}

impl Config {
    /// Load configuration using prefer crate.
    /// Discovers adaptlearn config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("adaptlearn").await {
            Ok(pref_config) => Config {
                host: pref_config.get("host").ok(),
                port: pref_config.get("port").ok(),
                upload_delay_ms: pref_config.get("upload_delay_ms").ok(),
                quiz_delay_ms: pref_config.get("quiz_delay_ms").ok(),
                coalesce_tasks: pref_config.get("coalesce_tasks").ok(),
                max_sessions: pref_config.get("max_sessions").ok(),
                poll_timeout_ms: pref_config.get("poll_timeout_ms").ok(),
            },
            Err(_) => {
                // No config file found, use defaults
                Self::default()
            }
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref host) = self.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if let Some(delay) = self.upload_delay_ms {
            settings.upload_delay_ms = delay;
        }
        if let Some(delay) = self.quiz_delay_ms {
            settings.quiz_delay_ms = delay;
        }
        if let Some(coalesce) = self.coalesce_tasks {
            settings.coalesce_tasks = coalesce;
        }
        if let Some(max) = self.max_sessions {
            // At least the session being served must fit.
            settings.max_sessions = max.max(1);
        }
        if let Some(timeout) = self.poll_timeout_ms {
            settings.poll_timeout_ms = timeout;
        }
    }
}

/// Load settings from configuration.
pub async fn load_settings() -> Settings {
    let config = Config::load().await;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_simulated_delays() {
        let config = Settings::default().controller_config();
        assert_eq!(config.upload_delay, Duration::from_millis(2000));
        assert_eq!(config.quiz_delay, Duration::from_millis(1500));
        assert!(!config.coalesce_tasks);
    }

    #[test]
    fn test_apply_overrides_only_set_fields() {
        let config = Config {
            port: Some(9000),
            quiz_delay_ms: Some(10),
            max_sessions: Some(0),
            ..Default::default()
        };
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings);

        assert_eq!(settings.port, 9000);
        assert_eq!(settings.quiz_delay_ms, 10);
        assert_eq!(settings.max_sessions, 1);
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.upload_delay_ms, DEFAULT_UPLOAD_DELAY_MS);
    }

    #[test]
    fn test_config_deserializes_partial_values() {
        let config: Config =
            serde_json::from_str(r#"{"coalesce_tasks": true, "host": "0.0.0.0"}"#).unwrap();
        assert_eq!(config.coalesce_tasks, Some(true));
        assert_eq!(config.host.as_deref(), Some("0.0.0.0"));
        assert!(config.port.is_none());
    }
}
