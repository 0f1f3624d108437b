//! Configuration loader for the PitchTalk farmer

use anyhow::{Context, Result};
use core_logic::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Tasks that need manual action outside the game and are never auto-started.
pub const DEFAULT_SKIPPED_TASK_IDS: [&str; 2] = [
    "aec632eb-7104-4652-938b-bc8d61f83c77",
    "c51fbe56-b913-470d-9bac-6cacc9e4864f",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PitchtalkConfig {
    /// REST base, without trailing slash
    pub api_base_url: String,
    /// Web client origin, sent as Origin and Referer
    pub web_origin: String,
    pub user_agent: String,
    pub referral_code: String,
    /// Pause between full passes over the account list
    pub cycle_wait_secs: u64,
    pub request_timeout_secs: u64,
    /// Endpoint answering `{"ip": "..."}`, fetched through each proxy
    pub ip_check_url: String,
    /// Start a new farming right after claiming a finished one
    pub rearm_farming: bool,
    pub tasks_enabled: bool,
    pub skipped_task_ids: Vec<String>,
    pub data_file: String,
    pub proxy_file: String,
    pub use_proxies: bool,
}

impl Default for PitchtalkConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.pitchtalk.app/v1/api".to_string(),
            web_origin: "https://webapp.pitchtalk.app".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36 Edg/129.0.0.0".to_string(),
            referral_code: "4ae55d".to_string(),
            cycle_wait_secs: 21_600,
            request_timeout_secs: 30,
            ip_check_url: "https://api.ipify.org?format=json".to_string(),
            rearm_farming: true,
            tasks_enabled: true,
            skipped_task_ids: DEFAULT_SKIPPED_TASK_IDS
                .iter()
                .map(|id| id.to_string())
                .collect(),
            data_file: "data.txt".to_string(),
            proxy_file: "proxy.txt".to_string(),
            use_proxies: false,
        }
    }
}

impl PitchtalkConfig {
    /// Load configuration from a TOML file
    ///
    /// # Example
    /// ```ignore
    /// let config = PitchtalkConfig::from_path("config/config.toml")?;
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Falls back to defaults when the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_path(path)
        } else {
            warn!("{} not found, using built-in defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "api_base_url".to_string(),
            });
        }
        for (field, value) in [
            ("api_base_url", &self.api_base_url),
            ("web_origin", &self.web_origin),
            ("ip_check_url", &self.ip_check_url),
        ] {
            url::Url::parse(value).map_err(|e| ConfigError::InvalidValue {
                field: field.to_string(),
                reason: e.to_string(),
            })?;
        }
        if self.cycle_wait_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cycle_wait_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
