//! Configuration
//!
//! Defaults, then an optional YAML file named by `USER_FORM_CONFIG`, then
//! individual environment overrides. A `.env` file is honoured.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILE_VAR: &str = "USER_FORM_CONFIG";
pub const API_URL_VAR: &str = "USER_FORM_API_URL";
pub const TOKEN_VAR: &str = "USER_FORM_TOKEN";
pub const TOAST_SECS_VAR: &str = "USER_FORM_TOAST_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Root that endpoint paths are joined onto.
    pub api_base_url: String,
    /// Sent as a bearer token when set.
    pub auth_token: Option<String>,
    pub notification_ttl_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            auth_token: None,
            notification_ttl_secs: 5,
            request_timeout_secs: 30,
        }
    }
}

impl FormConfig {
    /// Resolve configuration from the process environment.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = match std::env::var(CONFIG_FILE_VAR) {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&raw).with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Layer overrides from `lookup` (normally the environment).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup(API_URL_VAR).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(token) = lookup(TOKEN_VAR) {
            self.auth_token = Some(token).filter(|t| !t.trim().is_empty());
        }
        if let Some(secs) = lookup(TOAST_SECS_VAR) {
            self.notification_ttl_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds, got {:?}", TOAST_SECS_VAR, secs))?;
        }
        Ok(())
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = FormConfig::default();
        assert_eq!(config.notification_ttl(), Duration::from_secs(5));
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn test_yaml_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("form.yaml");
        fs::write(&path, "api_base_url: https://console.example.com/api\nauth_token: abc\n").unwrap();

        let config = FormConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.api_base_url, "https://console.example.com/api");
        assert_eq!(config.auth_token.as_deref(), Some("abc"));
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(FormConfig::from_yaml_file(dir.path().join("ghost.yaml")).is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (API_URL_VAR, "http://10.0.0.2/api"),
            (TOKEN_VAR, ""),
            (TOAST_SECS_VAR, "8"),
        ]);
        let mut config = FormConfig { auth_token: Some("old".into()), ..Default::default() };
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.api_base_url, "http://10.0.0.2/api");
        assert_eq!(config.auth_token, None);
        assert_eq!(config.notification_ttl_secs, 8);
    }

    #[test]
    fn test_bad_ttl_override_rejected() {
        let mut config = FormConfig::default();
        let result = config.apply_overrides(|k| (k == TOAST_SECS_VAR).then(|| "soon".to_string()));
        assert!(result.is_err());
    }
}
