//! Application configuration management.
//!
//! This module handles loading and saving the auth core configuration,
//! which includes the identity service base URL, the active authentication
//! method, and the credential storage location.
//!
//! Configuration is stored at `~/.config/authgate/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/storage directory paths
const APP_NAME: &str = "authgate";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default login path for the JWT method, used when no override is set
const DEFAULT_JWT_LOGIN_PATH: &str = "/auth/jwt/login";

/// Authentication method in use by the host application.
///
/// Only JWT bearer sessions are implemented; the enum exists so the guard's
/// login destination stays keyed by method rather than hardcoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    #[default]
    Jwt,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    pub service_base_url: Option<String>,
    pub method: AuthMethod,
    /// Override for the method's login path; `login_path()` falls back to
    /// the built-in default when unset.
    pub login_path: Option<String>,
    /// Override for the credential storage directory
    pub storage_dir: Option<PathBuf>,
}

impl AuthConfig {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Login destination for the active authentication method.
    pub fn login_path(&self) -> &str {
        match (&self.login_path, self.method) {
            (Some(path), _) => path,
            (None, AuthMethod::Jwt) => DEFAULT_JWT_LOGIN_PATH,
        }
    }

    /// Directory holding the persisted credential slot.
    pub fn storage_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.storage_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find local data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_login_path_is_jwt() {
        let config = AuthConfig::default();
        assert_eq!(config.method, AuthMethod::Jwt);
        assert_eq!(config.login_path(), "/auth/jwt/login");
    }

    #[test]
    fn test_login_path_override_wins() {
        let config = AuthConfig {
            login_path: Some("/signin".to_string()),
            ..Default::default()
        };
        assert_eq!(config.login_path(), "/signin");
    }

    #[test]
    fn test_config_roundtrip() {
        let config = AuthConfig {
            service_base_url: Some("https://id.example.com".to_string()),
            method: AuthMethod::Jwt,
            login_path: None,
            storage_dir: Some(PathBuf::from("/tmp/authgate-test")),
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AuthConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(
            parsed.service_base_url.as_deref(),
            Some("https://id.example.com")
        );
        assert_eq!(parsed.storage_dir, Some(PathBuf::from("/tmp/authgate-test")));
    }
}
