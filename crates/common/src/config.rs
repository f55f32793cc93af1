//! Provider configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

/// Connection settings for a BIG-IP device
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Management address, host name or URL
    pub address: String,

    /// Management port
    pub port: u16,

    /// Login user
    pub username: String,

    /// Login password
    pub password: String,

    /// Use token authentication instead of basic auth on every request
    pub token_auth: bool,

    /// Login provider for token authentication
    pub login_ref: String,

    /// Accept self-signed device certificates
    pub validate_certs_disable: bool,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            port: 443,
            username: String::new(),
            password: String::new(),
            token_auth: true,
            login_ref: "tmos".to_string(),
            validate_certs_disable: true,
            timeout_secs: 30,
        }
    }
}

impl ProviderConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Layer `BIGIP_*` environment variables over the current values
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Layer overrides from an arbitrary lookup, keyed like the environment
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("BIGIP_HOST") {
            self.address = v;
        }
        if let Some(v) = lookup("BIGIP_PORT") {
            self.port = v
                .parse()
                .map_err(|_| Error::InvalidConfig(format!("BIGIP_PORT is not a port: {}", v)))?;
        }
        if let Some(v) = lookup("BIGIP_USER") {
            self.username = v;
        }
        if let Some(v) = lookup("BIGIP_PASSWORD") {
            self.password = v;
        }
        if let Some(v) = lookup("BIGIP_TOKEN_AUTH") {
            self.token_auth = parse_bool("BIGIP_TOKEN_AUTH", &v)?;
        }
        if let Some(v) = lookup("BIGIP_LOGIN_REF") {
            self.login_ref = v;
        }
        if let Some(v) = lookup("BIGIP_VERIFY_CERT_DISABLE") {
            self.validate_certs_disable = parse_bool("BIGIP_VERIFY_CERT_DISABLE", &v)?;
        }
        if let Some(v) = lookup("BIGIP_TIMEOUT") {
            self.timeout_secs = v
                .parse()
                .map_err(|_| Error::InvalidConfig(format!("BIGIP_TIMEOUT is not a number: {}", v)))?;
        }
        Ok(())
    }

    /// Check the settings needed to reach a device
    pub fn validate(&self) -> Result<()> {
        if self.address.trim().is_empty() {
            return Err(Error::InvalidConfig("address must be set".to_string()));
        }
        if self.port == 0 {
            return Err(Error::InvalidConfig("port must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Base URL of the management interface
    pub fn base_url(&self) -> String {
        let address = self.address.trim_end_matches('/');
        if address.starts_with("http://") || address.starts_with("https://") {
            address.to_string()
        } else {
            format!("https://{}:{}", address, self.port)
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(Error::InvalidConfig(format!("{} is not a boolean: {}", key, value))),
    }
}
