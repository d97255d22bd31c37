//! Configuration types for endpoint-smoke

use std::collections::BTreeMap;
use std::path::Path;

use hyper::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::check::EndpointCheck;
use crate::{Result, SmokeError};

/// Base URL used when neither the config file nor the environment sets one
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000";

/// Organization scoped by the default checks
pub const DEFAULT_ORG_ID: &str = "cfbaf78a-3caa-4cb2-a367-d3b3eb161ba1";

/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "API_BASE_URL";

/// Main configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server under test, e.g. `http://localhost:4000`
    pub base_url: String,
    /// Value of the `org_id` query parameter
    pub org_id: String,
    /// Value of the `limit` query parameter
    pub limit: u32,
    /// Extra request headers
    pub headers: BTreeMap<String, String>,
    /// Resource limits
    pub limits: LimitsConfig,
    /// Checks to run, in order
    pub checks: Vec<EndpointCheck>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            org_id: DEFAULT_ORG_ID.to_string(),
            limit: 2,
            headers: BTreeMap::new(),
            limits: LimitsConfig::default(),
            checks: EndpointCheck::defaults(),
        }
    }
}

/// Resource limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Connect plus full response deadline per request, in milliseconds
    pub timeout_ms: u64,
    /// Maximum response body size in bytes
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_body_bytes: 16 * 1024 * 1024, // 16 MB
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SmokeError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| SmokeError::ConfigError(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Build the effective configuration: file (or defaults), then environment
    ///
    /// # Errors
    ///
    /// Returns error if the file is unreadable or the result is invalid
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_env_with(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.base_url = base_url.trim().to_string();
        }
    }

    /// Query parameters for a check: `org_id`, `limit`, then the check's extras
    ///
    /// An extra named `org_id` or `limit` replaces the global value in place.
    pub fn query_for(&self, check: &EndpointCheck) -> Vec<(String, String)> {
        let mut query = vec![
            ("org_id".to_string(), self.org_id.clone()),
            ("limit".to_string(), self.limit.to_string()),
        ];

        for (key, value) in &check.query {
            match query.iter_mut().find(|(k, _)| k == key) {
                Some(existing) => existing.1.clone_from(value),
                None => query.push((key.clone(), value.clone())),
            }
        }

        query
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns error if configuration is invalid
    pub fn validate(&self) -> Result<()> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(SmokeError::ConfigError(
                "base_url cannot be empty".to_string(),
            ));
        }

        // Only plain HTTP connectors are available
        if !base_url.starts_with("http://") {
            return Err(SmokeError::ConfigError(format!(
                "base_url must use http://, got '{base_url}'"
            )));
        }

        if self.org_id.trim().is_empty() {
            return Err(SmokeError::ConfigError(
                "org_id cannot be empty".to_string(),
            ));
        }

        if self.limit == 0 {
            return Err(SmokeError::ConfigError("limit must be > 0".to_string()));
        }

        if self.limits.timeout_ms == 0 {
            return Err(SmokeError::ConfigError(
                "limits.timeout_ms must be > 0".to_string(),
            ));
        }

        if self.limits.max_body_bytes == 0 {
            return Err(SmokeError::ConfigError(
                "limits.max_body_bytes must be > 0".to_string(),
            ));
        }

        for (name, value) in &self.headers {
            if HeaderName::from_bytes(name.as_bytes()).is_err()
                || HeaderValue::from_str(value).is_err()
            {
                return Err(SmokeError::ConfigError(format!(
                    "Invalid header '{name}: {value}'"
                )));
            }
        }

        if self.checks.is_empty() {
            return Err(SmokeError::ConfigError(
                "At least one check must be configured".to_string(),
            ));
        }

        for (i, check) in self.checks.iter().enumerate() {
            if !check.path.starts_with('/') {
                return Err(SmokeError::ConfigError(format!(
                    "Check {i}: path must start with '/', got '{}'",
                    check.path
                )));
            }

            if check.response_key.is_empty() {
                return Err(SmokeError::ConfigError(format!(
                    "Check {i}: response_key cannot be empty"
                )));
            }

            if check.sample_field.is_empty() {
                return Err(SmokeError::ConfigError(format!(
                    "Check {i}: sample_field cannot be empty"
                )));
            }
        }

        Ok(())
    }
}
