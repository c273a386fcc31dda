//! Tracking service connection configuration.

use std::fmt;

use kev_core::Credentials;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_api_version() -> String {
    String::from("7.0")
}

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Clone, Deserialize, Serialize)]
pub struct AzureConfig {
    /// Organization base URL (e.g., `https://dev.azure.com/acme`).
    #[serde(default)]
    pub organization_url: String,

    /// Project name.
    #[serde(default)]
    pub project: String,

    /// Personal access token.
    #[serde(default)]
    pub pat: String,

    /// Area paths to scope task queries to. Empty means no area filter.
    #[serde(default)]
    pub area_paths: Vec<String>,

    /// Only items assigned to the token's owner.
    #[serde(default)]
    pub mine: bool,

    /// `api-version` query parameter.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            organization_url: String::new(),
            project: String::new(),
            pat: String::new(),
            area_paths: Vec::new(),
            mine: false,
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for AzureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureConfig")
            .field("organization_url", &self.organization_url)
            .field("project", &self.project)
            .field("pat", &if self.pat.is_empty() { "" } else { "[REDACTED]" })
            .field("area_paths", &self.area_paths)
            .field("mine", &self.mine)
            .field("api_version", &self.api_version)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AzureConfig {
    /// Check if the connection settings are complete.
    pub fn is_configured(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Names of the required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("organization_url", &self.organization_url),
            ("project", &self.project),
            ("pat", &self.pat),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Validated credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredentials`] naming every blank field.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ConfigError::MissingCredentials { missing });
        }
        Ok(Credentials::new(
            self.organization_url.trim(),
            self.project.trim(),
            self.pat.trim(),
        ))
    }
}
