//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// Connection settings are incomplete. Raised before any network call.
    #[error(
        "missing {}: organization_url, project, and pat must be provided via arguments, \
         environment variables (AZURE_DEVOPS_ORG_URL, AZURE_DEVOPS_PROJECT, AZURE_DEVOPS_PAT \
         or KEVOPS_AZURE__*), or the secrets store",
        .missing.join(", ")
    )]
    MissingCredentials { missing: Vec<&'static str> },

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
