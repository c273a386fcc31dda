//! # kev-secrets
//!
//! Secret store providers for KevOps.
//!
//! A secret store supplies configuration values (typically the personal access
//! token) as `KEVOPS_*` keys that `kev-config` layers below the process
//! environment. Two backends are available:
//! - a Streamlit-compatible `secrets.toml` file
//! - Infisical, via universal auth

mod file;
mod infisical_backend;

use std::path::PathBuf;

use thiserror::Error;

pub use file::{map_secrets, secrets_file_path};

pub(crate) const ENV_BACKEND: &str = "KEVOPS_SECRETS__BACKEND";
pub(crate) const ENV_SECRETS_PATH: &str = "KEVOPS_SECRETS__PATH";

/// Key prefix every override carries.
pub const KEY_PREFIX: &str = "KEVOPS_";

pub const KEY_ORGANIZATION_URL: &str = "KEVOPS_AZURE__ORGANIZATION_URL";
pub const KEY_PROJECT: &str = "KEVOPS_AZURE__PROJECT";
pub const KEY_PAT: &str = "KEVOPS_AZURE__PAT";

/// Result of resolving external secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretOverrides {
    Disabled,
    Values(Vec<(String, String)>),
}

impl SecretOverrides {
    /// Flatten into the key/value list, empty when disabled.
    #[must_use]
    pub fn into_values(self) -> Vec<(String, String)> {
        match self {
            Self::Disabled => Vec::new(),
            Self::Values(values) => values,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Backend {
    Auto,
    None,
    File,
    Infisical,
}

impl Backend {
    fn from_env() -> Result<Self, SecretError> {
        let raw = std::env::var(ENV_BACKEND).unwrap_or_default();
        let normalized = raw.trim().to_ascii_lowercase();

        match normalized.as_str() {
            "" | "auto" => Ok(Self::Auto),
            "none" | "off" | "disabled" => Ok(Self::None),
            "file" => Ok(Self::File),
            "infisical" => Ok(Self::Infisical),
            value => Err(SecretError::UnsupportedBackend(value.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("unsupported secrets backend '{0}'")]
    UnsupportedBackend(String),
    #[error("required environment variable '{name}' is missing")]
    MissingEnvVar { name: &'static str },
    #[error("secrets file not found (set {ENV_SECRETS_PATH} or create .streamlit/secrets.toml)")]
    FileNotFound,
    #[error("secrets file {path} named by {ENV_SECRETS_PATH} does not exist")]
    ExplicitFileMissing { path: PathBuf },
    #[error("failed to read secrets file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse secrets file {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("infisical error: {0}")]
    Infisical(#[from] infisical::InfisicalError),
}

pub(crate) fn required_env(name: &'static str) -> Result<String, SecretError> {
    std::env::var(name).map_err(|_| SecretError::MissingEnvVar { name })
}

/// Load secret key/value overrides from the configured backend.
///
/// Keys are exact `KEVOPS_*` config names (e.g. `KEVOPS_AZURE__PAT`).
pub async fn load_overrides() -> Result<SecretOverrides, SecretError> {
    match Backend::from_env()? {
        Backend::None => Ok(SecretOverrides::Disabled),
        Backend::Infisical => {
            let settings = infisical_backend::InfisicalSettings::from_env()?;
            let values = infisical_backend::load(&settings).await?;
            Ok(SecretOverrides::Values(values))
        }
        Backend::File | Backend::Auto => load_file_overrides(),
    }
}

/// Load overrides from the secrets file only.
///
/// With no explicit backend, a missing file disables the store instead of
/// failing. A path named in `KEVOPS_SECRETS__PATH` must exist under every
/// backend.
pub fn load_file_overrides() -> Result<SecretOverrides, SecretError> {
    let backend = Backend::from_env()?;
    if let Some(path) = file::explicit_path()
        && !path.exists()
    {
        return Err(SecretError::ExplicitFileMissing { path });
    }
    match secrets_file_path() {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading secrets file");
            file::load_from_path(&path).map(SecretOverrides::Values)
        }
        None if backend == Backend::File => Err(SecretError::FileNotFound),
        None => Ok(SecretOverrides::Disabled),
    }
}
