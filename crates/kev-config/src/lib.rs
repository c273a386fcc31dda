//! # kev-config
//!
//! Layered configuration loading for KevOps using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Explicit CLI arguments
//! 2. Environment variables (`KEVOPS_*` prefix, `__` as separator, plus the
//!    legacy `AZURE_DEVOPS_ORG_URL` / `AZURE_DEVOPS_PROJECT` / `AZURE_DEVOPS_PAT`)
//! 3. Secret store values (see `kev-secrets`)
//! 4. Project-level `.kevops/config.toml`
//! 5. User-level `~/.config/kevops/config.toml`
//! 6. Built-in defaults
//!
//! # Usage
//!
//! ```no_run
//! use kev_config::{ExplicitOverrides, KevConfig};
//!
//! let config = KevConfig::load_layered(&[], &ExplicitOverrides::default()).expect("config");
//! let credentials = config.azure.credentials().expect("credentials");
//! println!("{}", credentials.organization_url());
//! ```

mod azure;
mod error;
mod limits;
mod overrides;
mod states;

pub use azure::AzureConfig;
pub use error::ConfigError;
pub use limits::LimitsConfig;
pub use overrides::{ExplicitOverrides, secret_key_to_path};
pub use states::StatesConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub(crate) const ENV_PREFIX: &str = "KEVOPS_";

/// Legacy environment variable names and the config path each fills.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("AZURE_DEVOPS_ORG_URL", "azure.organization_url"),
    ("AZURE_DEVOPS_PROJECT", "azure.project"),
    ("AZURE_DEVOPS_PAT", "azure.pat"),
];

/// Whether `name` holds a non-blank value in the process environment.
fn env_is_set(name: &str) -> bool {
    std::env::var(name).is_ok_and(|value| !value.trim().is_empty())
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KevConfig {
    #[serde(default)]
    pub azure: AzureConfig,
    #[serde(default)]
    pub states: StatesConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl KevConfig {
    /// Load configuration from files and environment only.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_layered(&[], &ExplicitOverrides::default())
    }

    /// Load configuration with `.env` support, secret store values, and
    /// explicit overrides.
    ///
    /// Calls `dotenvy` for the working directory's `.env` before building
    /// the figment.
    pub fn load_with_dotenv(
        secrets: &[(String, String)],
        explicit: &ExplicitOverrides,
    ) -> Result<Self, ConfigError> {
        if let Err(error) = dotenvy::dotenv()
            && !error.not_found()
        {
            tracing::warn!(%error, "failed to load .env file");
        }
        Self::load_layered(secrets, explicit)
    }

    /// Load configuration from every layer.
    pub fn load_layered(
        secrets: &[(String, String)],
        explicit: &ExplicitOverrides,
    ) -> Result<Self, ConfigError> {
        Self::figment_with(secrets, explicit)
            .extract()
            .map_err(ConfigError::from)
    }

    /// The file and environment layers without secrets or explicit values.
    pub fn figment() -> Figment {
        Self::figment_with(&[], &ExplicitOverrides::default())
    }

    /// Build the full provider chain.
    ///
    /// Public so tests can inspect the figment or add providers on top.
    pub fn figment_with(secrets: &[(String, String)], explicit: &ExplicitOverrides) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".kevops/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Secret store
        for (key, value) in secrets {
            if value.trim().is_empty() {
                tracing::debug!(key, "ignoring blank secret");
                continue;
            }
            match secret_key_to_path(key) {
                Some(path) => {
                    figment = figment.merge(Serialized::default(&path, value.clone()));
                }
                None => tracing::debug!(key, "ignoring secret without KEVOPS_ prefix"),
            }
        }

        // Layer 4: Environment (legacy names, then prefixed). Blank values
        // count as unset so they fall through to the layers below.
        figment = figment
            .merge(Env::raw().filter_map(|key| {
                if !env_is_set(key.as_str()) {
                    return None;
                }
                LEGACY_ENV
                    .iter()
                    .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
                    .map(|(_, path)| (*path).into())
            }))
            .merge(
                Env::raw()
                    .filter_map(|key| {
                        let name = key.as_str();
                        let has_prefix = name
                            .get(..ENV_PREFIX.len())
                            .is_some_and(|head| head.eq_ignore_ascii_case(ENV_PREFIX));
                        (has_prefix && env_is_set(name)).then(|| name[ENV_PREFIX.len()..].into())
                    })
                    .split("__"),
            );

        // Layer 5: Explicit CLI arguments
        for (path, value) in [
            ("azure.organization_url", &explicit.organization_url),
            ("azure.project", &explicit.project),
            ("azure.pat", &explicit.pat),
        ] {
            if let Some(value) = value {
                figment = figment.merge(Serialized::default(path, value.clone()));
            }
        }
        if !explicit.area_paths.is_empty() {
            figment = figment.merge(Serialized::default(
                "azure.area_paths",
                explicit.area_paths.clone(),
            ));
        }
        if explicit.mine {
            figment = figment.merge(Serialized::default("azure.mine", true));
        }

        figment
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kevops").join("config.toml"))
    }
}
