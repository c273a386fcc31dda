//! Infisical universal-auth backend.

use infisical::{AuthMethod, Client, secrets::ListSecretsRequest};

use crate::{KEY_PREFIX, SecretError, required_env};

const DEFAULT_BASE_URL: &str = "https://app.infisical.com";

/// Connection settings, all read from `KEVOPS_INFISICAL__*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InfisicalSettings {
    base_url: String,
    client_id: String,
    client_secret: String,
    project_id: String,
    environment: String,
    /// Folder to list, recursively.
    folder: String,
}

fn optional_env(name: &str, fallback: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

impl InfisicalSettings {
    pub(crate) fn from_env() -> Result<Self, SecretError> {
        Ok(Self {
            client_id: required_env("KEVOPS_INFISICAL__CLIENT_ID")?,
            client_secret: required_env("KEVOPS_INFISICAL__CLIENT_SECRET")?,
            project_id: required_env("KEVOPS_INFISICAL__PROJECT_ID")?,
            environment: required_env("KEVOPS_INFISICAL__ENVIRONMENT")?,
            base_url: optional_env("KEVOPS_INFISICAL__BASE_URL", DEFAULT_BASE_URL),
            folder: optional_env("KEVOPS_INFISICAL__PATH", "/"),
        })
    }
}

/// Keep only `KEVOPS_*` keys, sorted so later layering is deterministic.
fn select_kevops_keys(pairs: impl IntoIterator<Item = (String, String)>) -> Vec<(String, String)> {
    let mut selected: Vec<(String, String)> = pairs
        .into_iter()
        .filter(|(key, _)| key.starts_with(KEY_PREFIX))
        .collect();
    selected.sort_by(|a, b| a.0.cmp(&b.0));
    selected
}

/// Log in and list the project's `KEVOPS_*` secrets.
pub(crate) async fn load(settings: &InfisicalSettings) -> Result<Vec<(String, String)>, SecretError> {
    let mut client = Client::builder().base_url(&settings.base_url).build().await?;
    client
        .login(AuthMethod::new_universal_auth(
            &settings.client_id,
            &settings.client_secret,
        ))
        .await?;

    let listing = ListSecretsRequest::builder(&settings.project_id, &settings.environment)
        .path(&settings.folder)
        .recursive(true)
        .expand_secret_references(true)
        .build();
    let secrets = client.secrets().list(listing).await?;

    let selected = select_kevops_keys(
        secrets
            .into_iter()
            .map(|secret| (secret.secret_key, secret.secret_value)),
    );
    tracing::debug!(count = selected.len(), environment = %settings.environment, "infisical secrets loaded");
    Ok(selected)
}
