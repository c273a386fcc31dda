//! Streamlit-compatible `secrets.toml` backend.
//!
//! Accepted shapes, first match wins per field:
//!
//! ```toml
//! organization_url = "https://dev.azure.com/acme"   # top level
//! [azure]
//! pat = "..."                                        # [azure] table
//! ORG_URL = "..."                                    # dashboard-style names
//! KEVOPS_AZURE__PROJECT = "..."                      # explicit config keys
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use toml::{Table, Value};

use crate::{ENV_SECRETS_PATH, KEY_ORGANIZATION_URL, KEY_PAT, KEY_PREFIX, KEY_PROJECT, SecretError};

/// `(config key, snake-case name, dashboard-style name)`.
const ALIASES: &[(&str, &str, &str)] = &[
    (KEY_ORGANIZATION_URL, "organization_url", "ORG_URL"),
    (KEY_PROJECT, "project", "PROJECT_NAME"),
    (KEY_PAT, "pat", "AZURE_PAT"),
];

/// Locate the secrets file: `KEVOPS_SECRETS__PATH`, then
/// `.streamlit/secrets.toml`, then `~/.streamlit/secrets.toml`.
#[must_use]
pub fn secrets_file_path() -> Option<PathBuf> {
    if let Some(explicit) = explicit_path() {
        return explicit.exists().then_some(explicit);
    }

    let local = PathBuf::from(".streamlit").join("secrets.toml");
    if local.exists() {
        return Some(local);
    }

    dirs::home_dir()
        .map(|home| home.join(".streamlit").join("secrets.toml"))
        .filter(|path| path.exists())
}

/// The non-blank value of `KEVOPS_SECRETS__PATH`.
pub(crate) fn explicit_path() -> Option<PathBuf> {
    std::env::var(ENV_SECRETS_PATH)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}

pub(crate) fn load_from_path(path: &Path) -> Result<Vec<(String, String)>, SecretError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SecretError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table: Table = raw.parse().map_err(|source| SecretError::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(map_secrets(&table))
}

/// Map a parsed secrets table onto `KEVOPS_*` keys, sorted by key.
#[must_use]
pub fn map_secrets(table: &Table) -> Vec<(String, String)> {
    let mut values: BTreeMap<String, String> = table
        .iter()
        .filter(|(key, _)| key.starts_with(KEY_PREFIX))
        .filter_map(|(key, value)| non_empty(value).map(|v| (key.clone(), v)))
        .collect();

    let azure = table.get("azure").and_then(Value::as_table);

    for (config_key, snake, upper) in ALIASES {
        if values.contains_key(*config_key) {
            continue;
        }
        let found = table
            .get(*snake)
            .and_then(non_empty)
            .or_else(|| azure.and_then(|t| t.get(*snake)).and_then(non_empty))
            .or_else(|| table.get(*upper).and_then(non_empty));
        if let Some(value) = found {
            values.insert((*config_key).to_string(), value);
        }
    }

    values.into_iter().collect()
}

fn non_empty(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
