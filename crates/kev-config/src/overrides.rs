//! Values supplied from outside the config files: explicit CLI arguments and
//! secret store entries.

/// Connection values given explicitly on the command line.
///
/// These sit above every other source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplicitOverrides {
    pub organization_url: Option<String>,
    pub project: Option<String>,
    pub pat: Option<String>,
    pub area_paths: Vec<String>,
    pub mine: bool,
}

/// Translate a `KEVOPS_SECTION__FIELD` key into the dotted path
/// `section.field`. Returns `None` for keys without the prefix.
#[must_use]
pub fn secret_key_to_path(key: &str) -> Option<String> {
    let rest = key.strip_prefix(crate::ENV_PREFIX)?;
    if rest.is_empty() {
        return None;
    }
    Some(
        rest.split("__")
            .map(str::to_ascii_lowercase)
            .collect::<Vec<_>>()
            .join("."),
    )
}
