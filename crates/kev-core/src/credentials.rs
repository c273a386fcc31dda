//! Connection credentials for the tracking service.

use std::fmt;

/// Organization URL, project, and personal access token.
///
/// The organization URL is stored without a trailing slash. `Debug` never
/// prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    organization_url: String,
    project: String,
    pat: String,
}

impl Credentials {
    #[must_use]
    pub fn new(
        organization_url: impl Into<String>,
        project: impl Into<String>,
        pat: impl Into<String>,
    ) -> Self {
        Self {
            organization_url: clean_org_url(&organization_url.into()),
            project: project.into(),
            pat: pat.into(),
        }
    }

    #[must_use]
    pub fn organization_url(&self) -> &str {
        &self.organization_url
    }

    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    #[must_use]
    pub fn pat(&self) -> &str {
        &self.pat
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("organization_url", &self.organization_url)
            .field("project", &self.project)
            .field("pat", &"[REDACTED]")
            .finish()
    }
}

/// Return the organization URL without trailing slashes.
#[must_use]
pub fn clean_org_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
