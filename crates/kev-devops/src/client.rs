//! HTTP implementation of [`WorkItemApi`].

use std::time::Duration;

use async_trait::async_trait;
use kev_core::{Credentials, WorkItemId, ids::join_ids};

use crate::api::{FetchMode, IdPageRequest, WorkItemApi};
use crate::error::DevOpsError;
use crate::http::{check_response, decode_json};
use crate::wire::{WiqlResponse, WorkItemRecord, WorkItemsResponse};

/// Default REST API version.
pub const DEFAULT_API_VERSION: &str = "7.0";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport settings that do not identify the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub timeout: Duration,
    pub api_version: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

/// Azure DevOps work item client for one organization and project.
#[derive(Debug)]
pub struct DevOpsClient {
    http: reqwest::Client,
    credentials: Credentials,
    api_version: String,
}

#[derive(serde::Serialize)]
struct WiqlBody<'a> {
    query: &'a str,
}

impl DevOpsClient {
    /// Build a client. No request is made until the first query.
    ///
    /// # Errors
    ///
    /// Returns [`DevOpsError::Transport`] if the underlying `reqwest::Client`
    /// cannot be built (e.g. no TLS backend).
    pub fn new(credentials: Credentials, settings: ClientSettings) -> Result<Self, DevOpsError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("kevops/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout)
            .build()?;
        Ok(Self {
            http,
            credentials,
            api_version: settings.api_version,
        })
    }

    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn project_root(&self) -> String {
        format!(
            "{}/{}/_apis/wit",
            self.credentials.organization_url(),
            urlencoding::encode(self.credentials.project())
        )
    }

    pub(crate) fn wiql_url(&self, top: usize) -> String {
        format!(
            "{}/wiql?api-version={}&$top={top}",
            self.project_root(),
            self.api_version
        )
    }

    pub(crate) fn items_url(&self, ids: &[WorkItemId], mode: FetchMode) -> String {
        let selector = match mode {
            FetchMode::AllFields => String::new(),
            FetchMode::Fields(fields) => format!("&fields={}", fields.join(",")),
            FetchMode::Relations => "&$expand=relations".to_string(),
        };
        format!(
            "{}/workitems?ids={}{selector}&api-version={}",
            self.project_root(),
            join_ids(ids),
            self.api_version
        )
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth("", Some(self.credentials.pat()))
    }
}

#[async_trait]
impl WorkItemApi for DevOpsClient {
    async fn query_ids(&self, request: &IdPageRequest) -> Result<Vec<WorkItemId>, DevOpsError> {
        let query = request.wiql();
        tracing::debug!(after = ?request.after, top = request.top, "wiql page");
        let resp = self
            .authorized(self.http.post(self.wiql_url(request.top)))
            .json(&WiqlBody { query: &query })
            .send()
            .await?;
        let data: WiqlResponse = decode_json(check_response(resp).await?).await?;
        data.into_ids()
    }

    async fn fetch_items(
        &self,
        ids: &[WorkItemId],
        mode: FetchMode,
    ) -> Result<Vec<WorkItemRecord>, DevOpsError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        tracing::debug!(count = ids.len(), ?mode, "work item batch");
        let resp = self
            .authorized(self.http.get(self.items_url(ids, mode)))
            .send()
            .await?;
        let data: WorkItemsResponse = decode_json(check_response(resp).await?).await?;
        Ok(data.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SUMMARY_FIELDS;

    fn client() -> DevOpsClient {
        DevOpsClient::new(
            Credentials::new("https://dev.azure.com/acme/", "Web Shop", "tok"),
            ClientSettings::default(),
        )
        .unwrap()
    }

    fn ids(raw: &[u32]) -> Vec<WorkItemId> {
        raw.iter().copied().filter_map(WorkItemId::new).collect()
    }

    #[test]
    fn wiql_url_encodes_project_and_top() {
        assert_eq!(
            client().wiql_url(20_000),
            "https://dev.azure.com/acme/Web%20Shop/_apis/wit/wiql?api-version=7.0&$top=20000"
        );
    }

    #[test]
    fn items_url_modes_are_exclusive() {
        let c = client();
        let batch = ids(&[1, 2, 3]);

        let all = c.items_url(&batch, FetchMode::AllFields);
        assert!(all.ends_with("/workitems?ids=1,2,3&api-version=7.0"));

        let relations = c.items_url(&batch, FetchMode::Relations);
        assert!(relations.contains("&$expand=relations"));
        assert!(!relations.contains("fields="));

        let fields = c.items_url(&batch, FetchMode::Fields(SUMMARY_FIELDS));
        assert!(fields.contains("&fields=System.Id,System.Title,"));
        assert!(!fields.contains("$expand"));
    }

    #[test]
    fn debug_output_hides_the_token() {
        let rendered = format!("{:?}", client());
        assert!(!rendered.contains("tok\""));
    }
}
