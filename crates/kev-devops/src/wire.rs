//! Response shapes of the tracking service and their mapping onto
//! [`kev_core::WorkItem`].

use chrono::{DateTime, Utc};
use kev_core::{WorkItem, WorkItemId};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::DevOpsError;

/// Relation type of a parent → child link.
pub const HIERARCHY_FORWARD: &str = "System.LinkTypes.Hierarchy-Forward";

/// `POST .../_apis/wit/wiql` response.
#[derive(Debug, Deserialize)]
pub(crate) struct WiqlResponse {
    #[serde(rename = "workItems", default)]
    pub(crate) work_items: Vec<WiqlRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WiqlRef {
    pub(crate) id: i64,
}

impl WiqlResponse {
    pub(crate) fn into_ids(self) -> Result<Vec<WorkItemId>, DevOpsError> {
        self.work_items
            .into_iter()
            .map(|r| WorkItemId::try_from(r.id).map_err(|e| DevOpsError::Parse(e.to_string())))
            .collect()
    }
}

/// `GET .../_apis/wit/workitems` response.
#[derive(Debug, Deserialize)]
pub(crate) struct WorkItemsResponse {
    #[serde(default)]
    pub(crate) value: Vec<WorkItemRecord>,
}

/// One link in a work item's relation collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub rel: String,
    #[serde(default)]
    pub url: String,
}

/// A work item exactly as the service returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItemRecord {
    pub id: WorkItemId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Map<String, Value>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub relations: Vec<Relation>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl WorkItemRecord {
    #[must_use]
    pub fn new(id: WorkItemId) -> Self {
        Self {
            id,
            fields: Map::new(),
            relations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn with_relation(mut self, rel: &str, url: impl Into<String>) -> Self {
        self.relations.push(Relation {
            rel: rel.to_string(),
            url: url.into(),
        });
        self
    }

    /// Relations flagged as forward hierarchy links.
    pub fn hierarchy_links(&self) -> impl Iterator<Item = &Relation> {
        self.relations.iter().filter(|r| r.rel == HIERARCHY_FORWARD)
    }

    fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    fn date_field(&self, name: &str) -> Option<DateTime<Utc>> {
        let raw = self.str_field(name)?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(error) => {
                tracing::debug!(id = %self.id, field = name, %error, "unparseable timestamp");
                None
            }
        }
    }

    /// Assignee display name. The service sends an identity object; older
    /// responses send a plain `Name <email>` string.
    fn assignee(&self) -> Option<String> {
        match self.fields.get("System.AssignedTo")? {
            Value::Object(identity) => identity
                .get("displayName")
                .and_then(Value::as_str)
                .map(str::to_string),
            Value::String(raw) => {
                let name = raw.split(" <").next().unwrap_or(raw).trim();
                (!name.is_empty()).then(|| name.to_string())
            }
            _ => None,
        }
    }

    /// Normalize into an immutable [`WorkItem`] snapshot.
    #[must_use]
    pub fn to_work_item(&self) -> WorkItem {
        WorkItem {
            id: self.id,
            title: self.str_field("System.Title").unwrap_or_default().to_string(),
            work_item_type: self
                .str_field("System.WorkItemType")
                .unwrap_or_default()
                .to_string(),
            state: self.str_field("System.State").unwrap_or_default().to_string(),
            assigned_to: self.assignee(),
            area_path: self
                .str_field("System.AreaPath")
                .unwrap_or_default()
                .to_string(),
            created: self.date_field("System.CreatedDate"),
            changed: self.date_field("System.ChangedDate"),
        }
    }
}

/// Extract the target ID from a relation URL's trailing path segment.
///
/// # Errors
///
/// Returns [`DevOpsError::MalformedLink`] when the segment is not a positive
/// integer.
pub fn parse_link_target(url: &str) -> Result<WorkItemId, DevOpsError> {
    url.rsplit('/')
        .next()
        .and_then(|segment| segment.parse::<WorkItemId>().ok())
        .ok_or_else(|| DevOpsError::MalformedLink(url.to_string()))
}
