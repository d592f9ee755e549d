use serde::Deserialize;

use crate::{CloudError, WorkspaceRecord};

const DEFAULT_BASE_URL: &str = "https://schematics.cloud.ibm.com";

/// Lists Schematics workspaces through the single region-less endpoint.
#[derive(Clone, Debug)]
pub struct SchematicsClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for SchematicsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct Listing {
    workspaces: Vec<Workspace>,
}

#[derive(Debug, Deserialize)]
struct Workspace {
    id: Option<String>,
    name: Option<String>,
    status: Option<String>,
    location: Option<String>,
    resource_group: Option<String>,
    created_at: Option<String>,
    created_by: Option<String>,
}

impl SchematicsClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn list_workspaces(&self, token: &str) -> Result<Vec<WorkspaceRecord>, CloudError> {
        let url = format!("{}/v1/workspaces", self.base_url);
        let response = self.http.get(url).bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CloudError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let listing: Listing = response.json().await?;
        tracing::debug!(count = listing.workspaces.len(), "fetched schematics workspaces");
        Ok(listing
            .workspaces
            .into_iter()
            .map(|ws| WorkspaceRecord {
                id: ws.id,
                name: ws.name,
                status: ws.status,
                location: ws.location,
                resource_group: ws.resource_group,
                created_at: ws.created_at,
                created_by: ws.created_by,
            })
            .collect())
    }
}
