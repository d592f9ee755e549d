use serde::Deserialize;

use crate::{CloudError, WorkspaceRecord};

const DEFAULT_BASE_TEMPLATE: &str = "https://{region}.power-iaas.cloud.ibm.com";

/// Lists Power Virtual Server workspaces. The listing endpoint is regional,
/// so one request is issued per configured datacenter and the results are
/// concatenated.
#[derive(Clone, Debug)]
pub struct PowerVsClient {
    http: reqwest::Client,
    base_template: String,
    regions: Vec<String>,
}

impl Default for PowerVsClient {
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
    location: Option<Location>,
}

#[derive(Debug, Deserialize)]
struct Location {
    region: Option<String>,
}

impl PowerVsClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_template: DEFAULT_BASE_TEMPLATE.to_string(),
            regions: vec!["syd".to_string()],
        }
    }

    pub fn with_regions(mut self, regions: Vec<String>) -> Self {
        self.regions = regions;
        self
    }

    /// Override the endpoint base. `{region}` in the template is replaced by
    /// each configured region.
    pub fn with_base_url(mut self, template: impl Into<String>) -> Self {
        self.base_template = template.into();
        self
    }

    pub async fn list_workspaces(&self, token: &str) -> Result<Vec<WorkspaceRecord>, CloudError> {
        let mut records = Vec::new();
        for region in &self.regions {
            let url = format!(
                "{}/v1/workspaces",
                self.base_template.replace("{region}", region)
            );
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
            tracing::debug!(
                region = %region,
                count = listing.workspaces.len(),
                "fetched powervs workspaces"
            );
            records.extend(listing.workspaces.into_iter().map(|ws| WorkspaceRecord {
                id: ws.id,
                name: ws.name,
                status: ws.status,
                location: ws.location.and_then(|l| l.region),
                ..Default::default()
            }));
        }
        Ok(records)
    }
}
