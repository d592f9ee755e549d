use std::fmt;

use serde::Deserialize;

use crate::CloudError;

const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com";
const APIKEY_GRANT: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Exchanges an IBM Cloud API key for a bearer token. Tokens are not cached;
/// every call re-authenticates.
#[derive(Clone)]
pub struct IamClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for IamClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IamClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl IamClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_IAM_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn access_token(&self) -> Result<String, CloudError> {
        let url = format!("{}/identity/token", self.base_url);
        let response = self
            .http
            .post(url)
            .basic_auth("bx", Some("bx"))
            .form(&[("grant_type", APIKEY_GRANT), ("apikey", &self.api_key)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CloudError::Auth {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }
}
