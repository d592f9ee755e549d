//! watsonx.ai foundation model client.
//!
//! Exchanges the IBM Cloud API key for an IAM bearer token on every request;
//! nothing is cached across calls.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use wxchat_core::{LlmRequest, LlmResponse, Message, Runnable, WxchatError};

const DEFAULT_BASE_URL: &str = "https://us-south.ml.cloud.ibm.com";
const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com";
const DEFAULT_MODEL: &str = "ibm/granite-3-3-8b-instruct";
const API_VERSION: &str = "2024-05-31";
const APIKEY_GRANT: &str = "urn:ibm:params:oauth:grant-type:apikey";

#[derive(Clone)]
pub struct WatsonxClient {
    http: reqwest::Client,
    base_url: String,
    iam_url: String,
    api_key: String,
    project_id: String,
    model_id: String,
    max_tokens: u32,
}

impl fmt::Debug for WatsonxClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatsonxClient")
            .field("base_url", &self.base_url)
            .field("iam_url", &self.iam_url)
            .field("api_key", &"<redacted>")
            .field("project_id", &self.project_id)
            .field("model_id", &self.model_id)
            .finish()
    }
}

#[derive(Default, Clone)]
pub struct WatsonxBuilder {
    base_url: Option<String>,
    iam_url: Option<String>,
    api_key: Option<String>,
    project_id: Option<String>,
    model_id: Option<String>,
    max_tokens: Option<u32>,
    timeout: Option<Duration>,
}

impl WatsonxBuilder {
    pub fn base_url(mut self, value: impl Into<String>) -> Self {
        self.base_url = Some(value.into());
        self
    }

    pub fn iam_url(mut self, value: impl Into<String>) -> Self {
        self.iam_url = Some(value.into());
        self
    }

    pub fn api_key(mut self, value: impl Into<String>) -> Self {
        self.api_key = Some(value.into());
        self
    }

    pub fn project_id(mut self, value: impl Into<String>) -> Self {
        self.project_id = Some(value.into());
        self
    }

    pub fn model_id(mut self, value: impl Into<String>) -> Self {
        self.model_id = Some(value.into());
        self
    }

    pub fn max_tokens(mut self, value: u32) -> Self {
        self.max_tokens = Some(value);
        self
    }

    pub fn timeout(mut self, value: Duration) -> Self {
        self.timeout = Some(value);
        self
    }

    pub fn build(self) -> Result<WatsonxClient, WxchatError> {
        let api_key = self
            .api_key
            .ok_or_else(|| WxchatError::InvalidConfig("missing api_key".to_string()))?;
        let project_id = self
            .project_id
            .ok_or_else(|| WxchatError::InvalidConfig("missing project_id".to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(self.timeout.unwrap_or(Duration::from_secs(120)))
            .build()
            .map_err(|err| WxchatError::LlmProvider(err.to_string()))?;

        Ok(WatsonxClient {
            http,
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            iam_url: self.iam_url.unwrap_or_else(|| DEFAULT_IAM_URL.to_string()),
            api_key,
            project_id,
            model_id: self.model_id.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: self.max_tokens.unwrap_or(1000),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model_id: String,
    project_id: String,
    messages: Vec<Message>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerationRequest {
    model_id: String,
    project_id: String,
    input: String,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    results: Vec<GenerationResult>,
}

#[derive(Debug, Deserialize)]
struct GenerationResult {
    generated_text: String,
}

impl WatsonxClient {
    pub fn builder() -> WatsonxBuilder {
        WatsonxBuilder::default()
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn access_token(&self) -> Result<String, WxchatError> {
        let url = format!("{}/identity/token", self.iam_url);
        let response = self
            .http
            .post(url)
            .basic_auth("bx", Some("bx"))
            .form(&[("grant_type", APIKEY_GRANT), ("apikey", &self.api_key)])
            .send()
            .await
            .map_err(|err| WxchatError::LlmProvider(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WxchatError::LlmProvider(format!(
                "IAM token exchange failed: {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|err| WxchatError::LlmProvider(err.to_string()))?;
        Ok(token.access_token)
    }

    /// One-shot text generation against the generation endpoint, as opposed
    /// to the chat one. Also reachable through `Runnable<String, String>`.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, WxchatError> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/ml/v1/text/generation?version={}",
            self.base_url, API_VERSION
        );
        let request = GenerationRequest {
            model_id: self.model_id.clone(),
            project_id: self.project_id.clone(),
            input: prompt.to_string(),
            parameters: GenerationParameters {
                max_new_tokens: self.max_tokens,
            },
        };

        let response = self
            .http
            .post(url)
            .bearer_auth(&token)
            .json(&request)
            .send()
            .await
            .map_err(|err| WxchatError::LlmProvider(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WxchatError::LlmProvider(format!("{status}: {body}")));
        }

        let generation: GenerationResponse = response
            .json()
            .await
            .map_err(|err| WxchatError::LlmProvider(err.to_string()))?;

        Ok(generation
            .results
            .into_iter()
            .next()
            .map(|result| result.generated_text)
            .unwrap_or_default())
    }
}

/// Prompt-in, completion-out view of the client, used where a bare
/// completion beats a chat exchange (the classification path).
#[async_trait::async_trait]
impl Runnable<String, String> for WatsonxClient {
    async fn invoke(&self, input: String) -> Result<String, WxchatError> {
        self.generate_text(&input).await
    }
}

#[async_trait::async_trait]
impl Runnable<LlmRequest, LlmResponse> for WatsonxClient {
    async fn invoke(&self, input: LlmRequest) -> Result<LlmResponse, WxchatError> {
        let LlmRequest { model, messages } = input;
        let model_id = if model.is_empty() {
            self.model_id.clone()
        } else {
            model
        };

        let token = self.access_token().await?;
        let url = format!("{}/ml/v1/text/chat?version={}", self.base_url, API_VERSION);
        let request = ChatRequest {
            model_id,
            project_id: self.project_id.clone(),
            messages,
            max_tokens: self.max_tokens,
        };

        let response = self
            .http
            .post(url)
            .bearer_auth(&token)
            .json(&request)
            .send()
            .await
            .map_err(|err| WxchatError::LlmProvider(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WxchatError::LlmProvider(format!("{status}: {body}")));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|err| WxchatError::LlmProvider(err.to_string()))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(LlmResponse { content })
    }
}
